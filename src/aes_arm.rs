//! ARMv8 Crypto Extensions implementation of the AES round function.

use core::arch::aarch64::{
    uint8x16_t, vaeseq_u8, vaesmcq_u8, vdupq_n_u8, veorq_u8, vld1q_u8, vst1q_u8,
};
use core::fmt;

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct AesBlock(uint8x16_t);

impl AesBlock {
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> AesBlock {
        debug_assert_eq!(bytes.len(), 16);
        AesBlock(unsafe { vld1q_u8(bytes.as_ptr()) })
    }

    #[inline]
    pub fn as_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        unsafe { vst1q_u8(bytes.as_mut_ptr(), self.0) };
        bytes
    }

    #[inline]
    pub fn xor(&self, other: AesBlock) -> AesBlock {
        AesBlock(unsafe { veorq_u8(self.0, other.0) })
    }

    // AESE folds AddRoundKey in before SubBytes, so it gets a zero key and
    // the round key is XORed after MixColumns, matching AESENC semantics.
    #[inline]
    pub fn round(&self, rk: AesBlock) -> AesBlock {
        AesBlock(unsafe { veorq_u8(vaesmcq_u8(vaeseq_u8(self.0, vdupq_n_u8(0))), rk.0) })
    }
}

impl fmt::Debug for AesBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AesBlock").field(&self.as_bytes()).finish()
    }
}
