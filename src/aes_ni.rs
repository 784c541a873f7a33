//! AES-NI implementation of the AES round function.

use core::fmt;

#[cfg(target_arch = "x86")]
use core::arch::x86::{
    __m128i, _mm_aesenc_si128, _mm_loadu_si128, _mm_storeu_si128, _mm_xor_si128,
};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    __m128i, _mm_aesenc_si128, _mm_loadu_si128, _mm_storeu_si128, _mm_xor_si128,
};

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct AesBlock(__m128i);

impl AesBlock {
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> AesBlock {
        debug_assert_eq!(bytes.len(), 16);
        AesBlock(unsafe { _mm_loadu_si128(bytes.as_ptr() as *const __m128i) })
    }

    #[inline]
    pub fn as_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        unsafe { _mm_storeu_si128(bytes.as_mut_ptr() as *mut __m128i, self.0) };
        bytes
    }

    #[inline]
    pub fn xor(&self, other: AesBlock) -> AesBlock {
        AesBlock(unsafe { _mm_xor_si128(self.0, other.0) })
    }

    #[inline]
    pub fn round(&self, rk: AesBlock) -> AesBlock {
        AesBlock(unsafe { _mm_aesenc_si128(self.0, rk.0) })
    }
}

impl fmt::Debug for AesBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AesBlock").field(&self.as_bytes()).finish()
    }
}
