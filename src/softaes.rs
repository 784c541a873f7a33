//! Portable software fallback for targets without AES instructions.

use core::fmt;

use softaes::unprotected::{Block, SoftAes};

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct AesBlock(Block);

impl AesBlock {
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> AesBlock {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(bytes);
        AesBlock(Block::from_bytes(&buf))
    }

    #[inline]
    pub fn as_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    #[inline]
    pub fn xor(&self, other: AesBlock) -> AesBlock {
        AesBlock(self.0.xor(&other.0))
    }

    #[inline]
    pub fn round(&self, rk: AesBlock) -> AesBlock {
        AesBlock(SoftAes::block_encrypt(&self.0, &rk.0))
    }
}

impl fmt::Debug for AesBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AesBlock").field(&self.as_bytes()).finish()
    }
}
