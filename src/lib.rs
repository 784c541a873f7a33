#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(
    all(target_arch = "x86_64", target_feature = "aes"),
    all(target_arch = "x86", target_feature = "aes")
))]
mod aes_ni;
#[cfg(any(
    all(target_arch = "x86_64", target_feature = "aes"),
    all(target_arch = "x86", target_feature = "aes")
))]
use aes_ni::AesBlock;

#[cfg(all(target_arch = "aarch64", target_feature = "aes"))]
mod aes_arm;
#[cfg(all(target_arch = "aarch64", target_feature = "aes"))]
use aes_arm::AesBlock;

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "aes"),
    all(target_arch = "x86", target_feature = "aes"),
    all(target_arch = "aarch64", target_feature = "aes")
)))]
mod softaes;
#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "aes"),
    all(target_arch = "x86", target_feature = "aes"),
    all(target_arch = "aarch64", target_feature = "aes")
)))]
use softaes::AesBlock;

use core::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    InvalidTag,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTag => write!(f, "Invalid tag"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

mod rocca {
    use crate::AesBlock;
    pub use crate::Error;

    /// Length of a ROCCA key, in bytes.
    pub const KEY_LENGTH: usize = 32;

    /// Length of a ROCCA nonce, in bytes.
    pub const NONCE_LENGTH: usize = 16;

    /// Length of a ROCCA authentication tag, in bytes.
    pub const TAG_LENGTH: usize = 16;

    /// ROCCA authentication tag
    pub type Tag = [u8; TAG_LENGTH];

    /// ROCCA key
    pub type Key = [u8; KEY_LENGTH];

    /// ROCCA nonce
    pub type Nonce = [u8; NONCE_LENGTH];

    const Z0: u128 = 0x428a2f98d728ae227137449123ef65cd;
    const Z1: u128 = 0xb5c0fbcfec4d3b2fe9b5dba58189dbbc;

    const ROUNDS: usize = 20;

    #[repr(transparent)]
    #[derive(Debug, Clone, Copy)]
    struct State {
        blocks: [AesBlock; 8],
    }

    impl State {
        fn update(&mut self, x0: AesBlock, x1: AesBlock) {
            let blocks = &self.blocks;
            let next: [AesBlock; 8] = [
                blocks[7].xor(x0),
                blocks[0].round(blocks[7]),
                blocks[1].xor(blocks[6]),
                blocks[2].round(blocks[1]),
                blocks[3].xor(x1),
                blocks[4].round(blocks[3]),
                blocks[5].round(blocks[4]),
                blocks[0].xor(blocks[6]),
            ];
            self.blocks = next;
        }

        pub fn new(key: &Key, nonce: &Nonce) -> Self {
            let z0 = AesBlock::from_bytes(&Z0.to_le_bytes());
            let z1 = AesBlock::from_bytes(&Z1.to_le_bytes());
            let k0 = AesBlock::from_bytes(&key[0..16]);
            let k1 = AesBlock::from_bytes(&key[16..32]);
            let zero = AesBlock::from_bytes(&[0; 16]);
            let nonce_block = AesBlock::from_bytes(nonce);

            let blocks: [AesBlock; 8] = [
                k1,
                nonce_block,
                z0,
                z1,
                nonce_block.xor(k1),
                zero,
                k0,
                zero,
            ];
            let mut state = State { blocks };
            for _ in 0..ROUNDS {
                state.update(z0, z1);
            }
            state
        }

        fn absorb(&mut self, src: &[u8; 32]) {
            let msg0 = AesBlock::from_bytes(&src[0..16]);
            let msg1 = AesBlock::from_bytes(&src[16..32]);
            self.update(msg0, msg1);
        }

        fn absorb_ad(&mut self, ad: &[u8]) {
            let mut src = [0u8; 32];
            let mut chunks = ad.chunks_exact(32);
            for chunk in chunks.by_ref() {
                src.copy_from_slice(chunk);
                self.absorb(&src);
            }
            let rest = chunks.remainder();
            if !rest.is_empty() {
                src.fill(0);
                src[..rest.len()].copy_from_slice(rest);
                self.absorb(&src);
            }
        }

        fn enc(&mut self, dst: &mut [u8; 32], src: &[u8; 32]) {
            let blocks = &self.blocks;
            let msg0 = AesBlock::from_bytes(&src[0..16]);
            let msg1 = AesBlock::from_bytes(&src[16..32]);
            let c0 = blocks[1].round(blocks[5]).xor(msg0);
            let c1 = blocks[0].xor(blocks[4]).round(blocks[2]).xor(msg1);
            dst[..16].copy_from_slice(&c0.as_bytes());
            dst[16..32].copy_from_slice(&c1.as_bytes());
            self.update(msg0, msg1);
        }

        fn dec(&mut self, dst: &mut [u8; 32], src: &[u8; 32]) {
            let blocks = &self.blocks;
            let c0 = AesBlock::from_bytes(&src[0..16]);
            let c1 = AesBlock::from_bytes(&src[16..32]);
            let msg0 = blocks[1].round(blocks[5]).xor(c0);
            let msg1 = blocks[0].xor(blocks[4]).round(blocks[2]).xor(c1);
            dst[..16].copy_from_slice(&msg0.as_bytes());
            dst[16..32].copy_from_slice(&msg1.as_bytes());
            self.update(msg0, msg1);
        }

        fn dec_partial(&mut self, dst: &mut [u8], src: &[u8; 32]) {
            let blocks = &self.blocks;
            let c0 = AesBlock::from_bytes(&src[0..16]);
            let c1 = AesBlock::from_bytes(&src[16..32]);
            let msg0 = blocks[1].round(blocks[5]).xor(c0);
            let msg1 = blocks[0].xor(blocks[4]).round(blocks[2]).xor(c1);
            let mut padded = [0u8; 32];
            padded[..16].copy_from_slice(&msg0.as_bytes());
            padded[16..32].copy_from_slice(&msg1.as_bytes());
            padded[dst.len()..].fill(0);
            dst.copy_from_slice(&padded[..dst.len()]);
            self.update(
                AesBlock::from_bytes(&padded[0..16]),
                AesBlock::from_bytes(&padded[16..32]),
            );
        }

        fn mac(&mut self, adlen: usize, mlen: usize) -> Tag {
            let adlen_bytes = (adlen as u128 * 8).to_le_bytes();
            let mlen_bytes = (mlen as u128 * 8).to_le_bytes();
            let adlen_block = AesBlock::from_bytes(&adlen_bytes);
            let mlen_block = AesBlock::from_bytes(&mlen_bytes);
            for _ in 0..ROUNDS {
                self.update(adlen_block, mlen_block);
            }
            let blocks = &self.blocks;
            let tmp = blocks[0]
                .xor(blocks[1])
                .xor(blocks[2])
                .xor(blocks[3])
                .xor(blocks[4])
                .xor(blocks[5])
                .xor(blocks[6])
                .xor(blocks[7]);
            tmp.as_bytes()
        }
    }

    #[repr(transparent)]
    pub struct Rocca(State);

    impl Rocca {
        /// Create a new AEAD instance.
        /// `key` must be 32 bytes long, `nonce` must be 16 bytes long.
        pub fn new(nonce: &Nonce, key: &Key) -> Self {
            Rocca(State::new(key, nonce))
        }

        /// Encrypts a message using ROCCA
        /// # Arguments
        /// * `m` - Message
        /// * `ad` - Associated data
        /// # Returns
        /// Encrypted message and authentication tag.
        #[cfg(feature = "std")]
        pub fn encrypt(self, m: &[u8], ad: &[u8]) -> (Vec<u8>, Tag) {
            let mut c = vec![0u8; m.len()];
            let tag = self.encrypt_detached(&mut c, m, ad);
            (c, tag)
        }

        /// Encrypts a message using ROCCA, writing the ciphertext into a
        /// caller-supplied buffer.
        /// # Arguments
        /// * `c` - Ciphertext output buffer; must be as long as `m`
        /// * `m` - Message
        /// * `ad` - Associated data
        /// # Returns
        /// The authentication tag.
        /// # Panics
        /// Panics if `c.len() != m.len()`.
        pub fn encrypt_detached(mut self, c: &mut [u8], m: &[u8], ad: &[u8]) -> Tag {
            assert_eq!(c.len(), m.len());
            let state = &mut self.0;
            let mlen = m.len();
            state.absorb_ad(ad);
            let mut src = [0u8; 32];
            let mut dst = [0u8; 32];
            let mut m_chunks = m.chunks_exact(32);
            let mut c_chunks = c.chunks_exact_mut(32);
            for (mi, ci) in m_chunks.by_ref().zip(c_chunks.by_ref()) {
                src.copy_from_slice(mi);
                state.enc(&mut dst, &src);
                ci.copy_from_slice(&dst);
            }
            let rest = m_chunks.remainder();
            if !rest.is_empty() {
                src.fill(0);
                src[..rest.len()].copy_from_slice(rest);
                state.enc(&mut dst, &src);
                c_chunks.into_remainder().copy_from_slice(&dst[..rest.len()]);
            }
            state.mac(ad.len(), mlen)
        }

        /// Encrypts a message in-place using ROCCA
        /// # Arguments
        /// * `mc` - Input and output buffer
        /// * `ad` - Associated data
        /// # Returns
        /// The authentication tag.
        pub fn encrypt_in_place(mut self, mc: &mut [u8], ad: &[u8]) -> Tag {
            let state = &mut self.0;
            let mclen = mc.len();
            state.absorb_ad(ad);
            let mut src = [0u8; 32];
            let mut dst = [0u8; 32];
            let mut chunks = mc.chunks_exact_mut(32);
            for chunk in chunks.by_ref() {
                src.copy_from_slice(chunk);
                state.enc(&mut dst, &src);
                chunk.copy_from_slice(&dst);
            }
            let rest = chunks.into_remainder();
            if !rest.is_empty() {
                src.fill(0);
                src[..rest.len()].copy_from_slice(rest);
                state.enc(&mut dst, &src);
                rest.copy_from_slice(&dst[..rest.len()]);
            }
            state.mac(ad.len(), mclen)
        }

        /// Decrypts a message using ROCCA
        /// # Arguments
        /// * `c` - Ciphertext
        /// * `tag` - Authentication tag
        /// * `ad` - Associated data
        /// # Returns
        /// Decrypted message.
        #[cfg(feature = "std")]
        pub fn decrypt(self, c: &[u8], tag: &Tag, ad: &[u8]) -> Result<Vec<u8>, Error> {
            let mut m = vec![0u8; c.len()];
            self.decrypt_detached(&mut m, c, tag, ad)?;
            Ok(m)
        }

        /// Decrypts a message using ROCCA, writing the plaintext into a
        /// caller-supplied buffer.
        ///
        /// On authentication failure, `m` is filled with the byte `0xaa` and
        /// must not be used.
        /// # Arguments
        /// * `m` - Plaintext output buffer; must be as long as `c`
        /// * `c` - Ciphertext
        /// * `tag` - Authentication tag
        /// * `ad` - Associated data
        /// # Panics
        /// Panics if `m.len() != c.len()`.
        pub fn decrypt_detached(
            mut self,
            m: &mut [u8],
            c: &[u8],
            tag: &Tag,
            ad: &[u8],
        ) -> Result<(), Error> {
            assert_eq!(m.len(), c.len());
            let state = &mut self.0;
            let clen = c.len();
            state.absorb_ad(ad);
            let mut src = [0u8; 32];
            let mut dst = [0u8; 32];
            let mut c_chunks = c.chunks_exact(32);
            let mut m_chunks = m.chunks_exact_mut(32);
            for (ci, mi) in c_chunks.by_ref().zip(m_chunks.by_ref()) {
                src.copy_from_slice(ci);
                state.dec(&mut dst, &src);
                mi.copy_from_slice(&dst);
            }
            let rest = c_chunks.remainder();
            if !rest.is_empty() {
                src.fill(0);
                src[..rest.len()].copy_from_slice(rest);
                state.dec_partial(&mut dst[..rest.len()], &src);
                m_chunks.into_remainder().copy_from_slice(&dst[..rest.len()]);
            }
            let tag2 = state.mac(ad.len(), clen);
            let mut acc = 0;
            for (a, b) in tag.iter().zip(tag2.iter()) {
                acc |= a ^ b;
            }
            if acc != 0 {
                m.fill(0xaa);
                return Err(Error::InvalidTag);
            }
            Ok(())
        }

        /// Decrypts a message in-place using ROCCA
        ///
        /// On authentication failure, `mc` is filled with the byte `0xaa` and
        /// must not be used.
        /// # Arguments
        /// * `mc` - Input and output buffer
        /// * `tag` - Authentication tag
        /// * `ad` - Associated data
        pub fn decrypt_in_place(
            mut self,
            mc: &mut [u8],
            tag: &Tag,
            ad: &[u8],
        ) -> Result<(), Error> {
            let state = &mut self.0;
            let mclen = mc.len();
            state.absorb_ad(ad);
            let mut src = [0u8; 32];
            let mut dst = [0u8; 32];
            let mut chunks = mc.chunks_exact_mut(32);
            for chunk in chunks.by_ref() {
                src.copy_from_slice(chunk);
                state.dec(&mut dst, &src);
                chunk.copy_from_slice(&dst);
            }
            let rest = chunks.into_remainder();
            if !rest.is_empty() {
                src.fill(0);
                src[..rest.len()].copy_from_slice(rest);
                state.dec_partial(&mut dst[..rest.len()], &src);
                rest.copy_from_slice(&dst[..rest.len()]);
            }
            let tag2 = state.mac(ad.len(), mclen);
            let mut acc = 0;
            for (a, b) in tag.iter().zip(tag2.iter()) {
                acc |= a ^ b;
            }
            if acc != 0 {
                mc.fill(0xaa);
                return Err(Error::InvalidTag);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rocca::{Error, Rocca};

    use ct_codecs::{Decoder, Hex};

    #[test]
    #[cfg(feature = "std")]
    fn test_rocca() {
        let m = [0u8; 64];
        let ad = [0u8; 32];
        let key = [0u8; 32];
        let nonce = [0u8; 16];

        let (c, tag) = Rocca::new(&nonce, &key).encrypt(&m, &ad);
        let expected_tag = Hex::decode_to_vec("cc728c8baedd36f14cf8938e9e0719bf", None).unwrap();
        assert_eq!(tag, expected_tag[..]);
        assert_eq!(c[0], 0x15);

        let m2 = Rocca::new(&nonce, &key).decrypt(&c, &tag, &ad).unwrap();
        assert_eq!(m2, m);
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_rocca_empty() {
        let key = [0u8; 32];
        let nonce = [0u8; 16];

        let (c, tag) = Rocca::new(&nonce, &key).encrypt(&[], &[]);
        assert!(c.is_empty());
        let expected_tag = Hex::decode_to_vec("2ee37e014157fa6a24c80f13996c77bb", None).unwrap();
        assert_eq!(tag, expected_tag[..]);

        let m = Rocca::new(&nonce, &key).decrypt(&c, &tag, &[]).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_rocca_partial_block() {
        let mut m = [0u8; 33];
        for (i, b) in m.iter_mut().enumerate() {
            *b = i as u8;
        }
        let key = [0u8; 32];
        let nonce = [0u8; 16];

        let (c, tag) = Rocca::new(&nonce, &key).encrypt(&m, &[]);
        assert_eq!(c.len(), m.len());

        let m2 = Rocca::new(&nonce, &key).decrypt(&c, &tag, &[]).unwrap();
        assert_eq!(m2, m);
    }

    #[test]
    fn test_rocca_ad() {
        let m = [0x41u8; 1000];
        let ad = b"associated data";
        let key = [0u8; 32];
        let nonce = [0u8; 16];

        let mut mc = m.to_vec();
        let tag = Rocca::new(&nonce, &key).encrypt_in_place(&mut mc, ad);
        Rocca::new(&nonce, &key)
            .decrypt_in_place(&mut mc, &tag, ad)
            .unwrap();
        assert_eq!(mc[0], 0x41);
        assert_eq!(mc, m);
    }

    #[test]
    fn test_rocca_in_place() {
        let m = [0u8; 64];
        let ad = [0u8; 32];
        let key = [0u8; 32];
        let nonce = [0u8; 16];

        let mut mc = m.to_vec();
        let tag = Rocca::new(&nonce, &key).encrypt_in_place(&mut mc, &ad);
        let expected_tag = Hex::decode_to_vec("cc728c8baedd36f14cf8938e9e0719bf", None).unwrap();
        assert_eq!(tag, expected_tag[..]);
        assert_eq!(mc[0], 0x15);

        Rocca::new(&nonce, &key)
            .decrypt_in_place(&mut mc, &tag, &ad)
            .unwrap();
        assert_eq!(mc, m);
    }

    #[test]
    fn test_rocca_in_place_small() {
        let m = [0u8; 6];
        let ad = [0u8; 32];
        let key = [0u8; 32];
        let nonce = [0u8; 16];

        let mut mc = m.to_vec();
        let tag = Rocca::new(&nonce, &key).encrypt_in_place(&mut mc, &ad);
        Rocca::new(&nonce, &key)
            .decrypt_in_place(&mut mc, &tag, &ad)
            .unwrap();
        assert_eq!(mc, m);
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_rocca_tamper() {
        let m = [7u8; 48];
        let ad = b"header";
        let key = [0u8; 32];
        let nonce = [0u8; 16];

        let (c, tag) = Rocca::new(&nonce, &key).encrypt(&m, ad);

        let mut bad_tag = tag;
        bad_tag[0] ^= 1;
        let mut out = [0u8; 48];
        let res = Rocca::new(&nonce, &key).decrypt_detached(&mut out, &c, &bad_tag, ad);
        assert_eq!(res, Err(Error::InvalidTag));
        assert!(out.iter().all(|&b| b == 0xaa));

        let mut bad_c = c.clone();
        bad_c[5] ^= 0x80;
        assert!(Rocca::new(&nonce, &key).decrypt(&bad_c, &tag, ad).is_err());

        assert!(Rocca::new(&nonce, &key).decrypt(&c, &tag, b"headex").is_err());

        let mut bad_nonce = nonce;
        bad_nonce[15] ^= 2;
        assert!(Rocca::new(&bad_nonce, &key).decrypt(&c, &tag, ad).is_err());

        let mut bad_key = key;
        bad_key[31] ^= 4;
        assert!(Rocca::new(&nonce, &bad_key).decrypt(&c, &tag, ad).is_err());
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_rocca_paths_agree() {
        let m = [0x5au8; 75];
        let ad = [3u8; 17];
        let key = [2u8; 32];
        let nonce = [9u8; 16];

        let (c, tag) = Rocca::new(&nonce, &key).encrypt(&m, &ad);

        let mut c2 = [0u8; 75];
        let tag2 = Rocca::new(&nonce, &key).encrypt_detached(&mut c2, &m, &ad);
        assert_eq!(c, c2);
        assert_eq!(tag, tag2);

        let mut mc = m.to_vec();
        let tag3 = Rocca::new(&nonce, &key).encrypt_in_place(&mut mc, &ad);
        assert_eq!(c, mc);
        assert_eq!(tag, tag3);

        let mut m2 = [0u8; 75];
        Rocca::new(&nonce, &key)
            .decrypt_detached(&mut m2, &c, &tag, &ad)
            .unwrap();
        assert_eq!(m2, m);
    }
}

pub use self::rocca::*;
