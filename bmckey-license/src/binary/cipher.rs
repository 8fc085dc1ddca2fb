//! Key derivation and AES-128-CBC for binary product keys.
//!
//! Every key and IV is derived the same way: the lowercase hex MD5 digest of
//! some keying material is split in half, the first 16 characters becoming
//! the IV and the last 16 the AES key. The ASCII characters themselves are
//! the key bytes.

use crate::error::{LicenseError, LicenseResult};
use aes::cipher::{
    block_padding::Pkcs7, BlockDecrypt, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
};
use aes::Aes128;
use bmckey_net::MacAddress;
use md5::{Digest, Md5};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

pub(crate) const BLOCK_SIZE: usize = 16;

const BLOCK_KEY_SUFFIX: &str = concat!("ej", "mb");
const SECRET_KEY_SUFFIX: &str = concat!("am", "ac");

/// AES key and IV derived from keying material.
pub(crate) struct KeyIv {
    key: [u8; BLOCK_SIZE],
    iv: [u8; BLOCK_SIZE],
}

impl KeyIv {
    pub(crate) fn derive(material: &str) -> Self {
        let digest = hex::encode(Md5::digest(material.as_bytes()));
        let digest = digest.as_bytes();

        let mut iv = [0u8; BLOCK_SIZE];
        let mut key = [0u8; BLOCK_SIZE];
        iv.copy_from_slice(&digest[..BLOCK_SIZE]);
        key.copy_from_slice(&digest[BLOCK_SIZE..]);
        Self { key, iv }
    }

    /// Key for the encrypted block of a product key bound to `mac`.
    pub(crate) fn for_block(mac: &MacAddress) -> Self {
        Self::derive(&format!("{}{BLOCK_KEY_SUFFIX}", mac.to_upper_hex()))
    }
}

pub(crate) fn encrypt(plaintext: &[u8], k: &KeyIv) -> Vec<u8> {
    Aes128CbcEnc::new(&k.key.into(), &k.iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

pub(crate) fn decrypt(ciphertext: &[u8], k: &KeyIv) -> LicenseResult<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(LicenseError::Decryption(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_SIZE}",
            ciphertext.len()
        )));
    }

    Aes128CbcDec::new(&k.key.into(), &k.iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| LicenseError::Decryption("invalid PKCS#7 padding".to_string()))
}

/// Decrypts only the first ciphertext block, without touching padding.
pub(crate) fn decrypt_first_block(ciphertext: &[u8], k: &KeyIv) -> Option<[u8; BLOCK_SIZE]> {
    let first = ciphertext.get(..BLOCK_SIZE)?;
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(first);

    let mut ga = aes::Block::from(block);
    Aes128::new(&k.key.into()).decrypt_block(&mut ga);
    for (b, iv) in ga.iter_mut().zip(k.iv) {
        *b ^= iv;
    }
    block.copy_from_slice(&ga);
    Some(block)
}

/// Derives the 32 ASCII hex characters stored as a key's secret data.
///
/// `material` is the per-key part of the keying material; the MAC prefix is
/// added here.
pub(crate) fn secret_data(mac: &MacAddress, material: &str) -> Vec<u8> {
    let mac_upper = mac.to_upper_hex();
    let k = KeyIv::derive(&format!("{mac_upper}{SECRET_KEY_SUFFIX}{material}"));
    let ciphertext = encrypt(mac_upper.as_bytes(), &k);
    hex::encode(Md5::digest(&ciphertext)).into_bytes()
}
