use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};
use crate::error::{AppError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// The size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// The size of the CBC initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// A secure key wrapper that ensures the key is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureKey([u8; KEY_SIZE]);

impl SecureKey {
    /// Creates a new `SecureKey` from a byte array.
    ///
    /// # Arguments
    ///
    /// * `key` - A 32-byte array representing the AES-256 key.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Derives a key from a shared secret by hashing it with SHA-256.
    ///
    /// The same secret always yields the same key.
    pub fn derive(secret: &str) -> Self {
        let mut digest: [u8; KEY_SIZE] = Sha256::digest(secret.as_bytes()).into();
        let key = Self::new(digest);
        digest.zeroize();
        key
    }

    /// Returns a reference to the key as a byte array.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Generates a new random initialization vector.
///
/// # Returns
///
/// A 16-byte array from the OS random source.
pub fn generate_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypts a plaintext using AES-256-CBC with PKCS#7 padding.
///
/// # Arguments
///
/// * `key` - The AES-256 key.
/// * `iv` - The initialization vector. Must never be reused with the same key.
/// * `plaintext` - The data to encrypt.
///
/// # Returns
///
/// The ciphertext, a whole number of blocks long.
pub fn encrypt(key: &SecureKey, iv: &[u8; IV_SIZE], plaintext: &[u8]) -> Vec<u8> {
    Aes256CbcEnc::new(key.as_bytes().into(), iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypts a ciphertext using AES-256-CBC with PKCS#7 padding.
///
/// Fails when the ciphertext is not block aligned or the padding does not check out,
/// which is what a wrong key or a tampered last block usually produces.
pub fn decrypt(key: &SecureKey, iv: &[u8; IV_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
    Aes256CbcDec::new(key.as_bytes().into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|e| AppError::Encryption(format!("Decryption failed: {}", e)))
}
