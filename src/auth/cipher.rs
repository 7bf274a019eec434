//! Symmetric envelope around the stored credential.
//!
//! The backend seals the JWT with AES-CBC, PKCS#7 padding, a pre-shared key
//! and an all-zero IV, then base64-encodes the ciphertext. The parameters are
//! kept bit-for-bit so tokens issued by the existing backend still open. Any
//! holder of the key can forge a token, so what comes out of here drives UI
//! visibility only.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::{engine::general_purpose, Engine as _};

use super::TokenError;
use crate::config::TokenConfig;

const IV_LEN: usize = 16;

#[derive(Clone)]
pub struct TokenCipher {
    key: Vec<u8>,
    iv: [u8; IV_LEN],
}

impl TokenCipher {
    /// Build a cipher from raw key bytes; the key length picks AES-128/192/256
    pub fn new(key: &[u8], iv: [u8; IV_LEN]) -> Result<Self, TokenError> {
        match key.len() {
            16 | 24 | 32 => Ok(Self { key: key.to_vec(), iv }),
            len => Err(TokenError::InvalidKeyLength(len)),
        }
    }

    /// Cipher with the key's UTF-8 bytes and a zero IV
    pub fn with_zero_iv(key: &str) -> Result<Self, TokenError> {
        Self::new(key.as_bytes(), [0u8; IV_LEN])
    }

    pub fn from_config(config: &TokenConfig) -> Result<Self, TokenError> {
        let iv_bytes = hex::decode(config.cipher_iv_hex.trim())
            .map_err(|e| TokenError::InvalidIv(e.to_string()))?;
        let iv: [u8; IV_LEN] = iv_bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| TokenError::InvalidIv(format!("{} bytes", bytes.len())))?;

        Self::new(config.cipher_key.as_bytes(), iv)
    }

    /// Decrypt a base64 ciphertext into the inner token string
    pub fn open(&self, sealed: &str) -> Result<String, TokenError> {
        let sealed = sealed.trim();
        if sealed.is_empty() {
            return Err(TokenError::Empty);
        }

        let ciphertext = general_purpose::STANDARD.decode(sealed)?;

        let plaintext = match self.key.len() {
            16 => cbc::Decryptor::<Aes128>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| TokenError::InvalidKeyLength(self.key.len()))?
                .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext),
            24 => cbc::Decryptor::<Aes192>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| TokenError::InvalidKeyLength(self.key.len()))?
                .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext),
            32 => cbc::Decryptor::<Aes256>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| TokenError::InvalidKeyLength(self.key.len()))?
                .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext),
            len => return Err(TokenError::InvalidKeyLength(len)),
        }
        .map_err(|_| TokenError::Padding)?;

        Ok(String::from_utf8(plaintext)?)
    }

    /// Encrypt a token string the way the backend does
    pub fn seal(&self, plaintext: &str) -> Result<String, TokenError> {
        let data = plaintext.as_bytes();

        let ciphertext = match self.key.len() {
            16 => cbc::Encryptor::<Aes128>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| TokenError::InvalidKeyLength(self.key.len()))?
                .encrypt_padded_vec_mut::<Pkcs7>(data),
            24 => cbc::Encryptor::<Aes192>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| TokenError::InvalidKeyLength(self.key.len()))?
                .encrypt_padded_vec_mut::<Pkcs7>(data),
            32 => cbc::Encryptor::<Aes256>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| TokenError::InvalidKeyLength(self.key.len()))?
                .encrypt_padded_vec_mut::<Pkcs7>(data),
            len => return Err(TokenError::InvalidKeyLength(len)),
        };

        Ok(general_purpose::STANDARD.encode(ciphertext))
    }
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher")
            .field("key_bits", &(self.key.len() * 8))
            .finish_non_exhaustive()
    }
}
