use jsonwebtoken::{decode, DecodingKey, Validation};

use super::{Claims, TokenCipher, TokenError};
use crate::config::TokenConfig;

/// Opens a stored credential and reads the JWT inside it.
///
/// The JWT signature is not checked and `exp` is not enforced: the decoded
/// claims only decide what the console shows.
#[derive(Debug, Clone)]
pub struct TokenDecoder {
    cipher: TokenCipher,
}

impl TokenDecoder {
    pub fn new(cipher: TokenCipher) -> Self {
        Self { cipher }
    }

    pub fn from_config(config: &TokenConfig) -> Result<Self, TokenError> {
        Ok(Self::new(TokenCipher::from_config(config)?))
    }

    pub fn cipher(&self) -> &TokenCipher {
        &self.cipher
    }

    /// Decrypt and decode a stored credential
    pub fn decode(&self, sealed: &str) -> Result<Claims, TokenError> {
        let jwt = self.cipher.open(sealed)?;
        decode_jwt(&jwt)
    }
}

/// Read a JWT payload without verifying it
pub fn decode_jwt(jwt: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(jwt.trim(), &DecodingKey::from_secret(&[]), &validation)?;
    Ok(token_data.claims)
}
