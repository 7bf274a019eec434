pub mod cipher;
pub mod claims;
pub mod decoder;
pub mod gate;
pub mod permission;
pub mod route;

pub use cipher::TokenCipher;
pub use claims::Claims;
pub use decoder::TokenDecoder;
pub use gate::PermissionGate;
pub use permission::{PermissionGroup, PermissionId, PermissionSet};
pub use route::{RouteDecision, RouteGuard};

use thiserror::Error;

/// Failures turning a stored credential into claims
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is empty")]
    Empty,

    #[error("Token is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Cipher key must be 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Cipher IV must be 16 bytes of hex: {0}")]
    InvalidIv(String),

    #[error("Token ciphertext is malformed or was sealed with another key")]
    Padding,

    #[error("Decrypted token is not UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Decrypted token is not a JWT: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
