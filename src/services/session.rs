use std::sync::Arc;

use crate::crypto::aes::{self, SecureKey, IV_SIZE};
use crate::error::{AppError, Result};
use crate::models::session::SessionRecord;

/// Outcome of decoding a session token.
///
/// Every failure collapses into `Invalid`; callers get no hint of why a token was
/// rejected and must treat it exactly like a missing session.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The token decrypted and parsed into a well-formed record.
    Valid(SessionRecord),
    /// Missing, malformed, tampered, or encrypted under another key.
    Invalid,
}

impl Decoded {
    /// Returns the record if the token was valid.
    pub fn into_record(self) -> Option<SessionRecord> {
        match self {
            Decoded::Valid(record) => Some(record),
            Decoded::Invalid => None,
        }
    }
}

/// Turns [`SessionRecord`]s into opaque cookie values and back.
///
/// Token format: `<32 lowercase hex IV>:<lowercase hex AES-256-CBC ciphertext>`,
/// where the plaintext is the record's JSON form.
#[derive(Clone)]
pub struct SessionCodec {
    key: Arc<SecureKey>,
}

impl SessionCodec {
    /// Creates a codec whose key is the SHA-256 digest of `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::new(SecureKey::derive(secret)),
        }
    }

    /// Encrypts a record into a token. A fresh IV is drawn on every call.
    pub fn encode(&self, record: &SessionRecord) -> Result<String> {
        let json = sonic_rs::to_string(record)
            .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

        let iv = aes::generate_iv();
        let ciphertext = aes::encrypt(&self.key, &iv, json.as_bytes());

        Ok(format!("{}:{}", hex::encode(iv), hex::encode(ciphertext)))
    }

    /// Decrypts a token. Never fails loudly: anything wrong yields [`Decoded::Invalid`].
    pub fn decode(&self, token: &str) -> Decoded {
        match self.try_decode(token) {
            Ok(record) => Decoded::Valid(record),
            Err(e) => {
                tracing::debug!("🔒 Rejected session token: {}", e);
                Decoded::Invalid
            }
        }
    }

    fn try_decode(&self, token: &str) -> Result<SessionRecord> {
        let (iv_hex, ciphertext_hex) = token
            .split_once(':')
            .filter(|(iv, data)| !iv.is_empty() && !data.is_empty())
            .ok_or_else(|| AppError::Validation("Malformed session token".to_string()))?;

        let mut iv = [0u8; IV_SIZE];
        hex::decode_to_slice(iv_hex, &mut iv)
            .map_err(|e| AppError::Validation(format!("Invalid IV: {}", e)))?;

        let ciphertext = hex::decode(ciphertext_hex)
            .map_err(|e| AppError::Validation(format!("Invalid ciphertext: {}", e)))?;

        let plaintext = aes::decrypt(&self.key, &iv, &ciphertext)?;
        let json = String::from_utf8(plaintext)
            .map_err(|_| AppError::Validation("Session payload is not UTF-8".to_string()))?;

        // The parser error quotes the input, which holds the tokens.
        sonic_rs::from_str::<SessionRecord>(&json)
            .map_err(|_| AppError::Validation("Invalid session payload".to_string()))
    }
}
