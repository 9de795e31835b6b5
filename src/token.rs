//! Tracking token encryption.
//!
//! The `/r/{token}` scan path carries an opaque, URL-safe token that
//! encodes the campaign and flyer ids. AES-256-GCM authenticated
//! encryption, so a tampered or truncated token fails decryption instead
//! of resolving to the wrong flyer. Layout: base64url(nonce || ciphertext).

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FlyerlinkError, Result};

const NONCE_LEN: usize = 12;

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    c: Uuid,
    f: Uuid,
}

pub struct TokenCodec {
    cipher: Aes256Gcm,
}

impl TokenCodec {
    /// Key is base64 (standard alphabet) and must decode to exactly 32
    /// bytes.
    pub fn from_base64_key(key_b64: &str) -> Result<Self> {
        let key_bytes = STANDARD
            .decode(key_b64.trim())
            .map_err(|e| FlyerlinkError::token(format!("Token key is not valid base64: {}", e)))?;

        if key_bytes.len() != 32 {
            return Err(FlyerlinkError::token(format!(
                "Token key must decode to 32 bytes, got {}",
                key_bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| FlyerlinkError::token(format!("Failed to build cipher: {}", e)))?;

        Ok(TokenCodec { cipher })
    }

    pub fn encrypt(&self, campaign_id: Uuid, flyer_id: Uuid) -> Result<String> {
        let payload = serde_json::to_vec(&TokenPayload {
            c: campaign_id,
            f: flyer_id,
        })?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, payload.as_ref())
            .map_err(|e| FlyerlinkError::token(format!("Encryption failed: {}", e)))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    /// Returns `(campaign_id, flyer_id)`.
    pub fn decrypt(&self, token: &str) -> Result<(Uuid, Uuid)> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| FlyerlinkError::token("Invalid token encoding".to_string()))?;

        if raw.len() <= NONCE_LEN {
            return Err(FlyerlinkError::token("Token too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| FlyerlinkError::token("Token decryption failed".to_string()))?;

        let payload: TokenPayload = serde_json::from_slice(&plaintext)
            .map_err(|_| FlyerlinkError::token("Invalid token payload".to_string()))?;

        Ok((payload.c, payload.f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    fn test_codec() -> TokenCodec {
        TokenCodec::from_base64_key(&STANDARD.encode([7u8; 32])).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let codec = test_codec();
        let campaign = Uuid::new_v4();
        let flyer = Uuid::new_v4();

        let token = codec.encrypt(campaign, flyer).unwrap();
        let (c, f) = codec.decrypt(&token).unwrap();

        assert_eq!(c, campaign);
        assert_eq!(f, flyer);
    }

    #[test]
    fn test_token_is_url_safe() {
        let codec = test_codec();
        let token = codec.encrypt(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = test_codec();
        let token = codec.encrypt(Uuid::new_v4(), Uuid::new_v4()).unwrap();

        let mut bytes = token.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(codec.decrypt(&tampered).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let codec = test_codec();
        assert!(codec.decrypt("not-a-token").is_err());
        assert!(codec.decrypt("").is_err());
    }

    #[test]
    fn test_bad_key_length_rejected() {
        let short = STANDARD.encode([1u8; 16]);
        assert!(TokenCodec::from_base64_key(&short).is_err());
    }
}
