use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::Identity;
use crate::consts::{SESSION_TTL_MS, now_ms};

type HmacSha256 = Hmac<Sha256>;

/// Payload of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub email: String,
    /// Issued-at, milliseconds since epoch.
    pub iat: u64,
    /// Expiration, milliseconds since epoch.
    pub exp: u64,
}

impl SessionClaims {
    pub fn is_expired(&self) -> bool {
        now_ms() >= self.exp
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Issues and checks `<claims>.<signature>` tokens, both parts base64url.
pub struct SessionSigner {
    key: Vec<u8>,
    ttl_ms: u64,
}

impl SessionSigner {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            ttl_ms: SESSION_TTL_MS,
        }
    }

    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Generate a random 32-byte secret, base64url encoded.
    pub fn generate_secret() -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 32] = rng.random();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length")
    }

    pub fn issue(&self, identity: &Identity) -> String {
        let iat = now_ms();
        self.sign(&SessionClaims {
            sub: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            iat,
            exp: iat.saturating_add(self.ttl_ms),
        })
    }

    /// Sign arbitrary claims. `issue` is the usual entry point.
    pub fn sign(&self, claims: &SessionClaims) -> String {
        // Serializing a struct of strings and integers cannot fail
        let json = serde_json::to_vec(claims).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{payload}.{signature}")
    }

    /// Claims of a valid, unexpired token. Anything else is `None`.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let (payload, signature) = token.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: SessionClaims = serde_json::from_slice(&json).ok()?;
        if claims.is_expired() {
            return None;
        }
        Some(claims)
    }
}
