//! The credential gate: verifies a login and issues a signed session.

pub mod session;

pub use session::{SessionClaims, SessionSigner};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOGIN_EMAIL: &str = "test@editsync.com";
pub const DEFAULT_LOGIN_PASSWORD: &str = "1234";
pub const DEFAULT_LOGIN_NAME: &str = "Test User";

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Checks submitted credentials. Swap in an account store by implementing this.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(None)` means the credentials were rejected.
    async fn verify(&self, email: &str, password: &str) -> Result<Option<Identity>>;
}

/// A single fixed email/password pair. Plain-text comparison, no hashing.
pub struct StaticCredentials {
    email: String,
    password: String,
    identity: Identity,
}

impl StaticCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            identity: Identity {
                id: "1".to_string(),
                name: DEFAULT_LOGIN_NAME.to_string(),
                email: email.clone(),
            },
            email,
            password: password.into(),
        }
    }

    /// Override the display name handed out on success.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.identity.name = name.into();
        self
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_EMAIL, DEFAULT_LOGIN_PASSWORD)
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, email: &str, password: &str) -> Result<Option<Identity>> {
        if email == self.email && password == self.password {
            return Ok(Some(self.identity.clone()));
        }
        Ok(None)
    }
}
