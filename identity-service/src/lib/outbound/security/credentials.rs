use auth::PasswordHasher;

use crate::user::errors::CredentialError;
use crate::user::ports::CredentialHasher;

/// Credential hasher backed by the Argon2id implementation of the auth library.
#[derive(Debug, Clone, Default)]
pub struct Argon2CredentialHasher {
    hasher: PasswordHasher,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self {
            hasher: PasswordHasher::new(),
        }
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        self.hasher
            .hash(plaintext)
            .map_err(|e| CredentialError::HashingFailed(e.to_string()))
    }

    fn verify(&self, digest: &str, plaintext: &str) -> bool {
        self.hasher.verify(plaintext, digest)
    }
}
