pub mod credentials;
pub mod tokens;

pub use credentials::Argon2CredentialHasher;
pub use tokens::JwtTokenService;
