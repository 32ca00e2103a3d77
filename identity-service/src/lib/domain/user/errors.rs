use thiserror::Error;

/// Error for credential hashing operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// Error for token operations
///
/// Validation failures carry no reason: signature, expiry, structure and
/// algorithm problems are indistinguishable to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token generation failed: {0}")]
    Generation(String),

    #[error("Invalid token")]
    Invalid,
}

/// Error for user persistence operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Top-level error for all identity operations.
///
/// Every variant has a stable machine-readable [`code`](IdentityError::code)
/// so callers branch on the code rather than on message text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Email is required")]
    InvalidEmail,

    #[error("First name is required")]
    InvalidFirstName,

    #[error("Last name is required")]
    InvalidLastName,

    #[error("Invalid birthday format (YYYY-MM-DD)")]
    InvalidBirthday,

    #[error("Failed to hash password")]
    PasswordHashError,

    #[error("Failed to create user")]
    UserCreationError,

    #[error("Failed to generate token")]
    TokenGenerationError,

    // Opaque store failure, detail kept for logs only
    #[error("Repository error: {0}")]
    Repository(String),
}

impl IdentityError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::UserNotFound => "USER_NOT_FOUND",
            IdentityError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            IdentityError::InvalidCredentials => "INVALID_CREDENTIALS",
            IdentityError::InvalidToken => "INVALID_TOKEN",
            IdentityError::Unauthorized => "UNAUTHORIZED",
            IdentityError::InvalidEmail => "INVALID_EMAIL",
            IdentityError::InvalidFirstName => "INVALID_FIRST_NAME",
            IdentityError::InvalidLastName => "INVALID_LAST_NAME",
            IdentityError::InvalidBirthday => "INVALID_BIRTHDAY",
            IdentityError::PasswordHashError => "PASSWORD_HASH_ERROR",
            IdentityError::UserCreationError => "USER_CREATION_ERROR",
            IdentityError::TokenGenerationError => "TOKEN_GENERATION_ERROR",
            IdentityError::Repository(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<TokenError> for IdentityError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Generation(_) => IdentityError::TokenGenerationError,
            TokenError::Invalid => IdentityError::InvalidToken,
        }
    }
}

impl From<RepositoryError> for IdentityError {
    fn from(err: RepositoryError) -> Self {
        IdentityError::Repository(err.to_string())
    }
}
