use async_trait::async_trait;

use crate::domain::user::models::LoginResult;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::TokenClaims;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::CredentialError;
use crate::user::errors::IdentityError;
use crate::user::errors::RepositoryError;
use crate::user::errors::TokenError;

/// Port for identity use cases.
///
/// Every operation returns a [`UserProfile`], never the stored [`User`].
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new user account.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `PasswordHashError` - Password could not be hashed
    /// * `InvalidEmail` / `InvalidFirstName` / `InvalidLastName` - Required field is empty
    /// * `UserCreationError` - Store write failed
    async fn register(&self, command: RegisterCommand) -> Result<UserProfile, IdentityError>;

    /// Authenticate with email and password and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `TokenGenerationError` - Token could not be signed
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, IdentityError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    async fn get_user(&self, user_id: UserId) -> Result<UserProfile, IdentityError>;

    /// Retrieve the profile of the authenticated user.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    async fn get_user_profile(&self, user_id: UserId) -> Result<UserProfile, IdentityError>;

    /// Partially update an existing user.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `InvalidEmail` / `InvalidFirstName` / `InvalidLastName` - Result would break invariants
    /// * `UserCreationError` - Store write failed
    async fn update_user(
        &self,
        user_id: UserId,
        command: UpdateUserCommand,
    ) -> Result<UserProfile, IdentityError>;
}

/// Persistence operations for the user aggregate.
///
/// Email uniqueness must be enforced by the store itself; it is the only
/// guard against two concurrent registrations of the same address.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user and return its assigned identifier.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Database` - Database operation failed
    async fn create(&self, user: &NewUser) -> Result<UserId, RepositoryError>;

    /// Retrieve user by email address (exact, case-sensitive match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Overwrite every mutable column of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DuplicateEmail` - Email collides with another user
    /// * `Database` - Database operation failed
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;

    /// Check whether a user with this email exists.
    async fn exists(&self, email: &str) -> Result<bool, RepositoryError>;
}

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext password with a fresh random salt.
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    /// Check a plaintext password against a stored digest.
    ///
    /// Returns false on mismatch and on a malformed digest.
    fn verify(&self, digest: &str, plaintext: &str) -> bool;
}

/// Issuing and validating signed, time-bound identity tokens.
pub trait TokenService: Send + Sync + 'static {
    /// Issue a token for the given identity.
    fn issue(&self, user_id: UserId, email: &str) -> Result<String, TokenError>;

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `Invalid` - Bad signature, expired, malformed or wrong algorithm
    fn validate(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
