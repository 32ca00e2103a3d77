use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::LoginResult;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::IdentityError;
use crate::user::errors::RepositoryError;
use crate::user::ports::CredentialHasher;
use crate::user::ports::IdentityServicePort;
use crate::user::ports::TokenService;
use crate::user::ports::UserRepository;

/// Domain service implementation for identity use cases.
///
/// Concrete implementation of IdentityServicePort with dependency injection.
/// Errors are returned to the caller, never logged or retried here.
pub struct IdentityService<UR, CH, TS>
where
    UR: UserRepository,
    CH: CredentialHasher,
    TS: TokenService,
{
    repository: Arc<UR>,
    hasher: Arc<CH>,
    tokens: Arc<TS>,
}

impl<UR, CH, TS> IdentityService<UR, CH, TS>
where
    UR: UserRepository,
    CH: CredentialHasher,
    TS: TokenService,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `hasher` - Password hashing implementation
    /// * `tokens` - Access token implementation
    pub fn new(repository: Arc<UR>, hasher: Arc<CH>, tokens: Arc<TS>) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl<UR, CH, TS> IdentityServicePort for IdentityService<UR, CH, TS>
where
    UR: UserRepository,
    CH: CredentialHasher,
    TS: TokenService,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserProfile, IdentityError> {
        if self.repository.exists(&command.email).await? {
            return Err(IdentityError::UserAlreadyExists);
        }

        let password_hash = self
            .hasher
            .hash(&command.password)
            .map_err(|_| IdentityError::PasswordHashError)?;

        let new_user = NewUser::new(
            command.email,
            password_hash,
            command.first_name,
            command.last_name,
            command.phone,
            command.birthday,
            Utc::now(),
        )?;

        // The existence check above is not atomic with the insert; the store's
        // unique constraint settles concurrent registrations of one email.
        let user_id = self
            .repository
            .create(&new_user)
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateEmail(_) => IdentityError::UserAlreadyExists,
                RepositoryError::NotFound(_) | RepositoryError::Database(_) => {
                    IdentityError::UserCreationError
                }
            })?;

        Ok(UserProfile::from(&new_user.with_id(user_id)))
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, IdentityError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !self.hasher.verify(&user.password_hash, password) {
            return Err(IdentityError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id, &user.email)
            .map_err(|_| IdentityError::TokenGenerationError)?;

        Ok(LoginResult {
            token,
            user: UserProfile::from(&user),
        })
    }

    async fn get_user(&self, user_id: UserId) -> Result<UserProfile, IdentityError> {
        self.repository
            .find_by_id(user_id)
            .await?
            .map(|ref user| UserProfile::from(user))
            .ok_or(IdentityError::UserNotFound)
    }

    async fn get_user_profile(&self, user_id: UserId) -> Result<UserProfile, IdentityError> {
        self.get_user(user_id).await
    }

    async fn update_user(
        &self,
        user_id: UserId,
        command: UpdateUserCommand,
    ) -> Result<UserProfile, IdentityError> {
        let mut user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        command.apply_to(&mut user, Utc::now());
        user.validate_for_update()?;

        // Write failures share the creation error code
        self.repository
            .update(&user)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => IdentityError::UserNotFound,
                RepositoryError::DuplicateEmail(_) | RepositoryError::Database(_) => {
                    IdentityError::UserCreationError
                }
            })?;

        Ok(UserProfile::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::NaiveDate;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::TokenClaims;
    use crate::domain::user::models::User;
    use crate::user::errors::CredentialError;
    use crate::user::errors::TokenError;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: &NewUser) -> Result<UserId, RepositoryError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
            async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
            async fn update(&self, user: &User) -> Result<(), RepositoryError>;
            async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;
            async fn exists(&self, email: &str) -> Result<bool, RepositoryError>;
        }
    }

    mock! {
        pub TestCredentialHasher {}

        impl CredentialHasher for TestCredentialHasher {
            fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;
            fn verify(&self, digest: &str, plaintext: &str) -> bool;
        }
    }

    mock! {
        pub TestTokenService {}

        impl TokenService for TestTokenService {
            fn issue(&self, user_id: UserId, email: &str) -> Result<String, TokenError>;
            fn validate(&self, token: &str) -> Result<TokenClaims, TokenError>;
        }
    }

    type TestService =
        IdentityService<MockTestUserRepository, MockTestCredentialHasher, MockTestTokenService>;

    fn service(
        repository: MockTestUserRepository,
        hasher: MockTestCredentialHasher,
        tokens: MockTestTokenService,
    ) -> TestService {
        IdentityService::new(Arc::new(repository), Arc::new(hasher), Arc::new(tokens))
    }

    fn birthday() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 15).unwrap()
    }

    fn register_command(email: &str) -> RegisterCommand {
        RegisterCommand {
            email: email.to_string(),
            password: "password123".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone: "1234567890".to_string(),
            birthday: birthday(),
        }
    }

    fn stored_user(id: i64) -> User {
        let created_at = Utc::now() - Duration::days(1);
        User {
            id: UserId(id),
            email: "john@example.com".to_string(),
            password_hash: "hashed:password123".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone: "1234567890".to_string(),
            birthday: birthday(),
            created_at,
            updated_at: created_at,
        }
    }

    fn hashing_hasher() -> MockTestCredentialHasher {
        let mut hasher = MockTestCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|plaintext| Ok(format!("hashed:{}", plaintext)));
        hasher
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists()
            .withf(|email| email == "john@example.com")
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_create()
            .withf(|user| {
                user.email == "john@example.com"
                    && user.password_hash == "hashed:password123"
                    && user.created_at == user.updated_at
            })
            .times(1)
            .returning(|_| Ok(UserId(1)));

        let service = service(repository, hashing_hasher(), MockTestTokenService::new());

        let profile = service
            .register(register_command("john@example.com"))
            .await
            .unwrap();

        assert_eq!(profile.id, UserId(1));
        assert_eq!(profile.email, "john@example.com");
        assert_eq!(profile.full_name(), "John Doe");
        assert_eq!(profile.phone, "1234567890");
        assert_eq!(profile.birthday, birthday());
    }

    #[tokio::test]
    async fn test_register_existing_email() {
        let mut repository = MockTestUserRepository::new();
        let mut hasher = MockTestCredentialHasher::new();

        repository
            .expect_exists()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_create().times(0);
        hasher.expect_hash().times(0);

        let service = service(repository, hasher, MockTestTokenService::new());

        let result = service.register(register_command("john@example.com")).await;
        assert_eq!(result.unwrap_err(), IdentityError::UserAlreadyExists);
    }

    #[tokio::test]
    async fn test_register_duplicate_on_insert() {
        let mut repository = MockTestUserRepository::new();

        // Another registration won the race after the existence check
        repository.expect_exists().returning(|_| Ok(false));
        repository
            .expect_create()
            .times(1)
            .returning(|user| Err(RepositoryError::DuplicateEmail(user.email.clone())));

        let service = service(repository, hashing_hasher(), MockTestTokenService::new());

        let result = service.register(register_command("john@example.com")).await;
        assert_eq!(result.unwrap_err(), IdentityError::UserAlreadyExists);
    }

    #[tokio::test]
    async fn test_register_store_failure() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_exists().returning(|_| Ok(false));
        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Database("disk I/O error".to_string())));

        let service = service(repository, hashing_hasher(), MockTestTokenService::new());

        let result = service.register(register_command("john@example.com")).await;
        assert_eq!(result.unwrap_err(), IdentityError::UserCreationError);
    }

    #[tokio::test]
    async fn test_register_hash_failure() {
        let mut repository = MockTestUserRepository::new();
        let mut hasher = MockTestCredentialHasher::new();

        repository.expect_exists().returning(|_| Ok(false));
        repository.expect_create().times(0);
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Err(CredentialError::HashingFailed("out of memory".to_string())));

        let service = service(repository, hasher, MockTestTokenService::new());

        let result = service.register(register_command("john@example.com")).await;
        assert_eq!(result.unwrap_err(), IdentityError::PasswordHashError);
    }

    #[tokio::test]
    async fn test_register_missing_first_name() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_exists().returning(|_| Ok(false));
        repository.expect_create().times(0);

        let service = service(repository, hashing_hasher(), MockTestTokenService::new());

        let mut command = register_command("john@example.com");
        command.first_name = String::new();

        let result = service.register(command).await;
        assert_eq!(result.unwrap_err(), IdentityError::InvalidFirstName);
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();
        let mut hasher = MockTestCredentialHasher::new();
        let mut tokens = MockTestTokenService::new();

        repository
            .expect_find_by_email()
            .withf(|email| email == "john@example.com")
            .times(1)
            .returning(|_| Ok(Some(stored_user(7))));
        hasher
            .expect_verify()
            .withf(|digest, plaintext| digest == "hashed:password123" && plaintext == "password123")
            .times(1)
            .returning(|_, _| true);
        tokens
            .expect_issue()
            .withf(|user_id, email| *user_id == UserId(7) && email == "john@example.com")
            .times(1)
            .returning(|_, _| Ok("signed.token.value".to_string()));

        let service = service(repository, hasher, tokens);

        let result = service.login("john@example.com", "password123").await.unwrap();
        assert_eq!(result.token, "signed.token.value");
        assert_eq!(result.user.id, UserId(7));
        assert_eq!(result.user.email, "john@example.com");
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_are_identical() {
        let mut repository = MockTestUserRepository::new();
        let mut hasher = MockTestCredentialHasher::new();
        let mut tokens = MockTestTokenService::new();

        repository
            .expect_find_by_email()
            .withf(|email| email == "ghost@example.com")
            .returning(|_| Ok(None));
        repository
            .expect_find_by_email()
            .withf(|email| email == "john@example.com")
            .returning(|_| Ok(Some(stored_user(7))));
        hasher.expect_verify().times(1).returning(|_, _| false);
        tokens.expect_issue().times(0);

        let service = service(repository, hasher, tokens);

        let unknown = service.login("ghost@example.com", "password123").await;
        let wrong = service.login("john@example.com", "not-the-password").await;

        assert_eq!(unknown.unwrap_err(), IdentityError::InvalidCredentials);
        assert_eq!(wrong.unwrap_err(), IdentityError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_token_failure() {
        let mut repository = MockTestUserRepository::new();
        let mut hasher = MockTestCredentialHasher::new();
        let mut tokens = MockTestTokenService::new();

        repository
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user(7))));
        hasher.expect_verify().returning(|_, _| true);
        tokens
            .expect_issue()
            .returning(|_, _| Err(TokenError::Generation("bad key".to_string())));

        let service = service(repository, hasher, tokens);

        let result = service.login("john@example.com", "password123").await;
        assert_eq!(result.unwrap_err(), IdentityError::TokenGenerationError);
    }

    #[tokio::test]
    async fn test_login_store_failure_is_opaque() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .returning(|_| Err(RepositoryError::Database("connection reset".to_string())));

        let service = service(
            repository,
            MockTestCredentialHasher::new(),
            MockTestTokenService::new(),
        );

        let error = service
            .login("john@example.com", "password123")
            .await
            .unwrap_err();
        assert_eq!(error.code(), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_get_user_profile_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .withf(|id| *id == UserId(7))
            .times(1)
            .returning(|_| Ok(Some(stored_user(7))));

        let service = service(
            repository,
            MockTestCredentialHasher::new(),
            MockTestTokenService::new(),
        );

        let profile = service.get_user_profile(UserId(7)).await.unwrap();
        assert_eq!(profile.id, UserId(7));
        assert_eq!(profile.email, "john@example.com");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(
            repository,
            MockTestCredentialHasher::new(),
            MockTestTokenService::new(),
        );

        let result = service.get_user(UserId(99)).await;
        assert_eq!(result.unwrap_err(), IdentityError::UserNotFound);
    }

    #[tokio::test]
    async fn test_update_user_first_name_only() {
        let mut repository = MockTestUserRepository::new();
        let original = stored_user(7);
        let original_updated_at = original.updated_at;

        let returned_user = original.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        repository
            .expect_update()
            .withf(move |user| {
                user.first_name == "Jane"
                    && user.last_name == "Doe"
                    && user.phone == "1234567890"
                    && user.birthday == birthday()
                    && user.password_hash == "hashed:password123"
                    && user.updated_at > original_updated_at
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(
            repository,
            MockTestCredentialHasher::new(),
            MockTestTokenService::new(),
        );

        let command = UpdateUserCommand {
            first_name: Some("Jane".to_string()),
            last_name: Some(String::new()),
            phone: None,
            birthday: None,
        };

        let profile = service.update_user(UserId(7), command).await.unwrap();
        assert_eq!(profile.full_name(), "Jane Doe");
        assert_eq!(profile.phone, "1234567890");
        assert_eq!(profile.created_at, original.created_at);
        assert!(profile.updated_at > original_updated_at);
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let service = service(
            repository,
            MockTestCredentialHasher::new(),
            MockTestTokenService::new(),
        );

        let result = service
            .update_user(UserId(7), UpdateUserCommand::default())
            .await;
        assert_eq!(result.unwrap_err(), IdentityError::UserNotFound);
    }

    #[tokio::test]
    async fn test_update_user_store_failure() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_user(7))));
        repository
            .expect_update()
            .times(1)
            .returning(|_| Err(RepositoryError::Database("database is locked".to_string())));

        let service = service(
            repository,
            MockTestCredentialHasher::new(),
            MockTestTokenService::new(),
        );

        let command = UpdateUserCommand {
            phone: Some("0987654321".to_string()),
            ..UpdateUserCommand::default()
        };

        let result = service.update_user(UserId(7), command).await;
        assert_eq!(result.unwrap_err(), IdentityError::UserCreationError);
    }
}
