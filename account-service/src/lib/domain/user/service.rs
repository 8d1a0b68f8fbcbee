use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::AvatarColor;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::AVATAR_PALETTE;
use crate::domain::user::models::TOKEN_TYPE;
use crate::user::errors::AccountError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::RandomSource;
use crate::user::ports::UserRepository;
use crate::user::validation;

/// Registration and login over a credential store.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    random: Arc<dyn RandomSource>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hashing and token signing
    /// * `random` - Random source for avatar colours
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            repository,
            authenticator,
            random,
        }
    }

    fn pick_avatar_color(&self) -> AvatarColor {
        AvatarColor::from_palette(self.random.next_index(AVATAR_PALETTE.len()))
    }

    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        let hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(&password)).await??;
        Ok(hash)
    }

    async fn check_password(&self, password: String, stored_hash: String) -> Result<(), AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || authenticator.check_password(&password, &stored_hash))
            .await?
            .map_err(credential_error)
    }

    /// Same hashing cost as `check_password`, for an email with no account.
    async fn check_password_without_account(&self, password: String) -> Result<(), AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || authenticator.check_password_without_account(&password))
            .await?
            .map_err(credential_error)
    }
}

fn credential_error(err: AuthenticationError) -> AccountError {
    match err {
        AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
        AuthenticationError::PasswordError(e) => AccountError::Password(e),
        AuthenticationError::TokenError(e) => AccountError::Unknown(e.to_string()),
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserId, AccountError> {
        let name = DisplayName::parse(command.name.as_deref())?;
        let email = EmailAddress::parse(command.email.as_deref())?;
        let password = validation::validate_required(command.password.as_deref(), "Password")?;
        validation::validate_password(password)?;

        // Advisory only; the unique index decides concurrent registrations.
        if self.repository.find_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "Registration rejected: email already in use");
            return Err(AccountError::EmailAlreadyInUse);
        }

        let password_hash = self.hash_password(password.to_string()).await?;

        let user = User {
            id: UserId::new(),
            name,
            email,
            password_hash,
            avatar_color: self.pick_avatar_color(),
            active: true,
            created_at: Utc::now(),
        };

        let created = self.repository.insert(user).await?;
        tracing::info!(user_id = %created.id, email = %created.email, "User registered");

        Ok(created.id)
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, AccountError> {
        let email = EmailAddress::parse(command.email.as_deref())?;
        let password = validation::validate_required(command.password.as_deref(), "Password")?;

        let user = match self.repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                let rejected = self
                    .check_password_without_account(password.to_string())
                    .await;
                tracing::warn!(email = %email, "Login rejected: unknown email");
                return rejected.and(Err(AccountError::InvalidCredentials));
            }
        };

        if let Err(e) = self
            .check_password(password.to_string(), user.password_hash.clone())
            .await
        {
            if matches!(e, AccountError::InvalidCredentials) {
                tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            }
            return Err(e);
        }

        if !user.active {
            tracing::warn!(user_id = %user.id, "Login rejected: account inactive");
            return Err(AccountError::AccountInactive);
        }

        let issued = self
            .authenticator
            .issue_token(&user.id.to_string(), user.email.as_str())
            .map_err(|e| AccountError::Unknown(format!("Token issuance failed: {}", e)))?;

        tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "User logged in");

        Ok(Session {
            access_token: issued.access_token,
            token_type: TOKEN_TYPE,
            expires_at: issued.expires_at,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use chrono::Duration;
    use mockall::mock;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;
            async fn insert(&self, user: User) -> Result<User, AccountError>;
        }
    }

    mock! {
        pub TestRandom {}

        impl RandomSource for TestRandom {
            fn next_index(&self, upper: usize) -> usize;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET, Duration::hours(24)).unwrap())
    }

    fn fixed_random(index: usize) -> Arc<dyn RandomSource> {
        let mut random = MockTestRandom::new();
        random.expect_next_index().returning(move |_| index);
        Arc::new(random)
    }

    fn stored_user(authenticator: &Authenticator, password: &str, active: bool) -> User {
        User {
            id: UserId::new(),
            name: DisplayName::parse(Some("Ana")).unwrap(),
            email: EmailAddress::parse(Some("ana@x.com")).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            avatar_color: AvatarColor::from_palette(0),
            active,
            created_at: Utc::now(),
        }
    }

    fn register_command(name: &str, email: &str, password: &str) -> RegisterCommand {
        RegisterCommand::new(
            Some(name.to_string()),
            Some(email.to_string()),
            Some(password.to_string()),
        )
    }

    fn login_command(email: &str, password: &str) -> LoginCommand {
        LoginCommand::new(Some(email.to_string()), Some(password.to_string()))
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_insert()
            .withf(|user| {
                user.name.as_str() == "Ana"
                    && user.email.as_str() == "ana@x.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.password_hash != "secret1"
                    && user.avatar_color.as_str() == AVATAR_PALETTE[4]
                    && user.active
            })
            .times(1)
            .returning(Ok);

        let service = AuthService::new(Arc::new(repository), authenticator(), fixed_random(4));

        let result = service
            .register(register_command("Ana", "ana@x.com", "secret1"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_skips_hash_and_insert() {
        let mut repository = MockTestUserRepository::new();
        let auth = authenticator();
        let existing = stored_user(&auth, "secret1", true);

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_insert().times(0);

        let service = AuthService::new(Arc::new(repository), auth, fixed_random(0));

        let result = service
            .register(register_command("Ana Two", "ana@x.com", "secret2"))
            .await;
        assert!(matches!(result, Err(AccountError::EmailAlreadyInUse)));
    }

    #[tokio::test]
    async fn test_register_store_conflict_passes_through() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_find_by_email().returning(|_| Ok(None));
        repository
            .expect_insert()
            .times(1)
            .returning(|_| Err(AccountError::EmailAlreadyInUse));

        let service = AuthService::new(Arc::new(repository), authenticator(), fixed_random(0));

        let result = service
            .register(register_command("Ana", "ana@x.com", "secret1"))
            .await;
        assert!(matches!(result, Err(AccountError::EmailAlreadyInUse)));
    }

    #[tokio::test]
    async fn test_register_validation_order() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);
        repository.expect_insert().times(0);

        let service = AuthService::new(Arc::new(repository), authenticator(), fixed_random(0));

        let missing_everything = service.register(RegisterCommand::default()).await;
        assert_eq!(
            missing_everything.unwrap_err().to_string(),
            "Name is required"
        );

        let short_name = service
            .register(register_command("A", "bad", "ab"))
            .await;
        assert_eq!(
            short_name.unwrap_err().to_string(),
            "Name must be between 2 and 100 characters"
        );

        let bad_email = service
            .register(register_command("Ana", "bad", "ab"))
            .await;
        assert_eq!(bad_email.unwrap_err().to_string(), "Invalid email format");

        let short_password = service
            .register(register_command("Ana", "ana@x.com", "ab"))
            .await;
        assert_eq!(
            short_password.unwrap_err().to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "ana@x.com")
            .returning(|_| Ok(None));
        repository
            .expect_insert()
            .withf(|user| user.email.as_str() == "ana@x.com")
            .returning(Ok);

        let service = AuthService::new(Arc::new(repository), authenticator(), fixed_random(0));

        assert!(service
            .register(register_command("Ana", " Ana@X.COM ", "secret1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_token() {
        let mut repository = MockTestUserRepository::new();
        let auth = authenticator();
        let user = stored_user(&auth, "secret1", true);
        let user_id = user.id;

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repository), Arc::clone(&auth), fixed_random(0));

        let session = service
            .login(login_command("ana@x.com", "secret1"))
            .await
            .expect("Login failed");

        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.user.id, user_id);

        let claims = auth.validate_token(&session.access_token).unwrap();
        assert_eq!(claims.user_id, user_id.to_string());
        assert_eq!(claims.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_are_indistinguishable() {
        let auth = authenticator();
        let user = stored_user(&auth, "secret1", true);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email.as_str() == "ana@x.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = AuthService::new(Arc::new(repository), auth, fixed_random(0));

        let wrong_password = service
            .login(login_command("ana@x.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_command("nobody@x.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_email, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn test_login_unknown_email_pays_hashing_cost() {
        let auth = authenticator();
        let user = stored_user(&auth, "secret1", true);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email.as_str() == "ana@x.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = AuthService::new(Arc::new(repository), auth, fixed_random(0));

        let started = Instant::now();
        let wrong_password = service.login(login_command("ana@x.com", "wrong1")).await;
        let wrong_password_elapsed = started.elapsed();

        let started = Instant::now();
        let unknown_email = service.login(login_command("nobody@x.com", "wrong1")).await;
        let unknown_email_elapsed = started.elapsed();

        assert!(matches!(wrong_password, Err(AccountError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AccountError::InvalidCredentials)));
        // a skipped verification is orders of magnitude faster than Argon2
        assert!(
            unknown_email_elapsed * 4 >= wrong_password_elapsed,
            "unknown email took {:?}, wrong password took {:?}",
            unknown_email_elapsed,
            wrong_password_elapsed
        );
    }

    #[tokio::test]
    async fn test_login_inactive_after_password_proof() {
        let auth = authenticator();
        let user = stored_user(&auth, "secret1", false);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repository), auth, fixed_random(0));

        let inactive = service
            .login(login_command("ana@x.com", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(inactive, AccountError::AccountInactive));

        // wrong password on an inactive account still reveals nothing
        let wrong = service
            .login(login_command("ana@x.com", "wrong1"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_requires_password() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);

        let service = AuthService::new(Arc::new(repository), authenticator(), fixed_random(0));

        let result = service
            .login(LoginCommand::new(Some("ana@x.com".to_string()), None))
            .await;
        assert_eq!(result.unwrap_err().to_string(), "Password is required");
    }

    #[tokio::test]
    async fn test_login_store_failure_propagates() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .returning(|_| Err(AccountError::DatabaseError("connection reset".to_string())));

        let service = AuthService::new(Arc::new(repository), authenticator(), fixed_random(0));

        let result = service.login(login_command("ana@x.com", "secret1")).await;
        assert!(matches!(result, Err(AccountError::DatabaseError(_))));
    }
}
