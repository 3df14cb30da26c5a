//! User service for registration and credential checks.

use anyhow::{Context, Result, bail};
use tracing::{info, instrument};

use super::models::{CreateUserRequest, User};
use super::repository::UserRepository;

/// Service for user account operations.
#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Register a new user with validation.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: CreateUserRequest) -> Result<User> {
        if !is_valid_username(&request.username) {
            bail!(
                "Invalid username format. Must be 3-50 alphanumeric characters, underscores, or hyphens."
            );
        }

        if !is_valid_email(&request.email) {
            bail!("Invalid email format.");
        }

        if request.password.len() < 6 {
            bail!("Password must be at least 6 characters.");
        }

        if self
            .repo
            .get_by_username(&request.username)
            .await?
            .is_some()
        {
            bail!("Username '{}' is already taken.", request.username);
        }

        if self.repo.get_by_email(&request.email).await?.is_some() {
            bail!("Email '{}' is already registered.", request.email);
        }

        let password_hash = hash_password(&request.password)?;
        let display_name = request
            .display_name
            .unwrap_or_else(|| request.username.clone());

        let user = self
            .repo
            .create(
                &request.username,
                &request.email,
                &password_hash,
                &display_name,
            )
            .await?;
        info!(user_id = %user.id, username = %user.username, "Registered new user");

        Ok(user)
    }

    /// Verify a username/password pair.
    ///
    /// Returns `None` on unknown username or wrong password; callers must
    /// not distinguish the two cases in their responses.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.repo.get_by_username(username).await? else {
            return Ok(None);
        };

        let matches =
            bcrypt::verify(password, &user.password_hash).context("verifying password")?;

        Ok(matches.then_some(user))
    }

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.repo.get(id).await
    }
}

/// Hash a password with bcrypt.
fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("hashing password")
}

/// Validate username format: 3-50 alphanumeric, underscore, or hyphen.
fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=50).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Minimal email sanity check.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup() -> UserService {
        let db = Database::in_memory().await.unwrap();
        UserService::new(UserRepository::new(db.pool().clone()))
    }

    fn request(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            display_name: None,
        }
    }

    #[test]
    fn test_username_validation() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("alice_b-2"));
        assert!(!is_valid_username("al"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("alice@campus.edu"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("@campus.edu"));
        assert!(!is_valid_email("alice@nodot"));
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let service = setup().await;

        let user = service
            .register(request("alice", "alice@campus.edu", "hunter22"))
            .await
            .unwrap();
        assert_eq!(user.display_name, "alice");

        let ok = service.authenticate("alice", "hunter22").await.unwrap();
        assert!(ok.is_some());

        let bad = service.authenticate("alice", "wrong").await.unwrap();
        assert!(bad.is_none());

        let unknown = service.authenticate("bob", "hunter22").await.unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = setup().await;

        service
            .register(request("alice", "alice@campus.edu", "hunter22"))
            .await
            .unwrap();
        let err = service
            .register(request("alice", "other@campus.edu", "hunter22"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already taken"));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let service = setup().await;

        let err = service
            .register(request("alice", "alice@campus.edu", "pw"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least 6"));
    }
}
