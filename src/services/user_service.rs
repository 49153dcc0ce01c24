use crate::models::{Role, User};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::services::{password, validation};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Name is required")]
    MissingName,
    #[error("Password too weak (minimum {min} characters)", min = validation::MIN_PASSWORD_LEN)]
    WeakPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Current password is incorrect")]
    WrongPassword,
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] password::HashError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct ChangePasswordRequest {
    pub user_id: i64,
    pub current_password: String,
    pub new_password: String,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Registers a new portal account with the default `patient` role.
    /// All input validation happens before any storage access.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, UserServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(UserServiceError::MissingName);
        }

        let email = request.email.trim();
        if !validation::is_valid_email(email) {
            return Err(UserServiceError::InvalidEmail);
        }

        self.validate_password(&request.password)?;

        let password_hash = password::hash(&request.password)?;

        match self
            .repository
            .create_user(email, &password_hash, name, Role::Patient)
            .await
        {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }

    /// Authenticated password change: requires the current password.
    pub async fn change_password(
        &self,
        request: ChangePasswordRequest,
    ) -> Result<(), UserServiceError> {
        self.validate_password(&request.new_password)?;

        let user = self
            .repository
            .find_by_id(request.user_id)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;

        if !password::verify(&request.current_password, &user.password_hash) {
            return Err(UserServiceError::WrongPassword);
        }

        let password_hash = password::hash(&request.new_password)?;

        match self
            .repository
            .update_password(request.user_id, &password_hash)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.len() < validation::MIN_PASSWORD_LEN {
            return Err(UserServiceError::WeakPassword);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    fn sample_user(email: &str) -> User {
        User {
            id: 1,
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "Alice".to_string(),
            role: Role::Patient,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut mock_repo = MockUserRepository::new();

        let user = sample_user("alice@example.com");
        let user_clone = user.clone();
        mock_repo
            .expect_create_user()
            .with(eq("alice@example.com"), always(), eq("Alice"), eq(Role::Patient))
            .times(1)
            .returning(move |_, _, _, _| {
                let user = user_clone.clone();
                Box::pin(async move { Ok(user) })
            });

        let service = UserService::new(Arc::new(mock_repo));

        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Secret123!".to_string(),
        };

        let result = service.register(request).await;
        assert!(result.is_ok());
        let user = result.expect("Expected Ok result");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, Role::Patient);
    }

    #[tokio::test]
    async fn test_register_invalid_email_skips_storage() {
        // The mock has no expectations: any repository call would panic.
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "Secret123!".to_string(),
        };

        let result = service.register(request).await;
        assert!(matches!(result, Err(UserServiceError::InvalidEmail)));
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "short".to_string(),
        };

        let result = service.register(request).await;
        assert!(matches!(result, Err(UserServiceError::WeakPassword)));
    }

    #[tokio::test]
    async fn test_register_missing_name() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let request = RegisterRequest {
            name: "   ".to_string(),
            email: "alice@example.com".to_string(),
            password: "Secret123!".to_string(),
        };

        let result = service.register(request).await;
        assert!(matches!(result, Err(UserServiceError::MissingName)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_maps_to_email_taken() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create_user()
            .times(1)
            .returning(|_, _, _, _| Box::pin(async move { Err(RepositoryError::AlreadyExists) }));

        let service = UserService::new(Arc::new(mock_repo));

        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Secret123!".to_string(),
        };

        let result = service.register(request).await;
        assert!(matches!(result, Err(UserServiceError::EmailTaken)));
    }
}
