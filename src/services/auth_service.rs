use crate::models::User;
use crate::repositories::user_repository::UserRepository;
use crate::services::password;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::repositories::user_repository::RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Verifies a login. Unknown email and wrong password both collapse
    /// into the same `InvalidCredentials` error so the caller cannot
    /// enumerate accounts.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !password::verify(&request.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User, AuthServiceError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .with(eq("ghost@example.com"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(Arc::new(mock_repo));

        let request = LoginRequest {
            email: "ghost@example.com".to_string(),
            password: "Secret123!".to_string(),
        };

        let result = service.authenticate(request).await;
        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut mock_repo = MockUserRepository::new();

        let stored_hash = crate::services::password::hash("Secret123!").unwrap();
        mock_repo
            .expect_find_by_email()
            .with(eq("alice@example.com"))
            .times(1)
            .returning(move |_| {
                let hash = stored_hash.clone();
                Box::pin(async move {
                    Ok(Some(User {
                        id: 1,
                        email: "alice@example.com".to_string(),
                        password_hash: hash,
                        name: "Alice".to_string(),
                        role: Role::Patient,
                        created_at: None,
                    }))
                })
            });

        let service = AuthService::new(Arc::new(mock_repo));

        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "WrongPassword!".to_string(),
        };

        let result = service.authenticate(request).await;
        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(Arc::new(mock_repo));

        let result = service.get_user_by_id(1).await;
        assert!(matches!(result, Err(AuthServiceError::UserNotFound)));
    }
}
