pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
    pub auth_service: Arc<services::auth_service::AuthService>,
    pub password_reset_service: Arc<services::password_reset_service::PasswordResetService>,
    pub session_tokens: Arc<services::session_token_service::SessionTokenService>,
    pub pool: sqlx::SqlitePool,
}
