use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::handlers::json::ApiJson;
use crate::models::{PublicUser, Role};
use crate::services::auth_service::LoginRequest;
use crate::services::user_service::{ChangePasswordRequest, RegisterRequest};
use crate::AppState;
use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordBody {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordBody {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordBody {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let request = RegisterRequest {
        name: body.name,
        email: body.email,
        password: body.password,
    };

    let user = state.user_service.register(request).await?;
    tracing::info!(user_id = user.id, "New account registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Account created successfully.",
        })),
    ))
}

pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<LoginResponse>> {
    let request = LoginRequest {
        email: body.email,
        password: body.password,
    };

    let user = state.auth_service.authenticate(request).await?;
    let token = state
        .session_tokens
        .issue(&user)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful.".to_string(),
        token,
        user: PublicUser::from(&user),
    }))
}

/// Always answers with the same body for well-formed emails, whether or
/// not the account exists.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ForgotPasswordBody>,
) -> Result<Json<Value>> {
    state.password_reset_service.request_reset(&body.email).await?;

    Ok(Json(json!({
        "success": true,
        "message": "If your account exists, a reset link has been sent.",
    })))
}

pub async fn reset_password_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ResetPasswordBody>,
) -> Result<Json<Value>> {
    state
        .password_reset_service
        .reset_password(&body.token, &body.password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully.",
    })))
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let user = state.auth_service.get_user_by_id(current_user.id).await?;

    Ok(Json(json!({
        "success": true,
        "user": PublicUser::from(&user),
    })))
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ApiJson(body): ApiJson<ChangePasswordBody>,
) -> Result<Json<Value>> {
    let request = ChangePasswordRequest {
        user_id: current_user.id,
        current_password: body.current_password,
        new_password: body.new_password,
    };

    state.user_service.change_password(request).await?;
    tracing::info!(user_id = current_user.id, "Password changed");

    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully.",
    })))
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Value>> {
    if current_user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let users = state
        .user_service
        .list_users(query.limit, query.offset)
        .await?;
    let users: Vec<PublicUser> = users.iter().map(PublicUser::from).collect();

    Ok(Json(json!({
        "success": true,
        "users": users,
    })))
}
