use crate::error::AppError;
use crate::models::Role;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Verified identity of the caller, attached to the request extensions
/// by `require_auth`. Handlers must use this, never client-sent role
/// flags.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Some(token) => token.to_string(),
        None => return AppError::Unauthorized.into_response(),
    };

    let claims = match state.session_tokens.verify(&token) {
        Ok(claims) => claims,
        Err(_) => return AppError::Unauthorized.into_response(),
    };

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    next.run(request).await
}
