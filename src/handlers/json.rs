use crate::error::AppError;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

/// JSON body extractor that keeps the error envelope. Axum's stock
/// `Json` rejection answers malformed bodies with plain text; every
/// response from this API carries `{success, message}` instead.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!("Rejected malformed request body: {}", rejection);
                Err(AppError::Validation("Invalid input.".to_string()))
            }
        }
    }
}
