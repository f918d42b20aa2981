//! HTTP mapping for PantryError
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pantry_core::PantryError;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Handler error; renders as `{ "error": "<message>" }`.
#[derive(Debug)]
pub struct ApiError(pub PantryError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PantryError::Validation(_) => StatusCode::BAD_REQUEST,
            PantryError::NotFound(_) => StatusCode::NOT_FOUND,
            PantryError::Unauthorized => StatusCode::UNAUTHORIZED,
            PantryError::Weather(_) => StatusCode::BAD_GATEWAY,
            PantryError::Catalog(_) | PantryError::Config(_) | PantryError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<PantryError> for ApiError {
    fn from(err: PantryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PantryError::Validation(rejection.body_text()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// `Json` body extractor whose rejections render as 400 `{ "error": … }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (PantryError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (PantryError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (PantryError::Unauthorized, StatusCode::UNAUTHORIZED),
            (PantryError::Weather("x".into()), StatusCode::BAD_GATEWAY),
            (PantryError::Catalog("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }
}
