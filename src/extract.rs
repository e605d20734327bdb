use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::{AppError, FieldError};

/// JSON request body. Unlike `axum::Json`, every rejection is an `AppError`,
/// so a wrong-typed field comes back as a 400 naming that field.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(reject_body)?;
        decode(value).map(JsonBody)
    }
}

fn reject_body(rejection: JsonRejection) -> AppError {
    debug!(reason = %rejection.body_text(), "request body rejected");
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::BadRequest("Expected request with `Content-Type: application/json`")
        }
        JsonRejection::JsonSyntaxError(_) => AppError::BadRequest("Malformed JSON body"),
        _ => AppError::BadRequest("Invalid request body"),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        let field = match e.path().to_string() {
            root if root == "." => "body".to_string(),
            path => path,
        };
        AppError::Validation(vec![FieldError::new(field, e.into_inner().to_string())])
    })
}
