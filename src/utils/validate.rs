use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::notifications::MISSING_PARAMETERS;

/// JSON body extractor that reports every rejection as 422.
///
/// Any rejection (missing content type, a body that is not a JSON object,
/// a missing field or a failed `Validate` rule) produces the same
/// missing-parameters error. The cause is logged at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(body) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
                missing_parameters()
            })?;

        // Structs also deserialize from arrays; only objects are accepted.
        if !body.is_object() {
            tracing::debug!("Request body is not a JSON object");
            return Err(missing_parameters());
        }

        let value = serde_json::from_value::<T>(body).map_err(|e| {
            tracing::debug!(reason = %e, "Request body has missing or malformed fields");
            missing_parameters()
        })?;

        value.validate().map_err(|errors| {
            tracing::debug!(reason = %errors, "Request body failed validation");
            missing_parameters()
        })?;

        Ok(ValidatedJson(value))
    }
}

fn missing_parameters() -> AppError {
    AppError::UnprocessableContent {
        message: MISSING_PARAMETERS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(min = 1))]
        id: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method(Method::POST).uri("/test");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn extract(req: Request) -> AppResult<ValidatedJson<TestBody>> {
        ValidatedJson::<TestBody>::from_request(req, &()).await
    }

    fn assert_missing_parameters(result: AppResult<ValidatedJson<TestBody>>) {
        match result {
            Err(AppError::UnprocessableContent { message }) => {
                assert_eq!(message, MISSING_PARAMETERS)
            }
            other => panic!("Expected UnprocessableContent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(body) = extract(request(Some("application/json"), r#"{"id":"7"}"#))
            .await
            .unwrap();
        assert_eq!(body.id, "7");
    }

    #[tokio::test]
    async fn test_missing_field() {
        assert_missing_parameters(extract(request(Some("application/json"), "{}")).await);
    }

    #[tokio::test]
    async fn test_failed_rule() {
        assert_missing_parameters(
            extract(request(Some("application/json"), r#"{"id":""}"#)).await,
        );
    }

    #[tokio::test]
    async fn test_not_json() {
        assert_missing_parameters(extract(request(Some("application/json"), "id=7")).await);
        assert_missing_parameters(extract(request(Some("application/json"), r#"["7"]"#)).await);
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        assert_missing_parameters(extract(request(None, r#"{"id":"7"}"#)).await);
    }
}
