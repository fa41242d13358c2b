//! Request body decoding shared by module handlers

use axum::{
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Body extractor accepting either `application/json` or
/// `application/x-www-form-urlencoded` payloads.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;
            Ok(Payload(value))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;
            Ok(Payload(value))
        } else {
            Err(AppError::unsupported_media_type(format!(
                "expected application/json or application/x-www-form-urlencoded, got '{}'",
                content_type
            )))
        }
    }
}

fn rejected(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::UNPROCESSABLE_ENTITY => AppError::validation(Vec::new(), message),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::unsupported_media_type(message),
        _ => AppError::bad_request(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        title: String,
        read: bool,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn decodes_json() {
        let req = request("application/json", r#"{"title":"Dune","read":true}"#);
        let Payload(sample) = Payload::<Sample>::from_request(req, &()).await.unwrap();
        assert_eq!(sample.title, "Dune");
        assert!(sample.read);
    }

    #[tokio::test]
    async fn decodes_urlencoded_form() {
        let req = request(
            "application/x-www-form-urlencoded",
            "title=War+and+Peace&read=false",
        );
        let Payload(sample) = Payload::<Sample>::from_request(req, &()).await.unwrap();
        assert_eq!(sample.title, "War and Peace");
        assert!(!sample.read);
    }

    #[tokio::test]
    async fn missing_field_is_a_validation_error() {
        let req = request("application/json", r#"{"title":"Dune"}"#);
        let err = Payload::<Sample>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let req = request("application/json", r#"{"title":"#);
        let err = Payload::<Sample>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn other_content_types_are_rejected() {
        let req = request("text/plain", "Dune");
        let err = Payload::<Sample>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
