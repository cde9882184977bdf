use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockkeep_core::DomainError;
use stockkeep_infra::RepositoryError;

/// Uniform error body: `{"status": <code>, "error": <reason>, "message": <detail>}`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    let message = message.into();
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), "{message}");
    } else {
        tracing::warn!(status = status.as_u16(), "{message}");
    }
    error_body(status, message)
}

/// The error body alone, for callers that already logged the failure.
fn error_body(status: StatusCode, message: String) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        })),
    )
        .into_response()
}

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    match err {
        RepositoryError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, msg),
        RepositoryError::Invalid(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        RepositoryError::Unpersisted | RepositoryError::Storage(_) => {
            // Full detail stays in the server log.
            tracing::error!(error = %err, "inventory store operation failed");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The server encountered an internal error".to_string(),
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, msg),
    }
}

pub fn not_found(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, message)
}

/// Fallback for verbs a known path does not support.
pub async fn method_not_allowed(method: axum::http::Method) -> axum::response::Response {
    json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("The method {method} is not allowed for the requested URL."),
    )
}

/// Fallback for paths with no route at all.
pub async fn unknown_route(uri: axum::http::Uri) -> axum::response::Response {
    not_found(format!("The requested URL {} was not found on the server.", uri.path()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn error_body_has_status_error_and_message() {
        let resp = json_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Content-Type must be application/json");
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = body_json(resp).await;
        assert_eq!(body["status"], 415);
        assert_eq!(body["error"], "Unsupported Media Type");
        assert_eq!(body["message"], "Content-Type must be application/json");
    }

    #[tokio::test]
    async fn storage_errors_do_not_leak_detail() {
        let resp = repository_error_to_response(RepositoryError::Storage(
            "database error in find: relation \"inventory\" does not exist".into(),
        ));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(!body["message"].as_str().unwrap().contains("relation"));
    }

    #[derive(Clone, Default)]
    struct ErrorEvents(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn storage_failure_is_logged_once() {
        let events = ErrorEvents::default();
        let subscriber = tracing_subscriber::registry().with(events.clone());

        let resp = tracing::subscriber::with_default(subscriber, || {
            repository_error_to_response(RepositoryError::Storage("connection reset".into()))
        });

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(events.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repository_errors_map_to_status_codes() {
        let resp = repository_error_to_response(RepositoryError::NotFound("gone".into()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = repository_error_to_response(RepositoryError::Invalid("too long".into()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = domain_error_to_response(DomainError::validation("missing"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
