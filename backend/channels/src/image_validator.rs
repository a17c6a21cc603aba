//! Network image checks.

use std::time::Duration;

use async_trait::async_trait;
use cardwire_core::{CardwireError, ImageValidationResult, ImageValidator};
use reqwest::{header, Client, Response, StatusCode};
use tracing::debug;

/// Confirms an image exists and is served with an `image/*` content type.
///
/// Uses HEAD and retries with GET when the server refuses HEAD. Every
/// failure, including timeouts, is reported as `valid: false`.
pub struct HttpImageValidator {
    http: Client,
}

impl HttpImageValidator {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, CardwireError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CardwireError::Config(format!("building image HTTP client: {e}")))?;
        Ok(Self { http })
    }

    async fn fetch(&self, url: &str) -> Result<Response, reqwest::Error> {
        let res = self.http.head(url).send().await?;
        if matches!(
            res.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            debug!(url, status = %res.status(), "HEAD refused, retrying with GET");
            return self.http.get(url).send().await;
        }
        Ok(res)
    }
}

#[async_trait]
impl ImageValidator for HttpImageValidator {
    async fn validate(&self, url: &str) -> ImageValidationResult {
        let res = match self.fetch(url).await {
            Ok(res) => res,
            Err(e) => return ImageValidationResult::invalid(e.without_url().to_string()),
        };

        let status = res.status();
        if !status.is_success() {
            return ImageValidationResult::invalid(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ));
        }

        let headers = res.headers();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        match content_type {
            Some(ct) if ct.trim_start().to_ascii_lowercase().starts_with("image/") => {
                ImageValidationResult::ok(Some(ct), content_length)
            }
            other => {
                let shown = other.clone().unwrap_or_default();
                ImageValidationResult {
                    content_type: other,
                    ..ImageValidationResult::invalid(format!("Invalid content type: {shown}"))
                }
            }
        }
    }
}

/// Accepts every URL without touching the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopImageValidator;

#[async_trait]
impl ImageValidator for NoopImageValidator {
    async fn validate(&self, _url: &str) -> ImageValidationResult {
        ImageValidationResult::ok(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Router};
    use std::net::SocketAddr;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];

    async fn serve() -> SocketAddr {
        let app = Router::new()
            .route("/ok.png", get(|| async { ([("content-type", "image/png")], PNG) }))
            .route("/page", get(|| async { ([("content-type", "text/html")], "<html></html>") }))
            .route(
                "/no-head.jpg",
                get(|| async { ([("content-type", "image/jpeg")], PNG) })
                    .head(|| async { AxumStatus::METHOD_NOT_ALLOWED }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    fn validator() -> HttpImageValidator {
        HttpImageValidator::new(Duration::from_secs(5), "cardwire-test").unwrap()
    }

    #[tokio::test]
    async fn image_content_type_is_valid() {
        let addr = serve().await;
        let result = validator().validate(&format!("http://{addr}/ok.png")).await;
        assert!(result.valid, "{result:?}");
        assert_eq!(result.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn html_is_rejected_with_content_type() {
        let addr = serve().await;
        let result = validator().validate(&format!("http://{addr}/page")).await;
        assert!(!result.valid);
        assert_eq!(result.content_type.as_deref(), Some("text/html"));
        assert_eq!(result.error.as_deref(), Some("Invalid content type: text/html"));
    }

    #[tokio::test]
    async fn missing_image_reports_status() {
        let addr = serve().await;
        let result = validator().validate(&format!("http://{addr}/gone.png")).await;
        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some("HTTP 404: Not Found"));
    }

    #[tokio::test]
    async fn refused_head_falls_back_to_get() {
        let addr = serve().await;
        let result = validator().validate(&format!("http://{addr}/no-head.jpg")).await;
        assert!(result.valid, "{result:?}");
        assert_eq!(result.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn unreachable_host_is_invalid_not_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = validator().validate(&format!("http://{addr}/x.png")).await;
        assert!(!result.valid);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn noop_accepts_anything() {
        assert!(NoopImageValidator.validate("not a url").await.valid);
    }
}
