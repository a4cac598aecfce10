//! Thin HTTP layer: builds requests against the configured base URL, carries the
//! session cookie, and pushes every response through [`ApiResponse`] decoding.

use common::config::Config;
use reqwest::{
    Client, Method, RequestBuilder, StatusCode,
    cookie::{CookieStore, Jar},
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};
use std::sync::Arc;
use url::Url;

use crate::{error::ApiError, response::ApiResponse};

/// Cheap to clone; clones share the connection pool and cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_base_url(&config.api_base_url, config)
    }

    pub fn with_base_url(base_url: &str, config: &Config) -> Result<Self, ApiError> {
        // A trailing slash makes `Url::join` append instead of replacing the last segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalized)
            .map_err(|e| ApiError::Validation(format!("invalid API base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(jar.clone())
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::from_reqwest)?;

        Ok(Self { http, base, jar })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Validation(format!("invalid request path {path}: {e}")))
    }

    /// Current session cookies as a `Cookie` header value, for persisting between runs.
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.base)
            .and_then(|v| v.to_str().ok().map(str::to_owned))
    }

    /// Re-seeds the jar from a previously saved `Cookie` header value.
    pub fn restore_cookies(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base);
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute_as(request).await
    }

    /// Status handling shared by every call; the body of a 2xx decodes as `E`.
    async fn execute_as<E: DeserializeOwned>(&self, request: RequestBuilder) -> Result<E, ApiError> {
        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<IgnoredAny>>(&bytes)
                .ok()
                .and_then(|env| env.message);
            tracing::warn!(status = status.as_u16(), message = ?message, "backend request failed");
            return Err(if status == StatusCode::UNAUTHORIZED {
                ApiError::Unauthorized { message }
            } else {
                ApiError::Status {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "backend request");
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.request::<()>(Method::GET, path, None)?;
        self.execute(req).await?.into_result()
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request::<()>(Method::GET, path, None)?.query(query);
        self.execute(req).await?.into_result()
    }

    /// Sends `body` and returns the decoded `data`.
    pub async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(method, path, Some(body))?;
        self.execute(req).await?.into_result()
    }

    /// Sends `body` and decodes the whole reply as `E`, for endpoints that put
    /// fields next to the standard envelope.
    pub async fn send_raw<B, E>(&self, method: Method, path: &str, body: &B) -> Result<E, ApiError>
    where
        B: Serialize + ?Sized,
        E: DeserializeOwned,
    {
        let req = self.request(method, path, Some(body))?;
        self.execute_as(req).await
    }

    /// Sends an optional body and only checks `success`; returns the backend message.
    pub async fn send_ack<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<String>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let req = self.request(method, path, body)?;
        self.execute::<IgnoredAny>(req).await?.into_ack()
    }
}

/// Joins `segments` into a percent-encoded relative path such as `/student/search/Abebe%20K`.
pub fn encode_path(segments: &[&str]) -> Result<String, ApiError> {
    let mut scratch = Url::parse("http://localhost/")
        .map_err(|e| ApiError::Validation(format!("could not build request path: {e}")))?;
    scratch
        .path_segments_mut()
        .map_err(|_| ApiError::Validation("could not build request path".into()))?
        .clear()
        .extend(segments);
    Ok(scratch.path().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_base_url(base, &Config::from_env()).unwrap()
    }

    #[test]
    fn joins_paths_under_the_base() {
        let c = client("https://attendance.example.edu/api");
        assert_eq!(
            c.url("/attendance/course/7").unwrap().as_str(),
            "https://attendance.example.edu/api/attendance/course/7"
        );
        // Trailing slashes on endpoint paths are significant to the backend.
        assert_eq!(
            client("https://attendance.example.edu/api/")
                .url("enrollment/")
                .unwrap()
                .as_str(),
            "https://attendance.example.edu/api/enrollment/"
        );
    }

    #[test]
    fn encodes_free_text_segments() {
        assert_eq!(
            encode_path(&["student", "search", "Abebe K/2"]).unwrap(),
            "/student/search/Abebe%20K%2F2"
        );
        assert_eq!(
            encode_path(&["analytics", "departments", "Computer Science", "overview"]).unwrap(),
            "/analytics/departments/Computer%20Science/overview"
        );
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            ApiClient::with_base_url("not a url", &Config::from_env()),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn cookies_round_trip_through_header() {
        let c = client("http://127.0.0.1:9/api");
        assert!(c.cookie_header().is_none());
        c.restore_cookies("sid=abc123; theme=dark");
        let header = c.cookie_header().unwrap();
        assert!(header.contains("sid=abc123"));
        assert!(header.contains("theme=dark"));
    }
}
