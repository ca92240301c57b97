use crate::errors::AppError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Longest upstream error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Shared HTTP client for all four upstreams.
///
/// Cloning is cheap; clones share one connection pool. Every call is bounded
/// by the configured timeout, and a timeout surfaces as
/// [`AppError::UpstreamUnavailable`] like any other transport failure.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Creates a new `UpstreamClient`.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-call timeout applied to every upstream request.
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create upstream client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Builds `{base}/{segments...}?{query...}` with every part percent-encoded.
    pub fn endpoint(
        base_url: &str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, AppError> {
        let mut url = Url::parse(base_url)?;

        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| {
                    AppError::InternalError(format!("Base URL cannot take a path: {}", base_url))
                })?
                .pop_if_empty()
                .extend(segments);
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// GETs `url` and decodes the JSON body into `T`.
    ///
    /// # Arguments
    ///
    /// * `upstream` - Upstream label used in logs and error messages.
    /// * `url` - Fully assembled request URL.
    /// * `headers` - Extra request headers (e.g. API keys).
    ///
    /// # Returns
    ///
    /// * `Result<T, AppError>` - The decoded payload, or a transport, status or decode error.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        upstream: &str,
        url: Url,
        headers: &[(&str, &str)],
    ) -> Result<T, AppError> {
        // Paths and queries may carry API keys; log the origin only
        tracing::debug!("{}: GET {}", upstream, url.origin().ascii_serialization());

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::UpstreamUnavailable(format!("{} request timed out", upstream))
            } else {
                AppError::UpstreamUnavailable(format!(
                    "{} request failed: {}",
                    upstream,
                    e.without_url()
                ))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| {
                    tracing::debug!(
                        "{}: couldn't read error body: {}",
                        upstream,
                        e.without_url()
                    );
                    "Unknown error".to_string()
                });
            return Err(AppError::UpstreamStatus {
                upstream: upstream.to_string(),
                status: status.as_u16(),
                body: error_text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                AppError::UpstreamUnavailable(format!("{} response timed out", upstream))
            } else {
                AppError::MalformedPayload(format!(
                    "Failed to parse {} response: {}",
                    upstream,
                    e.without_url()
                ))
            }
        })
    }
}
