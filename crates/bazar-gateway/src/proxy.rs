//! Upstream routing and request forwarding.

use axum::body::Body;
use axum::http::{HeaderMap, Method, Response, StatusCode, Uri};
use tracing::error;

use bazar_core::config::RouteConfig;

use crate::filter::FilterError;

/// Request bodies larger than this are rejected rather than buffered.
const MAX_FORWARD_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Hop-by-hop headers that must not be forwarded either direction.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// Longest-prefix routing table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteConfig>,
}

impl RouteTable {
    /// Build a table; routes are ordered by descending prefix length so
    /// the first hit is the longest match.
    pub fn new(mut routes: Vec<RouteConfig>) -> Self {
        routes.sort_by_key(|r| std::cmp::Reverse(r.prefix.len()));
        Self { routes }
    }

    /// The upstream base URL for a path, if any route matches.
    pub fn upstream_for(&self, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| path.starts_with(&r.prefix))
            .map(|r| r.upstream.as_str())
    }
}

/// Forwards validated requests to their upstream.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    /// Create a forwarder with the configured upstream timeout.
    pub fn new(upstream_timeout: std::time::Duration) -> Result<Self, bazar_core::AppError> {
        let client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .map_err(|e| {
                bazar_core::AppError::internal(format!("Failed to build forward client: {e}"))
            })?;
        Ok(Self { client })
    }

    /// Forward the (already decorated) request to `upstream` and relay
    /// the upstream's response back verbatim.
    pub async fn forward(
        &self,
        upstream: &str,
        method: Method,
        uri: &Uri,
        headers: HeaderMap,
        body: Body,
    ) -> Result<Response<Body>, FilterError> {
        let body_bytes = axum::body::to_bytes(body, MAX_FORWARD_BODY_BYTES)
            .await
            .map_err(|e| FilterError::Upstream(format!("Failed to read request body: {e}")))?;

        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or(uri.path());
        let url = format!("{}{}", upstream.trim_end_matches('/'), path_and_query);

        let mut request = self.client.request(method, &url).body(body_bytes.to_vec());
        for (name, value) in headers.iter() {
            if !HOP_BY_HOP.contains(&name.as_str()) {
                request = request.header(name, value);
            }
        }

        let upstream_response = request.send().await.map_err(|e| {
            error!(url = %url, error = %e, "Upstream request failed");
            FilterError::Upstream(format!("Upstream request failed: {e}"))
        })?;

        let status = upstream_response.status();
        let response_headers = upstream_response.headers().clone();
        let response_body = upstream_response
            .bytes()
            .await
            .map_err(|e| FilterError::Upstream(format!("Failed to read upstream body: {e}")))?;

        let mut builder = Response::builder()
            .status(StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY));
        for (name, value) in response_headers.iter() {
            if !HOP_BY_HOP.contains(&name.as_str()) {
                builder = builder.header(name, value);
            }
        }

        builder
            .body(Body::from(response_body))
            .map_err(|e| FilterError::Upstream(format!("Failed to build response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        let table = RouteTable::new(vec![
            RouteConfig {
                prefix: "/api/v1".to_string(),
                upstream: "http://fallback:8080".to_string(),
            },
            RouteConfig {
                prefix: "/api/v1/profile".to_string(),
                upstream: "http://profile:8080".to_string(),
            },
        ]);

        assert_eq!(
            table.upstream_for("/api/v1/profile/me"),
            Some("http://profile:8080")
        );
        assert_eq!(
            table.upstream_for("/api/v1/orders"),
            Some("http://fallback:8080")
        );
        assert_eq!(table.upstream_for("/metrics"), None);
    }
}
