//! HTTP transport seam.
//!
//! The pipeline only needs a synchronous GET with query parameters. Keeping that
//! behind [`Transport`] lets tests substitute a fake and count calls.

use crate::Result;
use crate::Error;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::warn;
use url::Url;

const USER_AGENT: &str = concat!("flops-core/", env!("CARGO_PKG_VERSION"));

/// Raw HTTP response handed back to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Undecoded response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Create a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Synchronous HTTP GET capability.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Issue a GET for `url` with the given query pairs and a JSON content type.
    fn get(&self, url: &Url, query: &[(String, String)]) -> Result<TransportResponse>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
///
/// The client owns one connection pool for its lifetime.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Build a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration, tls_verify: bool) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10));

        if !tls_verify {
            warn!("TLS verification disabled for flops client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url, query: &[(String, String)]) -> Result<TransportResponse> {
        let response = self
            .http
            .get(url.clone())
            .query(query)
            .header(CONTENT_TYPE, "application/json")
            .send()?;

        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn http_transport_sends_query_and_content_type() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path("/api/v1/tenant"))
                .and(query_param("clientId", "42"))
                .and(header("content-type", "application/json"))
                .respond_with(ResponseTemplate::new(200).set_body_string("{\"status\":\"OK\"}"))
                .expect(1)
                .mount(&server),
        );

        let transport = HttpTransport::new(Duration::from_secs(5), true).unwrap();
        let url = Url::parse(&format!("{}/api/v1/tenant", server.uri())).unwrap();
        let response = transport
            .get(&url, &[("clientId".to_string(), "42".to_string())])
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"{\"status\":\"OK\"}".to_vec());
    }

    #[test]
    fn http_transport_reports_status_without_reading_json() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        runtime.block_on(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
                .mount(&server),
        );

        let transport = HttpTransport::new(Duration::from_secs(5), true).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let response = transport.get(&url, &[]).unwrap();
        assert_eq!(response.status, 503);
    }
}
