//! Request/response pipeline shared by every endpoint.
//!
//! [`ServiceClient`] attaches credentials, transcodes parameter keys to the wire
//! convention, issues the GET, decodes and transcodes the JSON envelope back to
//! snake_case and raises classified errors for both error-envelope shapes.

use crate::case::{to_client_case, to_wire_case};
use crate::config::{Credentials, FlopsConfig};
use crate::ids::OperationId;
use crate::poll::Poller;
use crate::query::{encode_pairs, QueryParams};
use crate::transport::{HttpTransport, Transport};
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Status discriminator value marking an error envelope.
pub const ERROR_STATUS: &str = "ERROR";

/// Builder for [`ServiceClient`].
#[derive(Clone)]
pub struct ServiceClientBuilder {
    config: FlopsConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ServiceClientBuilder {
    /// Create a builder from a configuration.
    #[must_use]
    pub fn new(config: FlopsConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Replace the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate the configuration and build the client.
    pub fn build(self) -> Result<ServiceClient> {
        self.config.check()?;
        let base_url = self.config.parse_endpoint()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(
                self.config.timeout(),
                self.config.tls_verify,
            )?),
        };

        Ok(ServiceClient {
            transport,
            base_url,
            credentials: self.config.credentials(),
            poll_interval: self.config.poll_interval(),
        })
    }
}

/// Blocking client implementing the request/response pipeline.
#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    credentials: Credentials,
    poll_interval: Duration,
}

impl ServiceClient {
    /// Start a builder from the provided configuration.
    #[must_use]
    pub fn builder(config: FlopsConfig) -> ServiceClientBuilder {
        ServiceClientBuilder::new(config)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the credentials attached to every call.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Default interval used by [`ServiceClient::wait_for_operation`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Perform a request and return the whole transcoded envelope.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Authorization`] before any network call when either
    /// credential is empty, with [`Error::ApiError`] on a non-200 status and with
    /// the classified provider error for an error envelope.
    pub fn perform(&self, path: &str, params: QueryParams) -> Result<Value> {
        if !self.credentials.is_complete() {
            return Err(Error::Authorization(
                "client_id or api_key is empty".to_string(),
            ));
        }

        let url = self.build_url(path)?;

        let mut params = params;
        params.push("client_id", self.credentials.client_id());
        params.push("api_key", self.credentials.api_key());
        let pairs = encode_pairs(&to_wire_case(&params.into_value()));

        let keys = pairs
            .iter()
            .map(|(key, _)| key.as_str())
            .filter(|key| *key != "apiKey")
            .collect::<Vec<_>>();
        debug!(path = %path, ?keys, "Sending flops request");

        let response = self.transport.get(&url, &pairs)?;
        if response.status != 200 {
            return Err(Error::ApiError(format!(
                "`{path}` returned HTTP status {}",
                response.status
            )));
        }

        let decoded: Value = serde_json::from_slice(&response.body).map_err(|err| {
            Error::ParseError(format!("Failed to parse response for `{path}`: {err}"))
        })?;

        let envelope = to_client_case(&decoded);
        check_envelope(&envelope)?;
        Ok(envelope)
    }

    /// Perform a request and return only the envelope's `result` payload.
    pub fn perform_result(&self, path: &str, params: QueryParams) -> Result<Value> {
        take_result(self.perform(path, params)?, path)
    }

    /// Fetch the status payload of an asynchronous operation.
    pub fn operation_status(&self, operation_id: OperationId) -> Result<Value> {
        let path = format!("operation/{operation_id}/");
        self.perform_result(&path, QueryParams::new())
    }

    /// Poll an operation at the configured interval until it is done.
    pub fn wait_for_operation(
        &self,
        operation_id: OperationId,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        self.wait_for_operation_with_interval(operation_id, timeout, self.poll_interval)
    }

    /// Poll an operation at an explicit interval until it is done.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationTimeout`] when the deadline elapses and
    /// propagates any pipeline error raised by a status check.
    pub fn wait_for_operation_with_interval(
        &self,
        operation_id: OperationId,
        timeout: Option<Duration>,
        interval: Duration,
    ) -> Result<Value> {
        Poller::new(interval)
            .with_timeout(timeout)
            .wait(|| self.operation_status(operation_id))
            .map_err(|err| match err {
                Error::OperationTimeout(detail) => {
                    Error::OperationTimeout(format!("operation {operation_id} {detail}"))
                }
                other => other,
            })
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }
}

/// Raise the classified error carried by either error-envelope shape.
///
/// The top-level shape carries `error_code`, `error_message` and optional
/// `field_errors`; the nested shape puts a status/error pair inside `result`
/// and carries no field errors.
pub fn check_envelope(envelope: &Value) -> Result<()> {
    if status_of(envelope) == Some(ERROR_STATUS) {
        return Err(Error::from_provider(
            str_field(envelope, "error_code"),
            str_field(envelope, "error_message").unwrap_or_default(),
            envelope.get("field_errors"),
        ));
    }

    if let Some(result) = envelope.get("result").filter(|result| result.is_object()) {
        if status_of(result) == Some(ERROR_STATUS) {
            return Err(Error::from_provider(
                str_field(result, "error_code"),
                str_field(result, "error_message").unwrap_or_default(),
                None,
            ));
        }
    }

    Ok(())
}

fn take_result(envelope: Value, path: &str) -> Result<Value> {
    match envelope {
        Value::Object(mut map) => map
            .remove("result")
            .ok_or_else(|| Error::ParseError(format!("Response for `{path}` has no result"))),
        _ => Err(Error::ParseError(format!(
            "Response for `{path}` is not an object"
        ))),
    }
}

fn status_of(value: &Value) -> Option<&str> {
    value.get("status").and_then(Value::as_str)
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
