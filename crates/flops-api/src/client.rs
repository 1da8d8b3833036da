//! flops API client
//!
//! Catalog queries and operation polling live here; the VM, resource, backup,
//! snapshot and key endpoints are implemented in their own modules as further
//! `impl FlopsClient` blocks.

use crate::models::{select_by_name, MatchType, TariffFilter};
use crate::Result;
use flops_core::ids::{OperationId, TenantId, VmId};
use flops_core::transport::Transport;
use flops_core::{Error, FlopsConfig, QueryParams, ServiceClient, ServiceClientBuilder};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Builder for [`FlopsClient`].
#[derive(Clone)]
pub struct FlopsClientBuilder {
    inner: ServiceClientBuilder,
}

impl FlopsClientBuilder {
    /// Create a builder from a configuration.
    #[must_use]
    pub fn new(config: FlopsConfig) -> Self {
        Self {
            inner: ServiceClientBuilder::new(config),
        }
    }

    /// Replace the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.inner = self.inner.with_transport(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] or [`Error::InvalidEndpoint`] for a bad
    /// configuration.
    pub fn build(self) -> Result<FlopsClient> {
        Ok(FlopsClient {
            inner: self.inner.build()?,
        })
    }
}

/// Blocking client for the flops.ru API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct FlopsClient {
    inner: ServiceClient,
}

impl FlopsClient {
    /// Create a client against the default endpoint.
    ///
    /// Empty credentials are accepted here and rejected on the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(client_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&FlopsConfig::new(client_id, api_key))
    }

    /// Create a client from a configuration.
    pub fn from_config(config: &FlopsConfig) -> Result<Self> {
        FlopsClientBuilder::new(config.clone()).build()
    }

    /// Create a client from `FLOPS_CLIENT_ID`, `FLOPS_API_KEY` and `FLOPS_ENDPOINT`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&FlopsConfig::from_env()?)
    }

    /// Start a builder.
    #[must_use]
    pub fn builder(config: FlopsConfig) -> FlopsClientBuilder {
        FlopsClientBuilder::new(config)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List tenants of the account.
    pub fn get_tenants(&self) -> Result<Vec<Value>> {
        self.list("tenant", QueryParams::new())
    }

    /// List tariffs, filtered and ordered locally.
    pub fn get_tariffs(&self, filter: &TariffFilter) -> Result<Vec<Value>> {
        let tariffs = self.list("tariffs", QueryParams::new())?;
        Ok(filter.apply(tariffs))
    }

    /// List OS distributions.
    pub fn get_distributions(&self) -> Result<Vec<Value>> {
        self.list("distribution", QueryParams::new())
    }

    /// List distributions whose name matches, ignoring case.
    pub fn get_distributions_by_name(
        &self,
        name: &str,
        match_type: MatchType,
    ) -> Result<Vec<Value>> {
        let distributions = self.get_distributions()?;
        Ok(select_by_name(distributions, name, match_type, true))
    }

    /// List installable software.
    pub fn get_software(&self) -> Result<Vec<Value>> {
        self.list("software", QueryParams::new())
    }

    /// Fetch the status payload of an operation.
    pub fn get_operation_status(&self, operation_id: OperationId) -> Result<Value> {
        self.inner.operation_status(operation_id)
    }

    /// Poll an operation at the configured interval until it is done.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationTimeout`] once `timeout` elapses and
    /// propagates any error raised by a status check.
    pub fn wait_for_operation(
        &self,
        operation_id: OperationId,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        self.inner.wait_for_operation(operation_id, timeout)
    }

    /// Poll an operation at an explicit interval until it is done.
    pub fn wait_for_operation_with_interval(
        &self,
        operation_id: OperationId,
        timeout: Option<Duration>,
        interval: Duration,
    ) -> Result<Value> {
        self.inner
            .wait_for_operation_with_interval(operation_id, timeout, interval)
    }

    pub(crate) fn envelope(&self, path: &str, params: QueryParams) -> Result<Value> {
        self.inner.perform(path, params)
    }

    pub(crate) fn result(&self, path: &str, params: QueryParams) -> Result<Value> {
        self.inner.perform_result(path, params)
    }

    pub(crate) fn list(&self, path: &str, params: QueryParams) -> Result<Vec<Value>> {
        match self.result(path, params)? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(Error::ParseError(format!(
                "Expected a list from `{path}`, got {other}"
            ))),
        }
    }

    /// The first tenant of the account.
    pub(crate) fn default_tenant_id(&self) -> Result<TenantId> {
        let tenants = self.get_tenants()?;
        let first = tenants
            .first()
            .ok_or_else(|| Error::NotFound("account has no tenants".to_string()))?;
        let tenant_id = id_field(first, "id").map(TenantId::new)?;
        debug!(%tenant_id, "Resolved default tenant");
        Ok(tenant_id)
    }

    pub(crate) fn tenant_or_default(&self, tenant_id: Option<TenantId>) -> Result<TenantId> {
        match tenant_id {
            Some(tenant_id) => Ok(tenant_id),
            None => self.default_tenant_id(),
        }
    }

    /// The given tenant, or the tenant owning `vm_id`.
    pub(crate) fn tenant_or_vm(&self, tenant_id: Option<TenantId>, vm_id: VmId) -> Result<TenantId> {
        match tenant_id {
            Some(tenant_id) => Ok(tenant_id),
            None => {
                let vm = self.get_vm(vm_id)?;
                id_field(&vm, "tenant_id").map(TenantId::new)
            }
        }
    }
}

pub(crate) fn id_field(value: &Value, key: &str) -> Result<i64> {
    value
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::ParseError(format!("Missing integer field `{key}`")))
}
