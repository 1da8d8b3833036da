//! Wiremock harness for driving the blocking client from plain `#[test]`s.

use crate::FlopsClient;
use flops_core::FlopsConfig;
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock server plus the runtime serving it. The server is dropped first so
/// its expectations are verified while the runtime is still alive.
pub(crate) struct Harness {
    pub(crate) server: MockServer,
    runtime: Runtime,
}

impl Harness {
    pub(crate) fn start() -> Self {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub(crate) fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Serve `tenant` with the given ids in order.
    pub(crate) fn mount_tenants(&self, ids: &[i64]) {
        let tenants = ids
            .iter()
            .map(|id| json!({"id": id, "name": format!("tenant-{id}")}))
            .collect::<Vec<_>>();
        self.mount(
            Mock::given(method("GET"))
                .and(path("/api/v1/tenant"))
                .respond_with(ok(Value::Array(tenants))),
        );
    }

    /// Serve `vm/{id}` with a VM owned by `tenant_id`.
    pub(crate) fn mount_vm(&self, vm_id: i64, tenant_id: i64) {
        self.mount(
            Mock::given(method("GET"))
                .and(path(format!("/api/v1/vm/{vm_id}/")))
                .respond_with(ok(json!({
                    "id": vm_id,
                    "name": format!("vm-{vm_id}"),
                    "tenantId": tenant_id,
                    "status": "RUNNING"
                }))),
        );
    }

    /// Raw query strings of every request received so far.
    pub(crate) fn received_queries(&self) -> Vec<String> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .map(|request| request.url.query().unwrap_or_default().to_string())
            .collect()
    }

    pub(crate) fn client(&self) -> FlopsClient {
        self.client_with_credentials("100", "secret")
    }

    pub(crate) fn client_with_credentials(&self, client_id: &str, api_key: &str) -> FlopsClient {
        let config = FlopsConfig::new(client_id, api_key)
            .with_endpoint(format!("{}/api/v1/", self.server.uri()))
            .with_poll_interval_ms(10);
        FlopsClient::from_config(&config).unwrap()
    }
}

/// A success envelope around `result`.
pub(crate) fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "result": result}))
}

/// A success envelope carrying an operation id, as returned by mutating calls.
pub(crate) fn operation(operation_id: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "operationId": operation_id}))
}
