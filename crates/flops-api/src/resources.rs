//! VM resizing and IP address endpoints.

use crate::client::FlopsClient;
use crate::models::ResourceSpec;
use crate::Result;
use flops_core::ids::{TenantId, VmId};
use flops_core::QueryParams;
use serde_json::Value;

impl FlopsClient {
    /// Change RAM size in megabytes.
    ///
    /// # Errors
    ///
    /// Returns [`flops_core::Error::ValidationError`] before any request when
    /// `memory` is outside 512..=16384.
    pub fn change_vm_memory(
        &self,
        vm_id: VmId,
        memory: u32,
        allow_restart: bool,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        ResourceSpec {
            memory: Some(memory),
            ..ResourceSpec::default()
        }
        .check()?;

        let params = QueryParams::new()
            .with("memory", memory)
            .with("allow_restart", allow_restart);
        self.vm_action(vm_id, "memory_change", tenant_id, params)
    }

    /// Change disk size in megabytes.
    ///
    /// # Errors
    ///
    /// Returns [`flops_core::Error::ValidationError`] before any request when
    /// `disk` is outside 8192..=524288.
    pub fn change_vm_disk(
        &self,
        vm_id: VmId,
        disk: u32,
        allow_restart: bool,
        allow_memory_change: bool,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        ResourceSpec {
            disk: Some(disk),
            ..ResourceSpec::default()
        }
        .check()?;

        let params = QueryParams::new()
            .with("disk", disk)
            .with("allow_restart", allow_restart)
            .with("allow_memory_change", allow_memory_change);
        self.vm_action(vm_id, "disk_change", tenant_id, params)
    }

    /// Change the number of CPU cores.
    ///
    /// # Errors
    ///
    /// Returns [`flops_core::Error::ValidationError`] before any request when
    /// `cpu` is outside 1..=12.
    pub fn change_vm_cpu(&self, vm_id: VmId, cpu: u32, tenant_id: Option<TenantId>) -> Result<Value> {
        ResourceSpec {
            cpu: Some(cpu),
            ..ResourceSpec::default()
        }
        .check()?;

        self.vm_action(vm_id, "cpu_change", tenant_id, QueryParams::new().with("cpu", cpu))
    }

    /// Attach one more public IP.
    pub fn add_vm_ip(&self, vm_id: VmId, tenant_id: Option<TenantId>) -> Result<Value> {
        self.vm_action(vm_id, "ip_add", tenant_id, QueryParams::new())
    }

    /// Release a public IP.
    pub fn delete_vm_ip(&self, vm_id: VmId, ip: &str, tenant_id: Option<TenantId>) -> Result<Value> {
        self.vm_action(vm_id, "ip_delete", tenant_id, QueryParams::new().with("ip", ip))
    }

    /// Move a public IP to another VM.
    pub fn move_vm_ip(
        &self,
        vm_id: VmId,
        to_vm_id: VmId,
        ip: &str,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let params = QueryParams::new().with("to_vm_id", to_vm_id).with("ip", ip);
        self.vm_action(vm_id, "ip_move", tenant_id, params)
    }
}
