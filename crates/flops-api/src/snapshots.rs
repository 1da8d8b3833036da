//! Snapshot endpoints.

use crate::client::FlopsClient;
use crate::Result;
use flops_core::ids::{SnapshotId, TenantId, VmId};
use flops_core::QueryParams;
use serde_json::Value;

impl FlopsClient {
    /// List snapshots of a VM.
    pub fn get_vm_snapshots(&self, vm_id: VmId) -> Result<Vec<Value>> {
        self.list(&format!("vm/{vm_id}/snapshots/"), QueryParams::new())
    }

    /// Take a snapshot.
    pub fn create_vm_snapshot(
        &self,
        vm_id: VmId,
        name: &str,
        description: &str,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let params = QueryParams::new()
            .with("name", name)
            .with("description", description);
        self.vm_action(vm_id, "snapshot_create", tenant_id, params)
    }

    /// Roll a VM back to a snapshot.
    pub fn rollback_vm_snapshot(
        &self,
        vm_id: VmId,
        snapshot_id: SnapshotId,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let params = QueryParams::new().with("snapshot_id", snapshot_id);
        self.vm_action(vm_id, "snapshot_rollback", tenant_id, params)
    }

    /// Delete a snapshot and, optionally, the snapshots derived from it.
    pub fn delete_vm_snapshot(
        &self,
        vm_id: VmId,
        snapshot_id: SnapshotId,
        delete_children: bool,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let params = QueryParams::new()
            .with("snapshot_id", snapshot_id)
            .with("delete_children", delete_children);
        self.vm_action(vm_id, "snapshot_delete", tenant_id, params)
    }
}
