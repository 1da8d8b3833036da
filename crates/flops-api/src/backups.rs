//! Backup endpoints.

use crate::client::FlopsClient;
use crate::models::BackupPolicy;
use crate::Result;
use flops_core::ids::{TenantId, VmId};
use flops_core::QueryParams;
use serde_json::Value;

impl FlopsClient {
    /// List backups of a VM.
    pub fn get_vm_backups(&self, vm_id: VmId) -> Result<Vec<Value>> {
        self.list(&format!("vm/{vm_id}/backups"), QueryParams::new())
    }

    /// Replace the backup policy of a VM.
    ///
    /// A missing tenant resolves to the account's first tenant.
    ///
    /// # Errors
    ///
    /// Returns [`flops_core::Error::ValidationError`] before any request for
    /// an out-of-range quantity or an unsupported frequency.
    pub fn change_vm_backup_policy(
        &self,
        vm_id: VmId,
        policy: &BackupPolicy,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        policy.check()?;

        let params = QueryParams::new()
            .with("quantity", policy.quantity)
            .with("frequency", policy.frequency)
            .with("tenant_id", self.tenant_or_default(tenant_id)?);
        self.envelope(&format!("vm/{vm_id}/backup_policy_change"), params)
    }

    /// Roll a VM back to a backup, optionally taking a fresh backup first.
    pub fn rollback_vm_backup(
        &self,
        vm_id: VmId,
        backup: &str,
        create_backup: bool,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let params = QueryParams::new()
            .with("tenant_id", self.tenant_or_vm(tenant_id, vm_id)?)
            .with("backup", backup)
            .with("create_backup", create_backup);
        self.envelope(&format!("vm/{vm_id}/backup_rollback"), params)
    }
}
