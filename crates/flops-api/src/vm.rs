//! VM lifecycle endpoints.

use crate::client::FlopsClient;
use crate::models::{select_by_name, InstallVmOptions, MatchType, ReinstallVmOptions};
use crate::Result;
use flops_core::ids::{PublicKeyId, SnapshotId, TenantId, VmId};
use flops_core::{Error, QueryParams};
use serde_json::Value;

impl FlopsClient {
    /// List all VMs of the account.
    pub fn get_vms(&self) -> Result<Vec<Value>> {
        self.list("vm", QueryParams::new())
    }

    /// List VMs whose name matches exactly or by prefix/suffix. Case-sensitive;
    /// an empty name matches nothing.
    pub fn get_vms_by_name(&self, name: &str, match_type: MatchType) -> Result<Vec<Value>> {
        if name.is_empty() {
            return Ok(Vec::new());
        }
        Ok(select_by_name(self.get_vms()?, name, match_type, false))
    }

    /// Fetch a single VM.
    pub fn get_vm(&self, vm_id: VmId) -> Result<Value> {
        self.result(&format!("vm/{vm_id}/"), QueryParams::new())
    }

    /// Install a new VM.
    ///
    /// The returned envelope carries `operation_id` and the new VM id under
    /// `vm_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] before any request when the options
    /// fail local validation.
    pub fn install_vm(&self, options: &InstallVmOptions) -> Result<Value> {
        options.check()?;
        let tenant_id = self.tenant_or_default(options.tenant_id)?;

        let envelope = self.envelope("vm/install/", options.to_params(tenant_id))?;
        match envelope {
            Value::Object(mut map) => {
                let vm_id = map.remove("result").unwrap_or(Value::Null);
                map.insert("vm_id".to_string(), vm_id);
                Ok(Value::Object(map))
            }
            other => Err(Error::ParseError(format!(
                "Response for `vm/install/` is not an object: {other}"
            ))),
        }
    }

    /// Reinstall a VM, optionally changing its distribution and sizing.
    pub fn reinstall_vm(&self, vm_id: VmId, options: &ReinstallVmOptions) -> Result<Value> {
        options.check()?;
        let tenant_id = self.tenant_or_default(options.tenant_id)?;
        self.envelope(
            &format!("vm/{vm_id}/reinstall/"),
            options.to_params(tenant_id),
        )
    }

    /// Clone a VM, optionally from one of its snapshots.
    pub fn clone_vm(
        &self,
        vm_id: VmId,
        name: &str,
        tenant_id: Option<TenantId>,
        snapshot_id: Option<SnapshotId>,
    ) -> Result<Value> {
        let mut params = QueryParams::new();
        params.push("tenant_id", self.tenant_or_default(tenant_id)?);
        params.push("vm_id", vm_id);
        params.push("name", name);
        params.push_opt("snapshot_id", snapshot_id);
        self.envelope(&format!("vm/{vm_id}/clone/"), params)
    }

    /// Rename a VM.
    pub fn rename_vm(
        &self,
        vm_id: VmId,
        new_name: &str,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let params = QueryParams::new().with("name", new_name);
        self.vm_action(vm_id, "rename", tenant_id, params)
    }

    /// Start a VM.
    pub fn start_vm(&self, vm_id: VmId, tenant_id: Option<TenantId>) -> Result<Value> {
        self.vm_action(vm_id, "start", tenant_id, QueryParams::new())
    }

    /// Hard-reset a VM.
    pub fn reset_vm(&self, vm_id: VmId, tenant_id: Option<TenantId>) -> Result<Value> {
        self.vm_action(vm_id, "reset", tenant_id, QueryParams::new())
    }

    /// Reboot a VM.
    pub fn reboot_vm(&self, vm_id: VmId, tenant_id: Option<TenantId>) -> Result<Value> {
        self.vm_action(vm_id, "reboot", tenant_id, QueryParams::new())
    }

    /// Power a VM off.
    pub fn poweroff_vm(&self, vm_id: VmId, tenant_id: Option<TenantId>) -> Result<Value> {
        self.vm_action(vm_id, "poweroff", tenant_id, QueryParams::new())
    }

    /// Shut a VM down gracefully.
    pub fn shutdown_vm(&self, vm_id: VmId, tenant_id: Option<TenantId>) -> Result<Value> {
        self.vm_action(vm_id, "shutdown", tenant_id, QueryParams::new())
    }

    /// Delete a VM.
    pub fn delete_vm(&self, vm_id: VmId, tenant_id: Option<TenantId>) -> Result<Value> {
        self.vm_action(vm_id, "delete", tenant_id, QueryParams::new())
    }

    /// Change the root password.
    pub fn change_vm_password(
        &self,
        vm_id: VmId,
        password: &str,
        send_password: bool,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let params = QueryParams::new()
            .with("password", password)
            .with("send_password", send_password);
        self.vm_action(vm_id, "password_change", tenant_id, params)
    }

    /// Replace the public keys installed on a VM.
    pub fn change_vm_pubkeys(
        &self,
        vm_id: VmId,
        key_ids: &[PublicKeyId],
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let mut params = QueryParams::new();
        params.push_list("key_ids", key_ids.iter().copied());
        self.vm_action(vm_id, "pubkey_change", tenant_id, params)
    }

    /// `vm/{id}/{action}/` with the VM tenant attached.
    pub(crate) fn vm_action(
        &self,
        vm_id: VmId,
        action: &str,
        tenant_id: Option<TenantId>,
        params: QueryParams,
    ) -> Result<Value> {
        let mut params = params;
        params.push("tenant_id", self.tenant_or_vm(tenant_id, vm_id)?);
        self.envelope(&format!("vm/{vm_id}/{action}/"), params)
    }
}
