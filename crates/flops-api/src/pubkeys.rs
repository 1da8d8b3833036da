//! SSH public key endpoints.

use crate::client::FlopsClient;
use crate::models::{select_by_name, EditPubkeyOptions, MatchType};
use crate::Result;
use flops_core::ids::{PublicKeyId, TenantId};
use flops_core::{Error, QueryParams};
use serde_json::Value;

impl FlopsClient {
    /// List public keys of the account.
    pub fn get_pubkeys(&self) -> Result<Vec<Value>> {
        self.list("pubkeys", QueryParams::new())
    }

    /// Find a public key by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no listed key has this id.
    pub fn get_pubkey(&self, key_id: PublicKeyId) -> Result<Value> {
        self.get_pubkeys()?
            .into_iter()
            .find(|key| key.get("id").and_then(Value::as_i64) == Some(key_id.get()))
            .ok_or_else(|| Error::NotFound(format!("public key {key_id}")))
    }

    /// List public keys by name. Case-sensitive; an empty name matches nothing.
    pub fn get_pubkeys_by_name(&self, name: &str, match_type: MatchType) -> Result<Vec<Value>> {
        if name.is_empty() {
            return Ok(Vec::new());
        }
        Ok(select_by_name(self.get_pubkeys()?, name, match_type, false))
    }

    /// Register a public key and return the stored key.
    pub fn add_pubkey(
        &self,
        name: &str,
        public_key: &str,
        tenant_id: Option<TenantId>,
    ) -> Result<Value> {
        let params = QueryParams::new()
            .with("tenant_id", self.tenant_or_default(tenant_id)?)
            .with("name", name)
            .with("public_key", public_key);
        self.result("pubkeys/add", params)
    }

    /// Update the name or material of a public key.
    pub fn edit_pubkey(&self, key_id: PublicKeyId, options: &EditPubkeyOptions) -> Result<Value> {
        let tenant_id = self.tenant_or_default(options.tenant_id)?;
        self.result(&format!("pubkeys/{key_id}/edit"), options.to_params(tenant_id))
    }

    /// Remove a public key.
    pub fn delete_pubkey(&self, key_id: PublicKeyId, tenant_id: Option<TenantId>) -> Result<Value> {
        let params = QueryParams::new().with("tenant_id", self.tenant_or_default(tenant_id)?);
        self.envelope(&format!("pubkeys/{key_id}/delete"), params)
    }
}
