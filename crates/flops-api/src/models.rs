//! Option structs, filters and local validation for flops endpoints.

use crate::Result;
use flops_core::ids::{DistributionId, PublicKeyId, SoftwareId, TariffId, TenantId};
use flops_core::{Error, QueryParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use validator::Validate;

/// Smallest accepted RAM size in megabytes.
pub const MIN_MEMORY_MB: u32 = 512;
/// Largest accepted RAM size in megabytes.
pub const MAX_MEMORY_MB: u32 = 16384;
/// Smallest accepted disk size in megabytes.
pub const MIN_DISK_MB: u32 = 8192;
/// Largest accepted disk size in megabytes.
pub const MAX_DISK_MB: u32 = 524_288;
/// Largest accepted disk-to-memory ratio.
pub const MAX_DISK_TO_MEMORY_RATIO: u64 = 64;
/// Accepted backup intervals in hours.
pub const BACKUP_FREQUENCIES: [u32; 5] = [3, 6, 12, 24, 72];

/// How a name filter compares candidate names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Whole-name equality.
    #[default]
    Equal,
    /// Candidate starts with the needle.
    StartsWith,
    /// Candidate ends with the needle.
    EndsWith,
}

impl MatchType {
    /// Compare `candidate` against `needle`.
    #[must_use]
    pub fn matches(self, candidate: &str, needle: &str) -> bool {
        match self {
            Self::Equal => candidate == needle,
            Self::StartsWith => candidate.starts_with(needle),
            Self::EndsWith => candidate.ends_with(needle),
        }
    }
}

/// Keep the objects whose `name` field matches `needle`.
pub(crate) fn select_by_name(
    items: Vec<Value>,
    needle: &str,
    match_type: MatchType,
    ignore_case: bool,
) -> Vec<Value> {
    let needle = if ignore_case {
        needle.to_lowercase()
    } else {
        needle.to_string()
    };

    items
        .into_iter()
        .filter(|item| {
            item.get("name").and_then(Value::as_str).is_some_and(|name| {
                if ignore_case {
                    match_type.matches(&name.to_lowercase(), &needle)
                } else {
                    match_type.matches(name, &needle)
                }
            })
        })
        .collect()
}

/// Client-side filters applied to the tariff list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffFilter {
    /// Keep only tariffs whose `for_windows` flag equals this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_windows: Option<bool>,
    /// Keep only tariffs whose `on_demand` flag equals this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand: Option<bool>,
    /// Sort ascending by this key; tariffs lacking it sort as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl TariffFilter {
    /// Create an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the Windows flag.
    #[must_use]
    pub fn for_windows(mut self, for_windows: bool) -> Self {
        self.for_windows = Some(for_windows);
        self
    }

    /// Filter on the on-demand flag.
    #[must_use]
    pub fn on_demand(mut self, on_demand: bool) -> Self {
        self.on_demand = Some(on_demand);
        self
    }

    /// Sort by the given key.
    #[must_use]
    pub fn order_by(mut self, key: impl Into<String>) -> Self {
        self.order_by = Some(key.into());
        self
    }

    /// Apply the filter to a tariff list.
    #[must_use]
    pub fn apply(&self, tariffs: Vec<Value>) -> Vec<Value> {
        let flag_matches = |tariff: &Value, key: &str, wanted: Option<bool>| {
            wanted.map_or(true, |wanted| tariff.get(key).and_then(Value::as_bool) == Some(wanted))
        };

        let filtered = tariffs
            .into_iter()
            .filter(|tariff| flag_matches(tariff, "for_windows", self.for_windows))
            .filter(|tariff| flag_matches(tariff, "on_demand", self.on_demand))
            .collect::<Vec<_>>();

        match self.order_by.as_deref() {
            Some(key) if !key.is_empty() => order_by_key(filtered, key, false),
            _ => filtered,
        }
    }
}

/// Stable sort of objects by the value under `key`, treating a missing key as 0.
#[must_use]
pub fn order_by_key(mut items: Vec<Value>, key: &str, descending: bool) -> Vec<Value> {
    let zero = Value::from(0);
    items.sort_by(|a, b| {
        let ordering = compare_values(a.get(key).unwrap_or(&zero), b.get(key).unwrap_or(&zero));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    items
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Memory, disk and CPU sizing shared by install, reinstall and resize calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Validate)]
pub struct ResourceSpec {
    /// RAM in megabytes.
    #[validate(range(min = 512, max = 16384))]
    pub memory: Option<u32>,
    /// Disk in megabytes.
    #[validate(range(min = 8192, max = 524_288))]
    pub disk: Option<u32>,
    /// CPU cores.
    #[validate(range(min = 1, max = 12))]
    pub cpu: Option<u32>,
}

impl ResourceSpec {
    /// Check ranges and, when both are given, the disk-to-memory ratio.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] naming the offending field.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if let (Some(memory), Some(disk)) = (self.memory, self.disk) {
            if u64::from(disk) > MAX_DISK_TO_MEMORY_RATIO * u64::from(memory) {
                return Err(Error::ValidationError(format!(
                    "disk/memory ratio must not exceed {MAX_DISK_TO_MEMORY_RATIO} (disk {disk} MB, memory {memory} MB)"
                )));
            }
        }
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}

/// Parameters for `vm/install/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InstallVmOptions {
    /// VM name.
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Distribution to install.
    pub distribution_id: DistributionId,
    /// Owning tenant; the first tenant of the account when absent.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    /// Fixed tariff; sizing fields are ignored by the provider when set.
    #[serde(default)]
    pub tariff_id: Option<TariffId>,
    /// RAM in megabytes.
    #[serde(default)]
    pub memory: Option<u32>,
    /// Disk in megabytes.
    #[serde(default)]
    pub disk: Option<u32>,
    /// CPU cores.
    #[serde(default)]
    pub cpu: Option<u32>,
    /// Number of public IPs.
    #[serde(default)]
    pub ip_count: Option<u32>,
    /// Root password.
    #[serde(default)]
    pub password: Option<String>,
    /// Email the password to the account owner.
    #[serde(default = "default_true")]
    pub send_password: bool,
    /// Grant provider support access to the VM.
    #[serde(default)]
    pub open_support_access: bool,
    /// Public keys to install.
    #[serde(default)]
    pub public_key_ids: Vec<PublicKeyId>,
    /// Software to preinstall.
    #[serde(default)]
    pub software_ids: Vec<SoftwareId>,
}

impl InstallVmOptions {
    /// Wire parameters that must always be sent.
    pub const REQUIRED: &'static [&'static str] = &["name", "tenant_id", "distribution_id"];

    /// Create options with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, distribution_id: DistributionId) -> Self {
        Self {
            name: name.into(),
            distribution_id,
            tenant_id: None,
            tariff_id: None,
            memory: None,
            disk: None,
            cpu: None,
            ip_count: None,
            password: None,
            send_password: true,
            open_support_access: false,
            public_key_ids: Vec::new(),
            software_ids: Vec::new(),
        }
    }

    /// Set the tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Set the tariff.
    #[must_use]
    pub fn with_tariff(mut self, tariff_id: TariffId) -> Self {
        self.tariff_id = Some(tariff_id);
        self
    }

    /// Set custom sizing.
    #[must_use]
    pub fn with_resources(mut self, memory: u32, disk: u32, cpu: u32) -> Self {
        self.memory = Some(memory);
        self.disk = Some(disk);
        self.cpu = Some(cpu);
        self
    }

    /// Set the number of public IPs.
    #[must_use]
    pub fn with_ip_count(mut self, ip_count: u32) -> Self {
        self.ip_count = Some(ip_count);
        self
    }

    /// Set the root password and whether it is emailed.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>, send_password: bool) -> Self {
        self.password = Some(password.into());
        self.send_password = send_password;
        self
    }

    /// Set whether support access is granted.
    #[must_use]
    pub fn with_support_access(mut self, open: bool) -> Self {
        self.open_support_access = open;
        self
    }

    /// Set the public keys.
    #[must_use]
    pub fn with_public_keys(mut self, keys: impl IntoIterator<Item = PublicKeyId>) -> Self {
        self.public_key_ids = keys.into_iter().collect();
        self
    }

    /// Set the preinstalled software.
    #[must_use]
    pub fn with_software(mut self, software: impl IntoIterator<Item = SoftwareId>) -> Self {
        self.software_ids = software.into_iter().collect();
        self
    }

    /// Validate the options locally.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an empty name or out-of-range sizing.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.resources().check()
    }

    /// Sizing subset of the options.
    #[must_use]
    pub const fn resources(&self) -> ResourceSpec {
        ResourceSpec {
            memory: self.memory,
            disk: self.disk,
            cpu: self.cpu,
        }
    }

    pub(crate) fn to_params(&self, tenant_id: TenantId) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("name", self.name.as_str());
        params.push("tenant_id", tenant_id);
        params.push("distribution_id", self.distribution_id);
        params.push_opt("tariff_id", self.tariff_id);
        params.push_opt("memory", self.memory);
        params.push_opt("disk", self.disk);
        params.push_opt("cpu", self.cpu);
        params.push_opt("ip_count", self.ip_count);
        params.push_opt("password", self.password.as_deref());
        params.push("send_password", self.send_password);
        params.push("open_support_access", self.open_support_access);
        params.push_list("public_key_ids", self.public_key_ids.iter().copied());
        params.push_list("software_ids", self.software_ids.iter().copied());
        params
    }
}

/// Parameters for `vm/{id}/reinstall/`; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReinstallVmOptions {
    /// New VM name.
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[serde(default)]
    pub name: Option<String>,
    /// New distribution.
    #[serde(default)]
    pub distribution_id: Option<DistributionId>,
    /// Owning tenant; the first tenant of the account when absent.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    /// New tariff.
    #[serde(default)]
    pub tariff_id: Option<TariffId>,
    /// RAM in megabytes.
    #[serde(default)]
    pub memory: Option<u32>,
    /// Disk in megabytes.
    #[serde(default)]
    pub disk: Option<u32>,
    /// CPU cores.
    #[serde(default)]
    pub cpu: Option<u32>,
    /// Root password.
    #[serde(default)]
    pub password: Option<String>,
    /// Email the password to the account owner.
    #[serde(default = "default_true")]
    pub send_password: bool,
    /// Grant provider support access to the VM.
    #[serde(default)]
    pub open_support_access: bool,
    /// Public keys to install.
    #[serde(default)]
    pub public_key_ids: Vec<PublicKeyId>,
    /// Software to preinstall.
    #[serde(default)]
    pub software_ids: Vec<SoftwareId>,
}

impl Default for ReinstallVmOptions {
    fn default() -> Self {
        Self {
            name: None,
            distribution_id: None,
            tenant_id: None,
            tariff_id: None,
            memory: None,
            disk: None,
            cpu: None,
            password: None,
            send_password: true,
            open_support_access: false,
            public_key_ids: Vec::new(),
            software_ids: Vec::new(),
        }
    }
}

impl ReinstallVmOptions {
    /// Validate the options locally.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an empty name or out-of-range sizing.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        ResourceSpec {
            memory: self.memory,
            disk: self.disk,
            cpu: self.cpu,
        }
        .check()
    }

    pub(crate) fn to_params(&self, tenant_id: TenantId) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("name", self.name.as_deref());
        params.push("tenant_id", tenant_id);
        params.push_opt("distribution_id", self.distribution_id);
        params.push_opt("tariff_id", self.tariff_id);
        params.push_opt("memory", self.memory);
        params.push_opt("disk", self.disk);
        params.push_opt("cpu", self.cpu);
        params.push_opt("password", self.password.as_deref());
        params.push("send_password", self.send_password);
        params.push("open_support_access", self.open_support_access);
        params.push_list("public_key_ids", self.public_key_ids.iter().copied());
        params.push_list("software_ids", self.software_ids.iter().copied());
        params
    }
}

/// Backup retention policy for a VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BackupPolicy {
    /// Number of copies kept (1-10).
    #[validate(range(min = 1, max = 10))]
    pub quantity: u32,
    /// Hours between copies; one of [`BACKUP_FREQUENCIES`].
    pub frequency: u32,
}

impl BackupPolicy {
    /// Create a policy.
    #[must_use]
    pub const fn new(quantity: u32, frequency: u32) -> Self {
        Self {
            quantity,
            frequency,
        }
    }

    /// Validate quantity and frequency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] when either value is out of range.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if !BACKUP_FREQUENCIES.contains(&self.frequency) {
            return Err(Error::ValidationError(format!(
                "frequency: must be one of {BACKUP_FREQUENCIES:?} hours, got {}",
                self.frequency
            )));
        }
        Ok(())
    }
}

/// Parameters for `pubkeys/{id}/edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPubkeyOptions {
    /// Owning tenant; the first tenant of the account when absent.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    /// New key name; empty strings are not sent.
    #[serde(default)]
    pub name: Option<String>,
    /// New key material; empty strings are not sent.
    #[serde(default)]
    pub public_key: Option<String>,
}

impl EditPubkeyOptions {
    pub(crate) fn to_params(&self, tenant_id: TenantId) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("tenant_id", tenant_id);
        params.push_opt("name", self.name.as_deref().filter(|name| !name.is_empty()));
        params.push_opt(
            "public_key",
            self.public_key.as_deref().filter(|key| !key.is_empty()),
        );
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_by_key_sorts_missing_as_zero() {
        let items = vec![json!({"k": 2}), json!({"k": 12}), json!({"k": 1}), json!({"b": 0})];
        assert_eq!(
            order_by_key(items, "k", false),
            vec![json!({"b": 0}), json!({"k": 1}), json!({"k": 2}), json!({"k": 12})]
        );
    }

    #[test]
    fn order_by_key_descending() {
        let items = vec![json!({"k": 1}), json!({"k": 3}), json!({"k": 2})];
        let sorted = order_by_key(items, "k", true);
        assert_eq!(sorted[0]["k"], 3);
        assert_eq!(sorted[2]["k"], 1);
    }

    #[test]
    fn tariff_filter_applies_flags_and_order() {
        let tariffs = vec![
            json!({"id": 1, "memory": 2048, "for_windows": false, "on_demand": true}),
            json!({"id": 2, "memory": 512, "for_windows": false, "on_demand": false}),
            json!({"id": 3, "memory": 1024, "for_windows": true, "on_demand": true}),
            json!({"id": 4, "memory": 1024, "for_windows": false, "on_demand": true}),
        ];

        let linux = TariffFilter::new().for_windows(false).order_by("memory").apply(tariffs.clone());
        let ids = linux.iter().map(|t| t["id"].as_i64().unwrap()).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 4, 1]);

        let on_demand = TariffFilter::new().on_demand(true).apply(tariffs);
        assert_eq!(on_demand.len(), 3);
    }

    #[test]
    fn select_by_name_modes() {
        let items = vec![
            json!({"name": "Debian 9"}),
            json!({"name": "debian 10"}),
            json!({"name": "Ubuntu"}),
        ];

        let equal = select_by_name(items.clone(), "DEBIAN 9", MatchType::Equal, true);
        assert_eq!(equal.len(), 1);

        let starts = select_by_name(items.clone(), "debian", MatchType::StartsWith, true);
        assert_eq!(starts.len(), 2);

        let case_sensitive = select_by_name(items.clone(), "debian", MatchType::StartsWith, false);
        assert_eq!(case_sensitive.len(), 1);

        let ends = select_by_name(items, "10", MatchType::EndsWith, false);
        assert_eq!(ends.len(), 1);
    }

    #[test]
    fn install_options_validate_name_and_ranges() {
        let ok = InstallVmOptions::new("web-1", DistributionId::new(4)).with_resources(512, 8192, 1);
        assert!(ok.check().is_ok());

        let empty_name = InstallVmOptions::new("", DistributionId::new(4));
        assert!(matches!(empty_name.check(), Err(Error::ValidationError(_))));

        let too_much_memory =
            InstallVmOptions::new("web-1", DistributionId::new(4)).with_resources(32768, 8192, 1);
        assert!(matches!(too_much_memory.check(), Err(Error::ValidationError(_))));

        let too_many_cpus =
            InstallVmOptions::new("web-1", DistributionId::new(4)).with_resources(1024, 8192, 13);
        assert!(matches!(too_many_cpus.check(), Err(Error::ValidationError(_))));
    }

    #[test]
    fn resource_ratio_is_enforced() {
        let spec = ResourceSpec {
            memory: Some(512),
            disk: Some(512 * 64),
            cpu: None,
        };
        assert!(spec.check().is_ok());

        let spec = ResourceSpec {
            memory: Some(512),
            disk: Some(512 * 64 + 1),
            cpu: None,
        };
        assert!(matches!(spec.check(), Err(Error::ValidationError(_))));
    }

    #[test]
    fn install_params_include_lists_and_flags() {
        let options = InstallVmOptions::new("web-1", DistributionId::new(4))
            .with_tariff(TariffId::new(9))
            .with_password("pw", false)
            .with_public_keys([PublicKeyId::new(1), PublicKeyId::new(2)]);

        let params = options.to_params(TenantId::new(3));
        assert_eq!(params.get("tenant_id"), Some(&json!(3)));
        assert_eq!(params.get("tariff_id"), Some(&json!(9)));
        assert_eq!(params.get("send_password"), Some(&json!(false)));
        assert_eq!(params.get("public_key_ids"), Some(&json!([1, 2])));
        assert_eq!(params.get("memory"), None);
        for key in InstallVmOptions::REQUIRED {
            assert!(params.get(key).is_some(), "{key} missing");
        }
    }

    #[test]
    fn reinstall_defaults() {
        let options = ReinstallVmOptions::default();
        assert!(options.send_password);
        assert!(!options.open_support_access);
        assert!(options.check().is_ok());

        let bad = ReinstallVmOptions {
            name: Some(String::new()),
            ..ReinstallVmOptions::default()
        };
        assert!(bad.check().is_err());
    }

    #[test]
    fn backup_policy_bounds() {
        assert!(BackupPolicy::new(3, 24).check().is_ok());
        assert!(BackupPolicy::new(0, 24).check().is_err());
        assert!(BackupPolicy::new(11, 24).check().is_err());
        assert!(BackupPolicy::new(3, 5).check().is_err());
    }

    #[test]
    fn edit_pubkey_skips_empty_strings() {
        let options = EditPubkeyOptions {
            tenant_id: None,
            name: Some(String::new()),
            public_key: Some("ssh-ed25519 AAAA".to_string()),
        };
        let params = options.to_params(TenantId::new(1));
        assert_eq!(params.get("name"), None);
        assert_eq!(params.get("public_key"), Some(&json!("ssh-ed25519 AAAA")));
    }

    #[test]
    fn install_options_deserialize_with_defaults() {
        let options: InstallVmOptions =
            serde_json::from_value(json!({"name": "db", "distribution_id": 12})).unwrap();
        assert!(options.send_password);
        assert!(options.public_key_ids.is_empty());
        assert_eq!(options.distribution_id, DistributionId::new(12));
    }
}
