//! # flops-api
//!
//! Typed blocking client for the flops.ru VM hosting API.
//!
//! Every call is a GET through the shared `flops-core` pipeline: credentials
//! are attached, parameter keys are camelCased for the wire and response keys
//! come back snake_cased. Mutating calls return an envelope carrying an
//! `operation_id` that can be awaited with [`FlopsClient::wait_for_operation`].
//!
//! ## Example
//!
//! ```no_run
//! use flops_api::{FlopsClient, InstallVmOptions};
//! use flops_core::ids::{DistributionId, OperationId};
//! use std::time::Duration;
//!
//! # fn main() -> flops_api::Result<()> {
//! let client = FlopsClient::new("100", "api-key")?;
//! let options = InstallVmOptions::new("web-1", DistributionId::new(12))
//!     .with_resources(1024, 16384, 1);
//! let envelope = client.install_vm(&options)?;
//!
//! if let Some(id) = envelope["operation_id"].as_i64() {
//!     client.wait_for_operation(OperationId::new(id), Some(Duration::from_secs(600)))?;
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod backups;
pub mod client;
pub mod models;
pub mod pubkeys;
pub mod resources;
pub mod snapshots;
pub mod vm;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{FlopsClient, FlopsClientBuilder};
pub use models::{
    BackupPolicy, EditPubkeyOptions, InstallVmOptions, MatchType, ReinstallVmOptions,
    ResourceSpec, TariffFilter,
};

/// Result type for flops API operations.
pub type Result<T> = flops_core::Result<T>;
