//! # flops-core
//!
//! Core types and the request pipeline for the flops.ru VM hosting API.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and provider error-code classification
//! - [`case`] - snake_case / camelCase key transcoding
//! - [`ids`] - Strongly-typed integer identifiers
//! - [`query`] - Request parameter builder and query-string encoding
//! - [`config`] - Client configuration and credentials
//! - [`transport`] - Blocking HTTP transport seam
//! - [`client`] - Request/response pipeline
//! - [`poll`] - Operation status polling

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod case;
pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod poll;
pub mod query;
pub mod transport;

// Re-export commonly used types
pub use client::{ServiceClient, ServiceClientBuilder};
pub use config::{Credentials, FlopsConfig};
pub use error::{Error, Result};
pub use query::QueryParams;
