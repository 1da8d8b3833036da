//! Strongly-typed integer identifiers for flops resources.
//!
//! The provider identifies every object by an integer. Wrapping each kind in its
//! own type prevents passing a VM id where a tenant id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed id wrapper types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new id wrapper.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw integer id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Parses an id from a decimal string.
            ///
            /// # Errors
            ///
            /// Returns a validation error if the string is not made of digits.
            pub fn parse_str(input: &str) -> Result<Self> {
                let trimmed = input.trim();
                if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::ValidationError(format!(
                        "{}: expected a numeric id, got `{input}`",
                        stringify!($name)
                    )));
                }
                trimmed.parse::<i64>().map(Self).map_err(|err| {
                    Error::ValidationError(format!("{}: {err}", stringify!($name)))
                })
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(wrapper: $name) -> Self {
                wrapper.0
            }
        }

        impl From<$name> for serde_json::Value {
            fn from(wrapper: $name) -> Self {
                Self::from(wrapper.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(VmId, "Virtual machine id");
id_type!(TenantId, "Tenant (project) id");
id_type!(OperationId, "Asynchronous operation id");
id_type!(DistributionId, "OS distribution id");
id_type!(TariffId, "Tariff (plan) id");
id_type!(SoftwareId, "Preinstalled software id");
id_type!(PublicKeyId, "SSH public key id");
id_type!(SnapshotId, "VM snapshot id");
