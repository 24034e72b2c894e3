//! Tenant identity primitives.
//!
//! A tenant account record is keyed by `(tenant, environment)`. The tenant
//! identifier is assigned by the tenant-facing system and treated as opaque,
//! but it participates in storage key construction, so its character set is
//! validated at the boundary. The environment set is closed: every record
//! lives in exactly one of `Prod`, `UAT`, or `Dev`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A unique identifier for a tenant.
///
/// Tenant IDs must be:
/// - Non-empty and at most 63 characters
/// - Free of path separators and control characters (they appear in
///   storage keys)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new tenant ID after validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant ID is invalid.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates a tenant ID without validation.
    ///
    /// The caller must ensure the ID is valid. This is intended for use
    /// with IDs that have already been validated (e.g., read from storage).
    #[must_use]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the tenant ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a tenant ID string.
    fn validate(id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::InvalidId {
                message: "tenant ID cannot be empty".to_string(),
            });
        }

        if id.len() > 63 {
            return Err(Error::InvalidId {
                message: format!("tenant ID '{id}' is too long (maximum 63 characters)"),
            });
        }

        if id.contains('/') || id.contains('\\') {
            return Err(Error::InvalidId {
                message: format!("tenant ID '{id}' cannot contain path separators"),
            });
        }

        if id.chars().any(char::is_control) || id.contains('=') {
            return Err(Error::InvalidId {
                message: format!("tenant ID '{id}' contains reserved characters"),
            });
        }

        Ok(())
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deployment environment a tenant account belongs to.
///
/// The set is closed: upstream events carry one of these values in an
/// environment tag, and any other value is rejected at normalization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    /// Production.
    Prod,
    /// User acceptance testing.
    Uat,
    /// Development.
    Dev,
}

impl Environment {
    /// Returns the canonical upstream rendering of this environment.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prod => "Prod",
            Self::Uat => "UAT",
            Self::Dev => "Dev",
        }
    }

    /// Returns the lowercase form used in storage keys.
    #[must_use]
    pub fn key_str(&self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Uat => "uat",
            Self::Dev => "dev",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    /// Parses an environment tag value, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(Self::Prod),
            "uat" => Ok(Self::Uat),
            "dev" | "development" => Ok(Self::Dev),
            _ => Err(Error::InvalidId {
                message: format!("'{s}' is not a recognized environment"),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
