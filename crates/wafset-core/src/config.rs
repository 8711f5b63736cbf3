//! Configuration types for wafset
//!
//! This module defines the invocation configuration and the identity of the
//! IP set being managed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Deployment context of an IP set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Edge (CloudFront distributions)
    #[default]
    Cloudfront,
    /// Regional resources (ALB, API Gateway, ...)
    Regional,
}

impl Scope {
    /// Wire name of the scope
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Cloudfront => "CLOUDFRONT",
            Scope::Regional => "REGIONAL",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLOUDFRONT" => Ok(Scope::Cloudfront),
            "REGIONAL" => Ok(Scope::Regional),
            other => Err(Error::config(format!(
                "invalid scope '{}'. Valid scopes: CLOUDFRONT, REGIONAL",
                other
            ))),
        }
    }
}

/// Action to execute against the IP set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Add CIDR entries
    AddIp,
    /// Remove CIDR entries
    RemoveIp,
    /// Remove every entry
    Clear,
}

impl Action {
    /// All supported actions, in the order shown to users
    pub const ALL: [Action; 3] = [Action::AddIp, Action::RemoveIp, Action::Clear];

    /// Flag value of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AddIp => "add-ip",
            Action::RemoveIp => "remove-ip",
            Action::Clear => "clear",
        }
    }

    /// Whether the action consumes a list of CIDRs
    pub fn needs_addresses(&self) -> bool {
        !matches!(self, Action::Clear)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s.trim())
            .ok_or_else(|| {
                Error::config(format!(
                    "invalid action '{}'. Valid actions: add-ip, remove-ip, clear",
                    s
                ))
            })
    }
}

/// Identity of the remote IP set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpSetInfo {
    /// IP set name
    pub name: String,
    /// IP set ID
    pub id: String,
    /// IP set scope
    pub scope: Scope,
}

impl IpSetInfo {
    /// Create a new IP set identity
    pub fn new(name: impl Into<String>, id: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            scope,
        }
    }
}

impl fmt::Display for IpSetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] - {} ({})", self.id, self.name, self.scope)
    }
}

/// Configuration for one invocation
///
/// Holds credentials selection, resource identity and the action directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteConfig {
    /// AWS shared config profile
    pub profile: String,

    /// AWS region
    pub region: String,

    /// Action to execute
    pub action: Action,

    /// IP set ID
    pub id: String,

    /// IP set name
    pub name: String,

    /// IP set scope
    #[serde(default)]
    pub scope: Scope,

    /// Read and reconcile, but skip the write
    #[serde(default)]
    pub dry_run: bool,
}

impl ExecuteConfig {
    /// Validate the configuration
    ///
    /// Every identifying field must be non-empty; the error names the first
    /// missing one.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("profile", &self.profile), ("region", &self.region)] {
            if value.trim().is_empty() {
                return Err(Error::config(format!(
                    "invalid ip set aws config: {} is required",
                    field
                )));
            }
        }

        for (field, value) in [("id", &self.id), ("name", &self.name)] {
            if value.trim().is_empty() {
                return Err(Error::config(format!(
                    "invalid ip set information: {} is required",
                    field
                )));
            }
        }

        Ok(())
    }

    /// Identity of the IP set this configuration targets
    pub fn ip_set_info(&self) -> IpSetInfo {
        IpSetInfo::new(self.name.clone(), self.id.clone(), self.scope)
    }
}
