// # IP Set Provider Trait
//
// Defines the interface for reading and writing a remote IP set.
//
// ## Implementations
//
// - AWS WAFv2: `wafset-provider-aws` crate
// - In-memory: `wafset_core::provider::MemoryIpSetProvider`
//
// ## Usage
//
// ```rust,ignore
// use wafset_core::{IpSetInfo, IpSetProvider, Scope};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* IpSetProvider implementation */;
//     let ip_set = IpSetInfo::new("blocklist", "abc-123", Scope::Regional);
//
//     let snapshot = provider.get_ip_set(&ip_set).await?;
//     let mut addresses = snapshot.addresses.clone();
//     addresses.push("203.0.113.0/24".to_string());
//
//     provider
//         .update_ip_set(&ip_set, &addresses, &snapshot.lock_token)
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::IpSetInfo;

/// Opaque version token returned by a read and required by the next write
///
/// The remote service rejects a write whose token no longer matches the
/// stored version of the IP set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockToken(String);

impl LockToken {
    /// Wrap a token received from the remote service
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token value as sent back on write
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of an IP set as observed by one read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSetSnapshot {
    /// Current address list, in the order the service returned it
    pub addresses: Vec<String>,
    /// Token authorizing a write based on this view
    pub lock_token: LockToken,
}

/// Trait for IP set provider implementations
///
/// # Trust Level: Untrusted
///
/// Providers are single-shot: each method performs exactly one API call.
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off on failure (a conflict is reported, not resolved)
/// - ❌ Re-read the IP set inside `update_ip_set` to refresh the token
/// - ❌ Cache snapshots between calls
/// - ❌ Decide whether a write is needed (owned by `IpSetSync`)
///
/// ❌ **WRONG**: Refreshing the token before writing
/// ```rust,ignore
/// async fn update_ip_set(
///     &self,
///     ip_set: &IpSetInfo,
///     addresses: &[String],
///     _token: &LockToken,
/// ) -> Result<()> {
///     let fresh = self.get_ip_set(ip_set).await?; // silently overwrites concurrent changes
///     self.put(ip_set, addresses, &fresh.lock_token).await
/// }
/// ```
#[async_trait]
pub trait IpSetProvider: Send + Sync {
    /// Read the current address list and its lock token
    ///
    /// # Returns
    ///
    /// - `Ok(IpSetSnapshot)`: The addresses and the token for the next write
    /// - `Err(Error::NotFound)`: The IP set does not exist
    /// - `Err(Error)`: Credentials, network or service failure
    async fn get_ip_set(&self, ip_set: &IpSetInfo) -> Result<IpSetSnapshot, crate::Error>;

    /// Replace the address list, conditioned on `lock_token`
    ///
    /// # Parameters
    ///
    /// - `ip_set`: The IP set to write
    /// - `addresses`: The complete new address list (may be empty)
    /// - `lock_token`: Token from the read the list was computed from
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The write was accepted
    /// - `Err(Error::Conflict)`: The IP set changed since `lock_token` was issued
    /// - `Err(Error)`: Any other failure
    async fn update_ip_set(
        &self,
        ip_set: &IpSetInfo,
        addresses: &[String],
        lock_token: &LockToken,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
