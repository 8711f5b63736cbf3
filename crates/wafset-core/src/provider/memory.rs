// # Memory IP Set Provider
//
// In-memory implementation of IpSetProvider.
//
// ## Purpose
//
// Behaves like the remote service for the parts the engine depends on:
// every successful write bumps a version, the version is handed out as the
// lock token, and a write carrying an older token is rejected.
//
// ## When to Use
//
// - Testing the engine without network access
// - Embedding wafset in a program that keeps IP sets locally

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::config::IpSetInfo;
use crate::traits::ip_set_provider::{IpSetProvider, IpSetSnapshot, LockToken};
use crate::Error;

#[derive(Debug, Clone)]
struct StoredIpSet {
    addresses: Vec<String>,
    version: u64,
}

impl StoredIpSet {
    fn token(&self) -> LockToken {
        LockToken::new(format!("mem-{}", self.version))
    }
}

/// In-memory IP set provider
///
/// Clones share the same storage and call counters.
///
/// # Example
///
/// ```rust,no_run
/// use wafset_core::{IpSetInfo, IpSetProvider, MemoryIpSetProvider, Scope};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = MemoryIpSetProvider::new();
///     let ip_set = IpSetInfo::new("blocklist", "abc-123", Scope::Regional);
///     provider.insert(&ip_set, vec!["1.2.3.0/24".to_string()]).await;
///
///     let snapshot = provider.get_ip_set(&ip_set).await?;
///     assert_eq!(snapshot.addresses, vec!["1.2.3.0/24"]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryIpSetProvider {
    inner: Arc<RwLock<HashMap<IpSetInfo, StoredIpSet>>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl MemoryIpSetProvider {
    /// Create a provider holding no IP sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite an IP set, bumping its version
    pub async fn insert(&self, ip_set: &IpSetInfo, addresses: Vec<String>) {
        let mut sets = self.inner.write().await;
        let version = sets.get(ip_set).map(|s| s.version + 1).unwrap_or(1);
        sets.insert(ip_set.clone(), StoredIpSet { addresses, version });
    }

    /// Current addresses of an IP set, without counting as a read
    pub async fn addresses(&self, ip_set: &IpSetInfo) -> Option<Vec<String>> {
        self.inner
            .read()
            .await
            .get(ip_set)
            .map(|s| s.addresses.clone())
    }

    /// Number of `get_ip_set` calls served
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `update_ip_set` calls received, accepted or not
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpSetProvider for MemoryIpSetProvider {
    async fn get_ip_set(&self, ip_set: &IpSetInfo) -> Result<IpSetSnapshot, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let sets = self.inner.read().await;
        let stored = sets
            .get(ip_set)
            .ok_or_else(|| Error::not_found(ip_set.to_string()))?;

        Ok(IpSetSnapshot {
            addresses: stored.addresses.clone(),
            lock_token: stored.token(),
        })
    }

    async fn update_ip_set(
        &self,
        ip_set: &IpSetInfo,
        addresses: &[String],
        lock_token: &LockToken,
    ) -> Result<(), Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut sets = self.inner.write().await;
        let stored = sets
            .get_mut(ip_set)
            .ok_or_else(|| Error::not_found(ip_set.to_string()))?;

        if stored.token() != *lock_token {
            return Err(Error::conflict(format!(
                "IP set {} was modified (token {} is stale)",
                ip_set, lock_token
            )));
        }

        stored.addresses = addresses.to_vec();
        stored.version += 1;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
