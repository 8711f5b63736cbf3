//! Test doubles and common utilities for contract tests
//!
//! These doubles wrap the in-memory provider to reproduce remote behaviors
//! the engine must cope with: concurrent writers and failing reads.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use wafset_core::error::{Error, Result};
use wafset_core::{
    IpSetInfo, IpSetProvider, IpSetSnapshot, LockToken, MemoryIpSetProvider, Scope,
};

/// The IP set used across contract tests
pub fn test_ip_set() -> IpSetInfo {
    IpSetInfo::new("blocklist", "abc-123", Scope::Cloudfront)
}

/// Build an owned address list
pub fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Memory provider seeded with one IP set
pub async fn seeded_provider(addresses: &[&str]) -> MemoryIpSetProvider {
    let provider = MemoryIpSetProvider::new();
    provider.insert(&test_ip_set(), list(addresses)).await;
    provider
}

/// A provider recording the tokens it hands out and receives
///
/// With a concurrent write configured, another writer modifies the IP set
/// right after every read. This reproduces two invocations racing on the
/// same IP set: whatever token the engine received is stale by the time it
/// writes.
pub struct InterleavingProvider {
    inner: MemoryIpSetProvider,
    concurrent_write: Option<Vec<String>>,
    read_tokens: Arc<Mutex<Vec<LockToken>>>,
    write_tokens: Arc<Mutex<Vec<LockToken>>>,
}

impl InterleavingProvider {
    /// Race every read with a write of `concurrent_write`
    pub fn new(inner: MemoryIpSetProvider, concurrent_write: Vec<String>) -> Self {
        Self {
            concurrent_write: Some(concurrent_write),
            ..Self::passthrough(inner)
        }
    }

    /// Delegate to `inner` without interfering
    pub fn passthrough(inner: MemoryIpSetProvider) -> Self {
        Self {
            inner,
            concurrent_write: None,
            read_tokens: Arc::new(Mutex::new(Vec::new())),
            write_tokens: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Tokens returned by get_ip_set(), in call order
    pub fn read_tokens(&self) -> Arc<Mutex<Vec<LockToken>>> {
        Arc::clone(&self.read_tokens)
    }

    /// Tokens passed to update_ip_set(), in call order
    pub fn write_tokens(&self) -> Arc<Mutex<Vec<LockToken>>> {
        Arc::clone(&self.write_tokens)
    }
}

#[async_trait::async_trait]
impl IpSetProvider for InterleavingProvider {
    async fn get_ip_set(&self, ip_set: &IpSetInfo) -> Result<IpSetSnapshot> {
        let snapshot = self.inner.get_ip_set(ip_set).await?;
        self.read_tokens
            .lock()
            .unwrap()
            .push(snapshot.lock_token.clone());

        if let Some(addresses) = &self.concurrent_write {
            self.inner.insert(ip_set, addresses.clone()).await;
        }
        Ok(snapshot)
    }

    async fn update_ip_set(
        &self,
        ip_set: &IpSetInfo,
        addresses: &[String],
        lock_token: &LockToken,
    ) -> Result<()> {
        self.write_tokens.lock().unwrap().push(lock_token.clone());
        self.inner.update_ip_set(ip_set, addresses, lock_token).await
    }

    fn provider_name(&self) -> &'static str {
        "interleaving"
    }
}

/// A provider whose reads always fail
pub struct FailingReadProvider {
    make_error: fn() -> Error,
    update_call_count: Arc<AtomicUsize>,
}

impl FailingReadProvider {
    pub fn new(make_error: fn() -> Error) -> Self {
        Self {
            make_error,
            update_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle on the number of update_ip_set() calls
    pub fn update_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.update_call_count)
    }
}

#[async_trait::async_trait]
impl IpSetProvider for FailingReadProvider {
    async fn get_ip_set(&self, _ip_set: &IpSetInfo) -> Result<IpSetSnapshot> {
        Err((self.make_error)())
    }

    async fn update_ip_set(
        &self,
        _ip_set: &IpSetInfo,
        _addresses: &[String],
        _lock_token: &LockToken,
    ) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "failing-read"
    }
}
