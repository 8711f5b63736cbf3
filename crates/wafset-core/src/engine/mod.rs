//! IP set synchronization
//!
//! The IpSetSync is responsible for:
//! - Skipping the remote round trip when the delta is empty
//! - Reading the current address list and its lock token
//! - Reconciling the list against the requested operation
//! - Writing the new list back, conditioned on the token from the read
//!
//! ## Flow
//!
//! ```text
//!   Operation ──► empty delta? ──yes──► NothingToApply
//!                      │ no
//!                      ▼
//!               get_ip_set()  ──► (addresses, lock_token)
//!                      │
//!                      ▼
//!               reconcile ──► same list? ──yes──► Unchanged
//!                      │ no
//!                      ▼
//!               dry run? ──yes──► DryRun
//!                      │ no
//!                      ▼
//!               update_ip_set(new list, lock_token) ──► Updated
//! ```
//!
//! A write rejected because the token went stale surfaces as
//! `Error::Conflict`. Nothing is retried, and failures are returned to the
//! caller without being logged here.

use serde_json::json;
use tracing::{debug, info};

use crate::config::{Action, IpSetInfo};
use crate::error::Result;
use crate::reconcile;
use crate::traits::IpSetProvider;

/// A requested change to an IP set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Add the given CIDRs
    Add(Vec<String>),
    /// Remove the given CIDRs
    Remove(Vec<String>),
    /// Remove everything
    Clear,
}

impl Operation {
    /// Build the operation for an action and its (already validated) delta
    ///
    /// The delta is ignored for [`Action::Clear`].
    pub fn new(action: Action, addresses: Vec<String>) -> Self {
        match action {
            Action::AddIp => Operation::Add(addresses),
            Action::RemoveIp => Operation::Remove(addresses),
            Action::Clear => Operation::Clear,
        }
    }

    /// The action this operation implements
    pub fn action(&self) -> Action {
        match self {
            Operation::Add(_) => Action::AddIp,
            Operation::Remove(_) => Action::RemoveIp,
            Operation::Clear => Action::Clear,
        }
    }

    fn is_noop(&self) -> bool {
        match self {
            Operation::Add(addresses) | Operation::Remove(addresses) => addresses.is_empty(),
            Operation::Clear => false,
        }
    }

    fn apply(&self, current: &[String]) -> Vec<String> {
        match self {
            Operation::Add(addresses) => reconcile::add(current, addresses),
            Operation::Remove(addresses) => reconcile::remove(current, addresses),
            Operation::Clear => reconcile::clear(),
        }
    }
}

/// Result of one synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The delta was empty; the IP set was not contacted
    NothingToApply,

    /// The reconciled list equals the current one; no write was sent
    Unchanged {
        /// The current addresses
        addresses: Vec<String>,
    },

    /// The new list was written
    Updated {
        /// Addresses before the write
        previous: Vec<String>,
        /// Addresses after the write
        current: Vec<String>,
    },

    /// Dry-run: the write that would have been sent
    DryRun {
        /// Addresses as read
        previous: Vec<String>,
        /// Addresses that would have been written
        proposed: Vec<String>,
    },
}

impl SyncOutcome {
    /// Whether a write reached the provider
    pub fn wrote(&self) -> bool {
        matches!(self, SyncOutcome::Updated { .. })
    }
}

/// Single read-modify-write cycle against one IP set
///
/// ## Lifecycle
///
/// 1. Create with [`IpSetSync::new()`]
/// 2. Call [`IpSetSync::execute()`] (or `add` / `remove` / `clear`)
/// 3. Drop; nothing is cached between calls
pub struct IpSetSync {
    /// Provider for remote access
    provider: Box<dyn IpSetProvider>,

    /// IP set being managed
    ip_set: IpSetInfo,

    /// Skip the write, log it instead
    dry_run: bool,
}

impl IpSetSync {
    /// Create a new synchronizer for `ip_set`
    pub fn new(provider: Box<dyn IpSetProvider>, ip_set: IpSetInfo) -> Self {
        Self {
            provider,
            ip_set,
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The IP set this synchronizer targets
    pub fn ip_set(&self) -> &IpSetInfo {
        &self.ip_set
    }

    /// Add CIDRs to the IP set
    pub async fn add(&self, addresses: Vec<String>) -> Result<SyncOutcome> {
        self.execute(&Operation::Add(addresses)).await
    }

    /// Remove CIDRs from the IP set
    pub async fn remove(&self, addresses: Vec<String>) -> Result<SyncOutcome> {
        self.execute(&Operation::Remove(addresses)).await
    }

    /// Remove every entry from the IP set
    pub async fn clear(&self) -> Result<SyncOutcome> {
        self.execute(&Operation::Clear).await
    }

    /// Run one read-modify-write cycle
    ///
    /// # Returns
    ///
    /// - `Ok(SyncOutcome)`: What happened
    /// - `Err(Error::Conflict)`: The IP set changed between read and write
    /// - `Err(Error)`: The read or the write failed
    pub async fn execute(&self, operation: &Operation) -> Result<SyncOutcome> {
        if operation.is_noop() {
            match operation.action() {
                Action::RemoveIp => info!("no IP ranges to remove from IP set"),
                _ => info!("no IP range to add in the IP Set"),
            }
            return Ok(SyncOutcome::NothingToApply);
        }

        debug!(
            "Reading IP set {} via {}",
            self.ip_set,
            self.provider.provider_name()
        );

        let snapshot = self.provider.get_ip_set(&self.ip_set).await?;

        let previous = snapshot.addresses;
        let proposed = operation.apply(&previous);

        if reconcile::same_list(&previous, &proposed) {
            info!(
                "IP set {} already up to date ({} entries), skipping update",
                self.ip_set,
                previous.len()
            );
            return Ok(SyncOutcome::Unchanged {
                addresses: previous,
            });
        }

        if self.dry_run {
            info!(
                "[DRY-RUN] Would send update for IP set {} with payload: {}",
                self.ip_set,
                json!({
                    "Addresses": proposed,
                    "LockToken": snapshot.lock_token.as_str(),
                })
            );
            return Ok(SyncOutcome::DryRun { previous, proposed });
        }

        self.provider
            .update_ip_set(&self.ip_set, &proposed, &snapshot.lock_token)
            .await?;

        self.log_success(operation, &previous, &proposed);

        Ok(SyncOutcome::Updated {
            previous,
            current: proposed,
        })
    }

    fn log_success(&self, operation: &Operation, previous: &[String], current: &[String]) {
        match operation {
            Operation::Add(requested) => info!(
                "successfully added new IP ranges ({} of {} requested) in IP Set {}",
                current.len().saturating_sub(previous.len()),
                requested.len(),
                self.ip_set
            ),
            Operation::Remove(requested) => info!(
                "successfully removed IP ranges ({} of {} requested) from IP Set {}",
                previous.len().saturating_sub(current.len()),
                requested.len(),
                self.ip_set
            ),
            Operation::Clear => info!(
                "cleared IP Set {} ({} entries removed)",
                self.ip_set,
                previous.len()
            ),
        }
    }
}
