// # wafset-core
//
// Core library for managing the address list of a WAF IP set.
//
// ## Architecture Overview
//
// - **cidr**: Validation of candidate CIDR strings
// - **input**: Loading the desired delta from inline data or a file
// - **reconcile**: Pure add/remove/clear over an address list
// - **IpSetProvider**: Trait for reading and writing an IP set remotely
// - **IpSetSync**: Single read-modify-write cycle guarded by the lock token
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation is pure, remote access is behind a trait
// 2. **Optimistic Concurrency**: Every write carries the token of the read it was computed from
// 3. **Single-shot**: One read and at most one write per invocation, never retried
// 4. **Library-First**: The CLI is a thin layer over this crate

pub mod cidr;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod provider;
pub mod reconcile;
pub mod traits;

// Re-export core types for convenience
pub use config::{Action, ExecuteConfig, IpSetInfo, Scope};
pub use engine::{IpSetSync, Operation, SyncOutcome};
pub use error::{Error, Result};
pub use provider::MemoryIpSetProvider;
pub use traits::{IpSetProvider, IpSetSnapshot, LockToken};
