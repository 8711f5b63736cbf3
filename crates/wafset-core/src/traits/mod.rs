//! Core traits for wafset
//!
//! - [`IpSetProvider`]: Read and conditionally write a remote IP set

pub mod ip_set_provider;

pub use ip_set_provider::{IpSetProvider, IpSetSnapshot, LockToken};
