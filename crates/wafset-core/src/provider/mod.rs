//! IP set provider implementations bundled with the core
//!
//! - [`MemoryIpSetProvider`]: In-memory IP sets with version-based lock tokens

pub mod memory;

pub use memory::MemoryIpSetProvider;
