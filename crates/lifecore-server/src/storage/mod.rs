//! Storage layer
//!
//! Received payloads go to one file per message under the storage
//! directory. The in-memory store keeps them in a DashMap instead, for
//! throwaway deployments and tests.

pub mod files;
pub mod memory;

pub use files::FileStore;
pub use memory::MemoryStore;
