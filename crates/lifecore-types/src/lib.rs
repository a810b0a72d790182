//! LifeCore Types - Pure wire types for the relay
//!
//! Request and response bodies exchanged between clients and the relay,
//! plus the records the relay persists. No crypto and no runtime
//! dependencies, so clients of any kind can share them.

pub mod message;
pub mod record;

pub use message::*;
pub use record::*;
