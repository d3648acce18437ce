//! # Adapters
//!
//! Host-environment implementations backing the ports.

pub mod in_memory_chain;

pub use in_memory_chain::{ChainError, InMemoryChain};
