//! # Deal-Escrow Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Full-lifecycle flows over the in-memory chain
//!     └── flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p escrow-tests
//!
//! # By category
//! cargo test -p escrow-tests integration::
//! ```
