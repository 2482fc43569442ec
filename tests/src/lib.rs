//! # Alder Test Suite
//!
//! Unified test crate for cross-module scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Whole-subsystem lifecycle flows
//!     └── lifecycle_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p alder-tests
//!
//! # By category
//! cargo test -p alder-tests integration::
//! ```

#[cfg(test)]
mod integration;
