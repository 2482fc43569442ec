//! Cross-module integration tests.

mod lifecycle_flows;
