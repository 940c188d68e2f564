//! # Infrastructure Layer
//!
//! Adapters for the remote ledger.
//!
//! - [`ledger`]: gateway port, error taxonomy, HTTP plumbing, in-memory double
//! - [`ripple`]: Ripple REST gateway

pub mod ledger;
pub mod ripple;
