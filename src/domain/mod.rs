//! # Domain Layer
//!
//! Ledger records, value objects and the scan lifecycle, free of transport
//! concerns.

pub mod entities;
pub mod value_objects;
