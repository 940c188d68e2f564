//! # Ripple REST
//!
//! Gateway for Ripple REST servers: notification feed listing and order
//! transaction lookup.

pub mod client;
pub mod dto;

pub use client::RippleRestClient;
