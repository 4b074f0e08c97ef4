//! REST client for the backend job store.
//!
//! The backend owns test definitions and status persistence; this crate
//! only implements the [`webrunner_protocols::TestStore`] seam on top of
//! its HTTP API.

pub mod client;

pub use client::BackendClient;
