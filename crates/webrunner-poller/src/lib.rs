//! Background poll loop: fetch pending tests from the backend, run them,
//! report results.

pub mod poller;

pub use poller::{Poller, PollerConfig};
