//! # pubsub-bridge
//!
//! Publishes single messages to a GCP Pub/Sub topic on behalf of a host
//! process that links this library through its C ABI.
//!
//! Configuration comes from the environment, optionally seeded from a `.env`
//! file. Each publish opens its own gRPC connection, runs under a 30 second
//! deadline by default and reports a plain `0`/`1` status across the
//! boundary, while native callers get the typed [`Result`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod ffi;
pub mod pubsub;

pub use error::{Error, Result};
