//! Common test infrastructure
//!
//! This module provides the infrastructure for end-to-end tests. Each test
//! gets an isolated server with its own audit database and the built-in
//! reference catalog; upstream providers are left unconfigured so every
//! request falls back to baseline data.

#![allow(dead_code)]

mod client;
mod constants;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use server::TestServer;
