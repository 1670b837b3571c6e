//! Shared types between backend and frontend.
//!
//! Everything here compiles for both the native server and the wasm client,
//! so it stays free of IO and of server-only crates.

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;
