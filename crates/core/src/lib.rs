//! scout-core
//!
//! Core library for inspecting on-chain program builds.
//!
//! This crate holds the two reusable pieces of the scanner: a structural
//! function extractor over Rust source, and a decoder for the fixed-layout
//! build-provenance records stored on chain. Around them sit the data model,
//! the classification boundary, the scan orchestration, and persistence.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends.

pub mod model;
pub mod extract;
pub mod decoder;
pub mod services;
pub mod db;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
