//! # MetaRP Core
//!
//! Port/adapter interfaces for the proxy client - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - The per-resource store capability shared by the network-backed and
//!   cache-backed backends
//! - The string cache boundary used by the test backend
//! - The telemetry sink boundary
//!
//! ## Architecture Principles
//! - Only depends on `metarp-domain`
//! - No HTTP, cache or logging-framework code
//! - All external dependencies via traits

pub mod cache_ports;
pub mod resource_ports;
pub mod telemetry;

// Re-export specific items to avoid ambiguity
pub use cache_ports::StringCache;
pub use resource_ports::EdgeDeviceStore;
pub use telemetry::{NoopTelemetry, TelemetryLevel, TelemetrySink};
