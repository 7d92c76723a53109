//! # MetaRP Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The authenticating dispatcher and pagination traverser
//! - The network-backed proxy resource client
//! - The cache-backed edge device store used to test callers offline
//! - Configuration loading and the tracing-backed telemetry sink
//!
//! ## Architecture
//! - Implements traits defined in `metarp-core`
//! - Depends on `metarp-domain` and `metarp-core`
//! - Contains all "impure" code (HTTP, caches)

pub mod cache;
pub mod config;
pub mod mock;
pub mod observability;
pub mod proxy;
pub mod translate;

// Re-export commonly used items
pub use cache::InMemoryCache;
pub use mock::CachedEdgeDeviceStore;
pub use observability::TracingTelemetry;
pub use proxy::{
    DispatchOutcome, DispatchRequest, MetaRpProxyClient, PageTraversal, ProxyAuthenticator,
    ProxyDispatcher,
};
