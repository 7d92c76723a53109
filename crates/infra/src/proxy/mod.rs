//! Network-backed access to the meta RP proxy.

pub mod client;
pub mod dispatcher;
pub mod pagination;

pub use client::MetaRpProxyClient;
pub use dispatcher::{DispatchOutcome, DispatchRequest, ProxyAuthenticator, ProxyDispatcher};
pub use pagination::{decode_collection_tolerant, PageTraversal};
