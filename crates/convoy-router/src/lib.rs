//! Capability routing: registry, dispatch, concurrent execution, merge.
//!
//! This crate is the orchestration layer of convoy. A host application
//! builds one [`RouterConfig`] at startup, constructs a
//! [`CapabilityRouter`] from it, and calls [`CapabilityRouter::route`]
//! per user query:
//!
//! ```ignore
//! use convoy_router::{CapabilityRouter, RouterConfig};
//!
//! let router = CapabilityRouter::new(&RouterConfig::from_env());
//! let result = router.route("what's the weather and what's on my calendar").await;
//! // result.context -> merged text for the LLM prompt
//! // result.raw     -> per-provider structured results
//! // result.used    -> providers that answered successfully
//! ```
//!
//! The router is explicitly owned and passed around by the host (no
//! global instance), its registry is immutable after construction, and
//! `route` never fails: provider errors degrade into failure entries in
//! the merged result.

pub mod config;
pub mod router;

pub use config::{DEFAULT_TIMEZONE, ProviderSettings, RouterConfig};
pub use router::{CapabilityRouter, ProviderInfo, RouteResult};
