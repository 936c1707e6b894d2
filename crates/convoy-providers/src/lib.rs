//! CapabilityProvider trait and implementations.
//!
//! This crate provides the abstraction layer for external data sources:
//!
//! - [`CapabilityProvider`] - the contract every provider implements
//! - [`ProviderResult`] - the uniform success/failure envelope
//! - [`ProviderError`] - the internal failure taxonomy
//! - Concrete providers: [`WeatherProvider`], [`QuotesProvider`],
//!   [`CalendarProvider`], and the generic [`RestProvider`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  ┌────────────┐  ┌──────────────┐  ┌─────────────┐
//! │ Weather API │  │ Quotes API │  │ Calendar API │  │ Any REST API│
//! └──────┬──────┘  └─────┬──────┘  └──────┬───────┘  └──────┬──────┘
//!        │               │                │                 │
//!        ▼               ▼                ▼                 ▼
//! ┌─────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐
//! │ Weather     │ │ Quotes       │ │ Calendar     │ │ Rest         │
//! │ Provider    │ │ Provider     │ │ Provider     │ │ Provider     │
//! └──────┬──────┘ └──────┬───────┘ └──────┬───────┘ └──────┬───────┘
//!        │               │                │                │
//!        └───────────────┴───── CapabilityProvider ────────┘
//!                                    │
//!                                    ▼
//!                             ProviderResult
//! ```
//!
//! Every provider maps its backend's failures (connection, status,
//! timeout, malformed payload) into failed results with distinct
//! messages; nothing escapes `execute` as an error.

pub mod calendar;
pub mod error;
pub mod provider;
pub mod quotes;
pub mod rest;
pub mod result;
pub mod weather;

pub use calendar::CalendarProvider;
pub use convoy_core::BoxFuture;
pub use error::{ProviderError, ProviderErrorCode};
pub use provider::{CapabilityProvider, DEFAULT_TIMEOUT, HEALTH_CHECK_TIMEOUT, matched_keyword};
pub use quotes::QuotesProvider;
pub use rest::{RestProvider, RestProviderSpec};
pub use result::{ProviderResult, ResultMetadata};
pub use weather::WeatherProvider;
