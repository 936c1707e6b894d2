//! Calendar intelligence: timeframe classification, repositories, analysis.
//!
//! This crate turns natural-language calendar questions into structured
//! answers, independent of which calendar backend is behind them:
//!
//! - [`classify`] - pure timeframe classification (query text → [`Intent`])
//! - [`CalendarRepository`] - the backend abstraction, with [`IcsRepository`]
//!   as the HTTP/JSON implementation
//! - [`EventFormatter`] - renders event lists as readable text
//! - [`CalendarAnalyzer`] - composes the three into one request/response
//!   cycle
//!
//! # Architecture
//!
//! ```text
//! "What's on my calendar today?"
//!          │
//!          ▼ classify()
//!      ┌────────┐      ┌────────────────────┐
//!      │ Intent │ ───► │ CalendarRepository │ (ICS, Google, ...)
//!      └────────┘      └─────────┬──────────┘
//!                                │ Vec<Event>
//!                                ▼
//!                       ┌────────────────┐
//!                       │ EventFormatter │
//!                       └───────┬────────┘
//!                               ▼
//!                        AnalysisResult
//! ```
//!
//! The analyzer is usable directly by non-chat callers (voice, CLI,
//! dashboards); the chat tool layer wraps it behind the capability
//! provider contract.

pub mod analyzer;
pub mod error;
pub mod formatter;
pub mod ics;
pub mod intent;
pub mod repository;

pub use analyzer::{AnalysisMetadata, AnalysisResult, CalendarAnalyzer};
pub use error::CalendarError;
pub use formatter::EventFormatter;
pub use ics::IcsRepository;
pub use intent::{Intent, IntentKind, classify, is_calendar_query};
pub use repository::{CalendarHealth, CalendarRepository};
