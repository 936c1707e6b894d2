//! Core types: events, date ranges, text cleanup, tracing

pub mod event;
pub mod future;
pub mod text;
pub mod time;
pub mod tracing;

pub use event::Event;
pub use future::BoxFuture;
pub use text::{clean_description, extract_zoom_link, truncate_with_ellipsis};
pub use time::{DateRange, day_end, day_start};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
