//! Future type aliases shared across the workspace.

use std::future::Future;
use std::pin::Pin;

/// A boxed future for async trait methods.
///
/// Async functions in traits are not object-safe, so traits that need
/// dynamic dispatch (capability providers, calendar repositories) return
/// pinned boxed futures instead.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
