//! The external todo data source.
//!
//! The application fetches its list from a collaborator abstracted behind
//! [`TodoSource`], injected through the environment. The shipped
//! implementation, [`FakeApi`], is a hard-coded stand-in that resolves
//! after a fixed delay - there is no real network layer.

use crate::types::{Todo, TodoId};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Errors a todo source can produce.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source could not be reached or did not answer
    #[error("todo source unavailable: {0}")]
    Unavailable(String),
}

/// A remote source of todos.
///
/// Dyn-compatible: the fetch returns an explicit boxed future instead of
/// using `async fn` in the trait.
pub trait TodoSource: Send + Sync {
    /// Fetch the complete todo list.
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Todo>, SourceError>> + Send + '_>>;
}

/// Hard-coded fake API: resolves with one well-known todo after a fixed
/// delay.
#[derive(Clone, Debug)]
pub struct FakeApi {
    delay: Duration,
}

impl FakeApi {
    /// Creates the fake API with its canonical two-second latency.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_delay(Duration::from_secs(2))
    }

    /// Creates the fake API with a custom latency.
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoSource for FakeApi {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Todo>, SourceError>> + Send + '_>> {
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(vec![Todo::new(TodoId::new(0), "Buy Milk".to_string())])
        })
    }
}
