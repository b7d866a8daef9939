//! Engine types
//!
//! Handles and statistics of a running scroll operation.

use crate::error::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::warn;

/// Statistics from a scroll operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollStats {
    /// Pages fetched and decoded successfully
    pub pages_fetched: usize,
    /// Items delivered to the consumer
    pub items_emitted: usize,
    /// Errors reported
    pub errors: usize,
    /// Whether the operation stopped on cancellation or a vanished consumer
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ScrollStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add an item
    pub fn add_item(&mut self) {
        self.items_emitted += 1;
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Control over the background task of a scroll operation
///
/// Dropping the handle does not stop the scroll.
#[derive(Debug)]
pub struct ScrollHandle {
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<ScrollStats>>,
}

impl ScrollHandle {
    pub(crate) fn new(cancel: watch::Sender<bool>, task: JoinHandle<ScrollStats>) -> Self {
        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Handle of a scroll that never started
    pub(crate) fn finished() -> Self {
        let (cancel, _) = watch::channel(false);
        Self { cancel, task: None }
    }

    /// Ask the scroll to stop at its next suspension point
    ///
    /// Both channels are closed once the task observes the request.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Check if the background task has ended
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the background task and return its statistics
    pub async fn join(self) -> ScrollStats {
        let Some(task) = self.task else {
            return ScrollStats::default();
        };

        match task.await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Scroll task did not complete: {e}");
                ScrollStats::default()
            }
        }
    }
}

/// A running scroll operation delivering items and errors on two channels
///
/// Both channels close when the operation ends, whatever the reason.
#[derive(Debug)]
pub struct Scroll<E> {
    /// Items in source order
    pub items: mpsc::Receiver<E>,
    /// Errors in the order they occurred
    pub errors: mpsc::Receiver<Error>,
    /// Control over the background task
    pub handle: ScrollHandle,
}

impl<E> Scroll<E> {
    /// Split into the item receiver, the error receiver and the handle
    pub fn into_parts(self) -> (mpsc::Receiver<E>, mpsc::Receiver<Error>, ScrollHandle) {
        (self.items, self.errors, self.handle)
    }

    /// Drain both channels until they are closed
    ///
    /// Never returns while a page keeps failing under an unbounded retry
    /// policy; cancel through another path in that case.
    pub async fn collect(mut self) -> (Vec<E>, Vec<Error>) {
        let mut items = Vec::new();
        let mut errors = Vec::new();
        let mut items_open = true;
        let mut errors_open = true;

        while items_open || errors_open {
            tokio::select! {
                item = self.items.recv(), if items_open => match item {
                    Some(item) => items.push(item),
                    None => items_open = false,
                },
                err = self.errors.recv(), if errors_open => match err {
                    Some(err) => errors.push(err),
                    None => errors_open = false,
                },
            }
        }

        (items, errors)
    }
}
