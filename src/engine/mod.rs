//! Scroll engine module
//!
//! Runs the fetch → decode → emit loop over all pages of a collection in a
//! background task.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ScrollEngine` - Spawns scroll operations over a page source
//! - `Scroll` - Item and error channels of one running operation
//! - `ScrollHandle` - Cancellation and statistics of the background task
//!
//! Pages are fetched strictly one at a time. Items are sent one by one, so a
//! slow consumer throttles fetching: page N+1 is requested only after every
//! item of page N was accepted. Errors are reported on their own channel;
//! only fatal ones end the operation, the others lead to a retry of the same
//! page under the configured [`RetryPolicy`](crate::config::RetryPolicy).

mod sink;
mod types;

pub use types::{Scroll, ScrollHandle, ScrollStats};

use crate::config::ScrollConfig;
use crate::decode::{decode, Entity, Page};
use crate::error::{Error, Result};
use crate::http::{HttpPageFetcher, PageSource};
use crate::pagination::{NextPage, PageIndex};
use futures::stream::{self, BoxStream, StreamExt};
use sink::{DualChannelSink, ResultSink, ScrollSink};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Scroll engine over a page source
///
/// The engine is cheap to clone and may run any number of independent scroll
/// operations; they share only the read-only configuration and the source.
/// Scrolls are spawned on the current tokio runtime.
pub struct ScrollEngine<S> {
    config: Arc<ScrollConfig>,
    source: Arc<S>,
}

impl<S> Clone for ScrollEngine<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            source: Arc::clone(&self.source),
        }
    }
}

impl ScrollEngine<HttpPageFetcher> {
    /// Create an engine fetching pages over HTTP
    pub fn new(config: Arc<ScrollConfig>) -> Result<Self> {
        let source = HttpPageFetcher::new(Arc::clone(&config))?;
        Ok(Self::with_source(config, source))
    }
}

impl<S: PageSource + 'static> ScrollEngine<S> {
    /// Create an engine over a custom page source
    pub fn with_source(config: Arc<ScrollConfig>, source: S) -> Self {
        Self {
            config,
            source: Arc::new(source),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Start scrolling over all pages of `E`, delivering items and errors on
    /// separate channels
    pub fn scroll<E: Entity>(&self) -> Scroll<E> {
        let capacity = self.config.channel_capacity.max(1);
        let (items_tx, items) = mpsc::channel(capacity);
        let (errors_tx, errors) = mpsc::channel(capacity);

        let sink = DualChannelSink {
            items: items_tx,
            errors: errors_tx,
        };
        let handle = self.spawn::<E, _>(sink);

        Scroll {
            items,
            errors,
            handle,
        }
    }

    /// Start scrolling over all pages of `E`, delivering items and errors
    /// interleaved in one ordered stream
    pub fn scroll_results<E: Entity>(&self) -> (BoxStream<'static, Result<E>>, ScrollHandle) {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let handle = self.spawn::<E, _>(ResultSink { tx });
        (receiver_stream(rx), handle)
    }

    fn spawn<E, K>(&self, sink: K) -> ScrollHandle
    where
        E: Entity,
        K: ScrollSink<E> + 'static,
    {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let config = Arc::clone(&self.config);
        let source = Arc::clone(&self.source);

        let task = tokio::spawn(async move { run::<E, _, _>(&config, &*source, sink, cancel_rx).await });

        ScrollHandle::new(cancel_tx, task)
    }
}

/// Scroll over all pages of `E` using HTTP
///
/// If the HTTP client cannot be created, the error is delivered on the error
/// channel and both channels are already closed.
pub fn scroll<E: Entity>(config: Arc<ScrollConfig>) -> Scroll<E> {
    match ScrollEngine::new(config) {
        Ok(engine) => engine.scroll(),
        Err(err) => {
            let (_, items) = mpsc::channel(1);
            let (errors_tx, errors) = mpsc::channel(1);
            let _ = errors_tx.try_send(err);
            Scroll {
                items,
                errors,
                handle: ScrollHandle::finished(),
            }
        }
    }
}

/// Scroll over all pages of `E` using HTTP, as one stream of results
pub fn scroll_results<E: Entity>(
    config: Arc<ScrollConfig>,
) -> (BoxStream<'static, Result<E>>, ScrollHandle) {
    match ScrollEngine::new(config) {
        Ok(engine) => engine.scroll_results(),
        Err(err) => (stream::once(async move { Err(err) }).boxed(), ScrollHandle::finished()),
    }
}

fn receiver_stream<T: Send + 'static>(rx: mpsc::Receiver<T>) -> BoxStream<'static, T> {
    stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) }).boxed()
}

/// Resolves once cancellation was requested
///
/// A dropped handle never cancels.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let handle_dropped = cancel.wait_for(|requested| *requested).await.is_err();
    if handle_dropped {
        std::future::pending::<()>().await;
    }
}

async fn fetch_page<E: Entity, S: PageSource + ?Sized>(source: &S, page: PageIndex) -> Result<Page<E>> {
    let raw = source.fetch(E::KIND, page).await?;
    decode::<E>(raw).await
}

/// The scroll loop
///
/// Every exit path returns, which drops the sink and closes its channels.
async fn run<E, S, K>(
    config: &ScrollConfig,
    source: &S,
    sink: K,
    mut cancel: watch::Receiver<bool>,
) -> ScrollStats
where
    E: Entity,
    S: PageSource + ?Sized,
    K: ScrollSink<E>,
{
    let start = Instant::now();
    let kind = E::KIND;
    let mut stats = ScrollStats::new();
    let mut page = PageIndex::FIRST;
    let mut failures: u32 = 0;

    debug!("Starting scroll over {kind}");

    'pages: loop {
        let fetched = tokio::select! {
            biased;
            () = cancelled(&mut cancel) => {
                stats.cancelled = true;
                break 'pages;
            }
            result = fetch_page::<E, S>(source, page) => result,
        };

        match fetched {
            Ok(fetched) => {
                failures = 0;
                stats.add_page();
                let next = fetched.next_page();
                debug!(
                    "Page {page} of {kind}: {} items (offset {}, limit {}, total {})",
                    fetched.len(),
                    fetched.pagination.offset,
                    fetched.pagination.limit,
                    fetched.pagination.total
                );

                // the page index only ever moves forward
                if let NextPage::Page(next) = next {
                    if next <= page {
                        let stalled = Error::PaginationStalled {
                            page: page.get(),
                            next: next.get(),
                        };
                        error!("Giving up on {kind}: {stalled}");
                        stats.add_error();
                        if !report::<E, K>(&sink, &mut cancel, stalled).await {
                            stats.cancelled = true;
                        }
                        break 'pages;
                    }
                }

                for item in fetched.items {
                    let delivered = tokio::select! {
                        biased;
                        () = cancelled(&mut cancel) => false,
                        delivered = sink.item(item) => delivered,
                    };
                    if !delivered {
                        stats.cancelled = true;
                        break 'pages;
                    }
                    stats.add_item();
                }

                match next {
                    NextPage::Page(next) => page = next,
                    NextPage::Done => break 'pages,
                }
            }
            Err(err) => {
                stats.add_error();
                failures = failures.saturating_add(1);
                let fatal = err.is_fatal();

                if fatal {
                    error!("Fatal error while scrolling {kind}, page {page}: {err}");
                } else {
                    warn!("Error while scrolling {kind}, page {page} (failure {failures}): {err}");
                }

                if !report::<E, K>(&sink, &mut cancel, err).await {
                    stats.cancelled = true;
                    break 'pages;
                }
                if fatal {
                    break 'pages;
                }

                if !config.retry.allows_retry(failures) {
                    let exhausted = Error::RetriesExhausted {
                        page: page.get(),
                        attempts: failures,
                    };
                    error!("Giving up on {kind}: {exhausted}");
                    stats.add_error();
                    if !report::<E, K>(&sink, &mut cancel, exhausted).await {
                        stats.cancelled = true;
                    }
                    break 'pages;
                }

                let delay = config.retry.delay(failures - 1);
                if !delay.is_zero() {
                    debug!("Retrying page {page} of {kind} in {delay:?}");
                    tokio::select! {
                        biased;
                        () = cancelled(&mut cancel) => {
                            stats.cancelled = true;
                            break 'pages;
                        }
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    stats.set_duration(start.elapsed().as_millis() as u64);
    info!(
        "Finished scroll over {kind}: {} items in {} pages, {} errors{}",
        stats.items_emitted,
        stats.pages_fetched,
        stats.errors,
        if stats.cancelled { " (cancelled)" } else { "" }
    );
    stats
}

async fn report<E, K: ScrollSink<E>>(sink: &K, cancel: &mut watch::Receiver<bool>, err: Error) -> bool {
    tokio::select! {
        biased;
        () = cancelled(cancel) => false,
        delivered = sink.error(err) => delivered,
    }
}
