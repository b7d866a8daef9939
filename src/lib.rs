// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Redmine Scroll
//!
//! Streams every item of a paginated Redmine collection (projects, issues,
//! time entries) to a consumer, one page at a time.
//!
//! ## Features
//!
//! - **Typed Entities**: `Project`, `Issue` and `TimeEntry` decoded with serde
//! - **Pagination**: next page derived from `offset`/`limit`/`total_count`
//! - **Backpressure**: bounded channels, the next page is fetched only after
//!   the consumer accepted the current one
//! - **Separate Error Channel**: transient failures are reported and retried
//!   under a configurable backoff policy, fatal ones end the scroll
//! - **Cancellation**: through a handle or by dropping the item receiver
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use redmine_scroll::{scroll, Project, ScrollConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScrollConfig::builder("https://redmine.example.com", "0123456789abcdef")
//!         .logging(true)
//!         .build();
//!
//!     let mut scroll = scroll::<Project>(Arc::new(config));
//!     loop {
//!         tokio::select! {
//!             Some(project) = scroll.items.recv() => println!("{project}"),
//!             Some(err) = scroll.errors.recv() => eprintln!("{err}"),
//!             else => break,
//!         }
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Scroll Engine                        │
//! │   fetch page → decode → emit items → next page | done      │
//! └────────────────────────────────────────────────────────────┘
//!         │                  │                    │
//! ┌───────┴──────┬───────────┴──────┬─────────────┴──────────┐
//! │   Endpoint   │      HTTP        │   Decode / Paginate    │
//! ├──────────────┼──────────────────┼────────────────────────┤
//! │ Base URL     │ API key header   │ Page<E> per kind       │
//! │ page=N       │ Rate limit       │ offset/limit/total     │
//! │ Filters      │ Body stream      │ Next page index        │
//! └──────────────┴──────────────────┴────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Entity kinds and entity types
pub mod types;

/// Scroll configuration
pub mod config;

/// Next page calculation
pub mod pagination;

/// Response body decoding
pub mod decode;

/// Endpoint URL construction
pub mod endpoint;

/// HTTP page fetching with rate limiting
pub mod http;

/// Scroll engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{RetryPolicy, ScrollConfig, TimeEntriesFilter};
pub use decode::{Entity, Page};
pub use engine::{scroll, scroll_results, Scroll, ScrollEngine, ScrollHandle, ScrollStats};
pub use http::{HttpPageFetcher, PageSource};
pub use pagination::{next_page, NextPage, PageIndex};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
