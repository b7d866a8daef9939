//! Pagination module
//!
//! Redmine paginates with `offset`/`limit`/`total_count` in every response,
//! while requests select a page with the 1-based `?page=` query parameter.
//!
//! # Overview
//!
//! The calculator turns the metadata of the page just received into the
//! index of the page to request next, or reports that the collection is
//! exhausted. For 53 issues and a limit of 25 it yields three requests:
//!
//! ```text
//! offset limit total    next
//!      0    25    53 -> page 2
//!     25    25    53 -> page 3
//!     50    25    53 -> done
//! ```

mod types;

pub use types::{next_page, NextPage, PageIndex, Pagination};
