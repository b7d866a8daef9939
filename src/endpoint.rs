//! Endpoint URL construction
//!
//! Joins the collection path onto the configured base URL and adds the
//! pagination and time entry filter query parameters.

use crate::config::TimeEntriesFilter;
use crate::error::{Error, Result};
use crate::pagination::PageIndex;
use crate::types::EntityKind;
use url::Url;

/// Build the URL of one page of a collection
///
/// The first page is requested without a `page` parameter. The filter only
/// applies to time entries.
pub fn build_endpoint_url(
    base: &str,
    kind: EntityKind,
    page: PageIndex,
    filter: &TimeEntriesFilter,
) -> Result<Url> {
    if base.chars().any(char::is_control) {
        return Err(Error::endpoint_url(base, "control character in base url"));
    }

    let mut url = Url::parse(base).map_err(|e| Error::endpoint_url(base, e.to_string()))?;

    url.path_segments_mut()
        .map_err(|()| Error::endpoint_url(base, "base url cannot have a path"))?
        .pop_if_empty()
        .push(kind.endpoint().trim_start_matches('/'));

    let mut pairs = Vec::new();
    if kind == EntityKind::TimeEntry {
        pairs.extend(filter.query_pairs());
    }
    if !page.is_first() {
        pairs.push(("page", page.to_string()));
    }

    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url)
}
