//! HTTP module
//!
//! Fetches single pages from the Redmine REST API.
//!
//! # Features
//!
//! - **PageSource**: the seam between the scroll engine and the network
//! - **HttpPageFetcher**: reqwest implementation sending the API key header
//! - **Rate Limiting**: optional token bucket rate limiter using governor

mod client;
mod rate_limit;

pub use client::{HttpPageFetcher, PageSource, API_KEY_HEADER};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
