//! Page fetcher
//!
//! Performs one GET per page and hands the unread body to the decoder.
//! Transport failures are classified as `Error::Http`, url construction
//! failures as the fatal `Error::ApiEndpointUrl`.

use super::rate_limit::RateLimiter;
use crate::config::ScrollConfig;
use crate::decode::RawPage;
use crate::endpoint::build_endpoint_url;
use crate::error::Result;
use crate::pagination::PageIndex;
use crate::types::EntityKind;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Header carrying the Redmine API key
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// Source of raw pages for the scroll engine
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page of a collection
    async fn fetch(&self, kind: EntityKind, page: PageIndex) -> Result<RawPage>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch(&self, kind: EntityKind, page: PageIndex) -> Result<RawPage> {
        (**self).fetch(kind, page).await
    }
}

/// Page fetcher backed by reqwest
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
    config: Arc<ScrollConfig>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpPageFetcher {
    /// Create a fetcher with its own HTTP client
    pub fn new(config: Arc<ScrollConfig>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("redmine-scroll/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a fetcher sharing an existing HTTP client
    pub fn with_client(client: Client, config: Arc<ScrollConfig>) -> Self {
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);
        Self {
            client,
            config,
            rate_limiter,
        }
    }

    /// URL of one page of a collection
    pub fn url_for(&self, kind: EntityKind, page: PageIndex) -> Result<Url> {
        build_endpoint_url(&self.config.base_url, kind, page, &self.config.time_entries)
    }

    /// Perform one GET request
    pub async fn get(&self, url: Url) -> Result<RawPage> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        if self.config.logging_enabled {
            info!("> GET {url}");
        }

        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, &self.config.api_token)
            .send()
            .await?;

        let status = response.status();
        if self.config.logging_enabled {
            info!("< {status}");
        }
        if !status.is_success() {
            warn!("{url} answered {status}, the body will most likely not decode");
        }
        debug!("Fetched headers for {url}");

        let body = response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();
        Ok(RawPage::from_stream(status.as_u16(), body))
    }
}

#[async_trait]
impl PageSource for HttpPageFetcher {
    async fn fetch(&self, kind: EntityKind, page: PageIndex) -> Result<RawPage> {
        let url = self.url_for(kind, page)?;
        self.get(url).await
    }
}

impl std::fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("base_url", &self.config.base_url)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
