//! Per-store crawl pipeline and the run loop around it.
//!
//! Each store goes through: resolve adapter → scan informational pages →
//! sample catalog products → assemble record. A transport failure anywhere in
//! that sequence ends the store as [`StoreOutcome::Unreachable`]; HTTP error
//! statuses only skip the page that produced them. Stores never share mutable
//! state, so the run loop can process several at once and merge outcomes by
//! store URL afterwards.

use futures::stream::{self, StreamExt};
use storecrawl_core::{
    AggregateResult, AppConfig, ContactLinks, CrawlRecord, StoreUrl, UnreachablePolicy,
    DEFAULT_INFO_PAGES,
};

use crate::client::StoreClient;
use crate::error::ScraperError;
use crate::resolver::StoreResolver;
use crate::scanner;

/// Tunables for a crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Paths scanned for contact signals, relative to the store root.
    pub info_pages: Vec<String>,
    /// Maximum number of products sampled per store.
    pub sample_size: usize,
    /// Catalog path to use instead of the adapter's default.
    pub catalog_path: Option<String>,
    /// Stores processed concurrently; `1` crawls sequentially.
    pub max_concurrent_stores: usize,
    pub unreachable_policy: UnreachablePolicy,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            info_pages: DEFAULT_INFO_PAGES.iter().map(|p| (*p).to_owned()).collect(),
            sample_size: 5,
            catalog_path: None,
            max_concurrent_stores: 1,
            unreachable_policy: UnreachablePolicy::SkipStore,
        }
    }
}

impl CrawlSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            info_pages: config.info_pages.clone(),
            sample_size: config.product_sample_size,
            catalog_path: config.catalog_path.clone(),
            max_concurrent_stores: config.max_concurrent_stores,
            unreachable_policy: config.unreachable_policy,
        }
    }
}

/// How a single store's crawl ended.
#[derive(Debug)]
pub enum StoreOutcome {
    Completed(CrawlRecord),
    /// The store could not be reached; carries the transport failure.
    Unreachable(ScraperError),
}

pub struct CrawlOrchestrator {
    client: StoreClient,
    resolver: StoreResolver,
    settings: CrawlSettings,
}

impl CrawlOrchestrator {
    #[must_use]
    pub fn new(client: StoreClient, resolver: StoreResolver, settings: CrawlSettings) -> Self {
        Self {
            client,
            resolver,
            settings,
        }
    }

    /// Builds an orchestrator with the default resolver from application
    /// config.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let client = StoreClient::new(config.request_timeout_secs, &config.user_agent)?;
        Ok(Self::new(
            client,
            StoreResolver::default(),
            CrawlSettings::from_config(config),
        ))
    }

    /// Crawls every store and merges the outcomes.
    ///
    /// Under [`UnreachablePolicy::SkipStore`] every input store ends up in the
    /// result, unreachable ones marked as such. Under
    /// [`UnreachablePolicy::FailRun`] the first unreachable store aborts the
    /// run and in-flight stores are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::StoreUnreachable`] only under
    /// [`UnreachablePolicy::FailRun`].
    pub async fn run<I>(&self, stores: I) -> Result<AggregateResult, ScraperError>
    where
        I: IntoIterator<Item = StoreUrl>,
    {
        let max_concurrent = self.settings.max_concurrent_stores.max(1);

        let mut outcomes = stream::iter(stores)
            .map(|store| async move {
                let outcome = self.crawl_store(&store).await;
                (store, outcome)
            })
            .buffer_unordered(max_concurrent);

        let mut result = AggregateResult::new();
        while let Some((store, outcome)) = outcomes.next().await {
            let record = match outcome {
                StoreOutcome::Completed(record) => record,
                StoreOutcome::Unreachable(err) => match self.settings.unreachable_policy {
                    UnreachablePolicy::SkipStore => CrawlRecord::unreachable(err.to_string()),
                    UnreachablePolicy::FailRun => {
                        return Err(ScraperError::StoreUnreachable {
                            store: store.to_string(),
                            source: Box::new(err),
                        });
                    }
                },
            };
            result.insert(store, record);
        }

        let failed = result.failed_count();
        if failed > 0 {
            tracing::warn!(
                failed_stores = failed,
                total_stores = result.len(),
                "some stores were unreachable"
            );
        }
        tracing::info!(stores = result.len(), "crawl finished");

        Ok(result)
    }

    /// Runs the full pipeline for one store.
    pub async fn crawl_store(&self, store: &StoreUrl) -> StoreOutcome {
        let adapter = self.resolver.resolve(store);
        tracing::info!(store = %store, platform = adapter.platform(), "crawling store");

        let links = match self.scan_info_pages(store).await {
            Ok(links) => links,
            Err(err) => return self.unreachable(store, err),
        };
        if links.is_empty() {
            tracing::debug!(store = %store, "no contact signals on informational pages");
        }

        let catalog_path = self
            .settings
            .catalog_path
            .as_deref()
            .unwrap_or(adapter.catalog_path());
        let catalog_url = store.join(catalog_path);

        let products = match adapter
            .list_products(&self.client, store, &catalog_url, self.settings.sample_size)
            .await
        {
            Ok(products) => products,
            Err(err) if err.is_transport() => return self.unreachable(store, err),
            Err(err) => {
                tracing::warn!(store = %store, error = %err, "product sampling failed");
                Vec::new()
            }
        };

        tracing::info!(
            store = %store,
            emails = links.emails.len(),
            facebook = links.facebook.len(),
            twitter = links.twitter.len(),
            products = products.len(),
            "store completed"
        );
        StoreOutcome::Completed(CrawlRecord::completed(links, products))
    }

    /// Scans every configured informational page and unions the results.
    ///
    /// Pages answering with an HTTP error status are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first transport failure; later pages are not fetched.
    pub async fn scan_info_pages(&self, store: &StoreUrl) -> Result<ContactLinks, ScraperError> {
        let mut links = ContactLinks::default();

        for path in &self.settings.info_pages {
            let url = store.join(path);
            let page = self.client.get(&url).await?;
            if !page.is_success() {
                tracing::debug!(url = %url, status = page.status.as_u16(), "skipping page");
                continue;
            }
            links.merge(scanner::scan(&page.body));
        }

        Ok(links)
    }

    fn unreachable(&self, store: &StoreUrl, err: ScraperError) -> StoreOutcome {
        tracing::warn!(
            store = %store,
            error = %err,
            policy = %self.settings.unreachable_policy,
            "store unreachable"
        );
        StoreOutcome::Unreachable(err)
    }
}
