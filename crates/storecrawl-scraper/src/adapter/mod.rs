//! Platform adapters: how to find and read products on a given storefront
//! platform.
//!
//! Platforms implement [`PlatformAdapter`], which works with the platform's
//! own product payload. Callers only ever see [`StoreAdapter`], an object-safe
//! view that every `PlatformAdapter` gets for free and that yields
//! [`ProductSummary`] values, so raw payloads never leave this module.

mod shopify;

use std::collections::HashSet;
use std::future::Future;

use futures::future::BoxFuture;
use scraper::Selector;
use storecrawl_core::{ProductSummary, StoreUrl};

use crate::client::StoreClient;
use crate::document;
use crate::error::ScraperError;

pub use shopify::ShopifyAdapter;

/// Platform-specific product discovery and extraction.
pub trait PlatformAdapter: Send + Sync {
    /// Product payload as the platform returns it.
    type Raw: Send;

    /// Short platform identifier used in logs, e.g. `"shopify"`.
    const PLATFORM: &'static str;

    /// Path of the catalog page listing products, relative to the store root.
    const CATALOG_PATH: &'static str;

    /// Product URLs found on a catalog page, query strings stripped,
    /// de-duplicated in the order they were found.
    fn discover_product_links(&self, catalog_page: &str) -> Vec<String>;

    /// Fetches the detail payload for one product.
    ///
    /// Returns `Ok(None)` when the platform reports the product absent.
    /// Transport failures are returned as errors.
    fn fetch_product_detail(
        &self,
        client: &StoreClient,
        store: &StoreUrl,
        product_path: &str,
    ) -> impl Future<Output = Result<Option<Self::Raw>, ScraperError>> + Send;

    fn normalize(&self, raw: Self::Raw) -> ProductSummary;
}

/// Object-safe adapter interface used by the resolver and orchestrator.
pub trait StoreAdapter: Send + Sync {
    fn platform(&self) -> &'static str;

    fn catalog_path(&self) -> &'static str;

    /// Samples up to `count` products from the catalog page at `catalog_url`.
    ///
    /// A catalog page answering with an HTTP error status yields an empty
    /// list. Transport failures are returned as errors.
    fn list_products<'a>(
        &'a self,
        client: &'a StoreClient,
        store: &'a StoreUrl,
        catalog_url: &'a str,
        count: usize,
    ) -> BoxFuture<'a, Result<Vec<ProductSummary>, ScraperError>>;
}

impl<P: PlatformAdapter> StoreAdapter for P {
    fn platform(&self) -> &'static str {
        P::PLATFORM
    }

    fn catalog_path(&self) -> &'static str {
        P::CATALOG_PATH
    }

    fn list_products<'a>(
        &'a self,
        client: &'a StoreClient,
        store: &'a StoreUrl,
        catalog_url: &'a str,
        count: usize,
    ) -> BoxFuture<'a, Result<Vec<ProductSummary>, ScraperError>> {
        Box::pin(list_products(self, client, store, catalog_url, count))
    }
}

async fn list_products<P: PlatformAdapter>(
    adapter: &P,
    client: &StoreClient,
    store: &StoreUrl,
    catalog_url: &str,
    count: usize,
) -> Result<Vec<ProductSummary>, ScraperError> {
    let page = client.get(catalog_url).await?;
    if !page.is_success() {
        tracing::debug!(
            store = %store,
            url = catalog_url,
            status = page.status.as_u16(),
            "catalog page unavailable; no products sampled"
        );
        return Ok(Vec::new());
    }

    let links = adapter.discover_product_links(&page.body);
    tracing::debug!(
        store = %store,
        platform = P::PLATFORM,
        discovered = links.len(),
        "discovered product links"
    );

    let mut products = Vec::with_capacity(count.min(links.len()));
    for link in links.iter().take(count) {
        if let Some(raw) = adapter.fetch_product_detail(client, store, link).await? {
            products.push(adapter.normalize(raw));
        }
    }

    Ok(products)
}

/// Collects `href` values matching `selectors` (evaluated in order) with the
/// query string removed, keeping the first occurrence of each.
pub(crate) fn collect_product_links(catalog_page: &str, selectors: &[Selector]) -> Vec<String> {
    let doc = document::parse(catalog_page);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for selector in selectors {
        for href in document::select_attr(&doc, selector, "href") {
            let link = strip_query(href);
            if seen.insert(link.to_owned()) {
                links.push(link.to_owned());
            }
        }
    }

    links
}

/// Everything before the first `?`.
fn strip_query(href: &str) -> &str {
    href.split_once('?').map_or(href, |(path, _)| path)
}
