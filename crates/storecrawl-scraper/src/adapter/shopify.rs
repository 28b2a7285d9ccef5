//! Shopify storefronts.
//!
//! Catalog pages link products as `/products/{handle}` or
//! `/collections/all/products/{handle}`. Appending `.json` to either path
//! returns `{"product": {...}}` from the public storefront API.

use std::sync::LazyLock;

use scraper::Selector;
use serde::Deserialize;
use storecrawl_core::{ProductSummary, StoreUrl};

use super::{collect_product_links, PlatformAdapter};
use crate::client::StoreClient;
use crate::document;
use crate::error::ScraperError;

const CATALOG_PATH: &str = "/collections/all/";

static PRODUCT_LINKS: LazyLock<[Selector; 2]> = LazyLock::new(|| {
    [
        document::css(r#"a[href^="/products/"]"#),
        document::css(&format!(r#"a[href^="{CATALOG_PATH}products/"]"#)),
    ]
});

/// Envelope returned by `GET /products/{handle}.json`.
#[derive(Debug, Deserialize)]
struct ShopifyProductEnvelope {
    product: ShopifyProduct,
}

/// Product payload from `GET /products/{handle}.json`.
///
/// Only the fields the crawl uses are modelled; everything else in the
/// response is ignored. The type is unnameable outside this module: callers
/// only ever see the normalized [`ProductSummary`].
#[derive(Debug, Deserialize)]
pub struct ShopifyProduct {
    title: String,
    /// Primary image. `null` or absent for products without images.
    #[serde(default)]
    image: Option<ShopifyImage>,
}

#[derive(Debug, Deserialize)]
struct ShopifyImage {
    #[serde(default)]
    src: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShopifyAdapter;

impl ShopifyAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PlatformAdapter for ShopifyAdapter {
    type Raw = ShopifyProduct;

    const PLATFORM: &'static str = "shopify";
    const CATALOG_PATH: &'static str = CATALOG_PATH;

    fn discover_product_links(&self, catalog_page: &str) -> Vec<String> {
        collect_product_links(catalog_page, PRODUCT_LINKS.as_slice())
    }

    async fn fetch_product_detail(
        &self,
        client: &StoreClient,
        store: &StoreUrl,
        product_path: &str,
    ) -> Result<Option<ShopifyProduct>, ScraperError> {
        let url = store.join(&format!("{}.json", product_path.trim_end_matches('/')));
        let page = client.get(&url).await?;

        if !page.is_success() {
            tracing::debug!(url = %url, status = page.status.as_u16(), "no product found");
            return Ok(None);
        }

        match serde_json::from_str::<ShopifyProductEnvelope>(&page.body) {
            Ok(envelope) => Ok(Some(envelope.product)),
            Err(source) => {
                let err = ScraperError::Deserialize {
                    context: format!("product detail from {url}"),
                    source,
                };
                tracing::warn!(error = %err, "skipping product with unreadable payload");
                Ok(None)
            }
        }
    }

    fn normalize(&self, raw: ShopifyProduct) -> ProductSummary {
        ProductSummary::new(raw.title, raw.image.and_then(|image| image.src))
    }
}

#[cfg(test)]
#[path = "shopify_test.rs"]
mod tests;
