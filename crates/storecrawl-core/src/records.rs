//! Per-store crawl results and the run-wide aggregate handed to exporters.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::store::StoreUrl;

/// Placeholder written in place of a product image the store did not supply.
pub const IMAGE_SENTINEL: &str = "-";

/// Contact signals gathered from a store's informational pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactLinks {
    pub emails: BTreeSet<String>,
    pub facebook: BTreeSet<String>,
    pub twitter: BTreeSet<String>,
}

impl ContactLinks {
    /// Unions every set of `other` into `self`.
    pub fn merge(&mut self, other: ContactLinks) {
        self.emails.extend(other.emails);
        self.facebook.extend(other.facebook);
        self.twitter.extend(other.twitter);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.facebook.is_empty() && self.twitter.is_empty()
    }
}

/// Platform-independent shape of a sampled product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub title: String,
    /// Image URL, or [`IMAGE_SENTINEL`] when the product has none.
    pub image: String,
}

impl ProductSummary {
    /// Builds a summary, substituting [`IMAGE_SENTINEL`] for a missing or
    /// empty image.
    #[must_use]
    pub fn new(title: impl Into<String>, image: Option<String>) -> Self {
        Self {
            title: title.into(),
            image: image
                .filter(|src| !src.trim().is_empty())
                .unwrap_or_else(|| IMAGE_SENTINEL.to_owned()),
        }
    }
}

/// Terminal state of one store's crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CrawlStatus {
    Completed,
    /// A transport-level failure stopped the crawl before it finished.
    Unreachable { reason: String },
}

/// Everything collected for one store during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlRecord {
    pub links: ContactLinks,
    pub products: Vec<ProductSummary>,
    pub status: CrawlStatus,
}

impl CrawlRecord {
    #[must_use]
    pub fn completed(links: ContactLinks, products: Vec<ProductSummary>) -> Self {
        Self {
            links,
            products,
            status: CrawlStatus::Completed,
        }
    }

    /// A record for a store that could not be reached; links and products
    /// stay empty.
    #[must_use]
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            links: ContactLinks::default(),
            products: Vec::new(),
            status: CrawlStatus::Unreachable {
                reason: reason.into(),
            },
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.status, CrawlStatus::Unreachable { .. })
    }
}

/// Results of a whole run keyed by store.
///
/// Ordering is by store URL and carries no meaning beyond making exports
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult {
    records: BTreeMap<StoreUrl, CrawlRecord>,
}

impl AggregateResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the record for `store`, returning the one it replaced.
    pub fn insert(&mut self, store: StoreUrl, record: CrawlRecord) -> Option<CrawlRecord> {
        self.records.insert(store, record)
    }

    #[must_use]
    pub fn get(&self, store: &StoreUrl) -> Option<&CrawlRecord> {
        self.records.get(store)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, StoreUrl, CrawlRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of stores that ended unreachable.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.records.values().filter(|r| r.is_failed()).count()
    }
}

impl<'a> IntoIterator for &'a AggregateResult {
    type Item = (&'a StoreUrl, &'a CrawlRecord);
    type IntoIter = btree_map::Iter<'a, StoreUrl, CrawlRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
