//! Maps a store to the adapter for its platform.
//!
//! Rules are checked in registration order; the first whose predicate
//! accepts the store supplies the adapter. Stores no rule claims get the
//! fallback, which for [`StoreResolver::default`] is Shopify.

use std::sync::Arc;

use storecrawl_core::StoreUrl;

use crate::adapter::{ShopifyAdapter, StoreAdapter};

type Predicate = Box<dyn Fn(&StoreUrl) -> bool + Send + Sync>;
type Factory = Box<dyn Fn(&StoreUrl) -> Arc<dyn StoreAdapter> + Send + Sync>;

struct Rule {
    name: String,
    predicate: Predicate,
    factory: Factory,
}

pub struct StoreResolver {
    rules: Vec<Rule>,
    fallback: Factory,
}

impl StoreResolver {
    /// A resolver with no rules; every store gets the adapter built by
    /// `fallback`.
    pub fn new<F>(fallback: F) -> Self
    where
        F: Fn(&StoreUrl) -> Arc<dyn StoreAdapter> + Send + Sync + 'static,
    {
        Self {
            rules: Vec::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Adds a rule selecting `factory` for stores accepted by `predicate`.
    #[must_use]
    pub fn with_rule<P, F>(mut self, name: impl Into<String>, predicate: P, factory: F) -> Self
    where
        P: Fn(&StoreUrl) -> bool + Send + Sync + 'static,
        F: Fn(&StoreUrl) -> Arc<dyn StoreAdapter> + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            name: name.into(),
            predicate: Box::new(predicate),
            factory: Box::new(factory),
        });
        self
    }

    /// Adds a rule matching stores whose host is `suffix` or a subdomain of it,
    /// e.g. `"myshopify.com"` matches `shop.myshopify.com`.
    #[must_use]
    pub fn with_host_suffix<F>(self, suffix: &str, factory: F) -> Self
    where
        F: Fn(&StoreUrl) -> Arc<dyn StoreAdapter> + Send + Sync + 'static,
    {
        let domain = suffix.trim_start_matches('.').to_ascii_lowercase();
        let name = format!("host *.{domain}");
        self.with_rule(
            name,
            move |store| {
                store.host().is_some_and(|host| {
                    host == domain
                        || host
                            .strip_suffix(domain.as_str())
                            .is_some_and(|prefix| prefix.ends_with('.'))
                })
            },
            factory,
        )
    }

    pub fn resolve(&self, store: &StoreUrl) -> Arc<dyn StoreAdapter> {
        for rule in &self.rules {
            if (rule.predicate)(store) {
                tracing::trace!(store = %store, rule = %rule.name, "adapter rule matched");
                return (rule.factory)(store);
            }
        }
        (self.fallback)(store)
    }
}

impl Default for StoreResolver {
    fn default() -> Self {
        Self::new(shopify).with_host_suffix("myshopify.com", shopify)
    }
}

fn shopify(_store: &StoreUrl) -> Arc<dyn StoreAdapter> {
    Arc::new(ShopifyAdapter::new())
}
