//! Contact signal extraction from informational pages.
//!
//! Pure functions of the page content: no network access and no shared
//! state, so the same input always yields the same [`ContactLinks`].

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use storecrawl_core::ContactLinks;

use crate::document;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("valid regex"));
static FACEBOOK_LINKS: LazyLock<Selector> =
    LazyLock::new(|| document::css(r#"a[href*="facebook.com"]"#));
static TWITTER_LINKS: LazyLock<Selector> =
    LazyLock::new(|| document::css(r#"a[href*="twitter.com"]"#));

/// Extracts emails, Facebook links and Twitter links from raw page content.
#[must_use]
pub fn scan(content: &str) -> ContactLinks {
    let doc = document::parse(content);
    ContactLinks {
        emails: find_emails(content),
        facebook: collect_hrefs(&doc, &FACEBOOK_LINKS),
        twitter: collect_hrefs(&doc, &TWITTER_LINKS),
    }
}

/// Every email-shaped token in the raw text, markup included.
#[must_use]
pub fn find_emails(content: &str) -> BTreeSet<String> {
    EMAIL_RE
        .find_iter(content)
        .map(|m| m.as_str())
        .filter(|e| !e.is_empty())
        .map(str::to_owned)
        .collect()
}

#[must_use]
pub fn find_facebook_links(content: &str) -> BTreeSet<String> {
    collect_hrefs(&document::parse(content), &FACEBOOK_LINKS)
}

#[must_use]
pub fn find_twitter_links(content: &str) -> BTreeSet<String> {
    collect_hrefs(&document::parse(content), &TWITTER_LINKS)
}

fn collect_hrefs(doc: &scraper::Html, selector: &Selector) -> BTreeSet<String> {
    document::select_attr(doc, selector, "href")
        .map(str::to_owned)
        .collect()
}
