//! Normalized store identity.
//!
//! Store lists come from hand-maintained CSV files, so entries show up as
//! `shop.example.com`, `http://shop.example.com/` or `HTTPS://shop.example.com`.
//! [`StoreUrl::parse`] folds those spellings into one canonical base URL that
//! is safe to concatenate page paths onto.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// Absolute base URL of a store, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StoreUrl(String);

impl StoreUrl {
    /// Normalizes a raw store entry.
    ///
    /// Inputs without an `http://` or `https://` scheme are prefixed with
    /// `http://`. Scheme and host are lowercased and trailing slashes removed,
    /// so `a.com`, `A.com/` and `HTTP://a.com` share one identity. Path case
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStoreUrl`] if the input is blank or does
    /// not parse as an absolute URL with a host.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidStoreUrl {
                raw: raw.to_owned(),
                reason: "empty value".into(),
            });
        }

        let lower = trimmed.to_ascii_lowercase();
        let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
            trimmed.to_owned()
        } else {
            format!("http://{trimmed}")
        };

        let parsed = url::Url::parse(&with_scheme).map_err(|e| CoreError::InvalidStoreUrl {
            raw: raw.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(CoreError::InvalidStoreUrl {
                raw: raw.to_owned(),
                reason: "missing host".into(),
            });
        }

        // Serialization lowercases scheme and host and always ends a bare
        // host with `/`.
        Ok(Self(parsed.as_str().trim_end_matches('/').to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hostname of the store, lowercased.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.0)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    }

    /// Appends `path` to the base URL, inserting a leading `/` if missing.
    ///
    /// `StoreUrl("http://a.com").join("about/")` is `"http://a.com/about/"`.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.0)
        } else {
            format!("{}/{path}", self.0)
        }
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
