/// Informational pages scanned for contact signals when none are configured.
pub const DEFAULT_INFO_PAGES: [&str; 4] = ["/about-us/", "/about/", "/contact/", "/contact-us/"];

/// What a run does when a store cannot be reached at the transport level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnreachablePolicy {
    /// Record the store as unreachable and carry on with the rest.
    #[default]
    SkipStore,
    /// Abort the whole run on the first unreachable store.
    FailRun,
}

impl std::fmt::Display for UnreachablePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnreachablePolicy::SkipStore => write!(f, "skip-store"),
            UnreachablePolicy::FailRun => write!(f, "fail-run"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// Per-request timeout; every fetch is bounded by it.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_stores: usize,
    pub product_sample_size: usize,
    pub info_pages: Vec<String>,
    /// Overrides the adapter's default catalog path when set.
    pub catalog_path: Option<String>,
    pub unreachable_policy: UnreachablePolicy,
}
