pub mod app_config;
pub mod config;
pub mod error;
pub mod records;
pub mod store;

pub use app_config::{AppConfig, UnreachablePolicy, DEFAULT_INFO_PAGES};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use records::{
    AggregateResult, ContactLinks, CrawlRecord, CrawlStatus, ProductSummary, IMAGE_SENTINEL,
};
pub use store::StoreUrl;
