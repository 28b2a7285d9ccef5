//! Store crawling pipeline for storecrawl.
//!
//! Scans a store's informational pages for contact signals, samples products
//! from its catalog through a platform adapter, and drives many stores through
//! that pipeline with per-store failure isolation.

pub mod adapter;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod resolver;
pub mod scanner;

mod document;

pub use adapter::{PlatformAdapter, ShopifyAdapter, StoreAdapter};
pub use client::{Page, StoreClient};
pub use error::ScraperError;
pub use orchestrator::{CrawlOrchestrator, CrawlSettings, StoreOutcome};
pub use resolver::StoreResolver;
pub use scanner::scan;
