//! The scraping pipeline - multi-page orchestration over a page agent.

pub mod scrape;

pub use scrape::Scraper;
