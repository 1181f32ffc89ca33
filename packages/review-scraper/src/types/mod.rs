//! Data types for review extraction and scraping sessions.

pub mod config;
pub mod review;
pub mod session;
