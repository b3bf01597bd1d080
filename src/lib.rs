//! Scraper for an ad transparency gallery.
//!
//! Raw creatives (gallery HTML or a structured API payload) are parsed into
//! loosely shaped JSON, normalized into [`domain::AdRecord`]s with aggregated
//! region/surface statistics, and exported as JSON, CSV, XML or HTML.

pub mod app;
pub mod coerce;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod export;
pub mod infra;
pub mod input;
pub mod logging;
pub mod parser;
pub mod pipeline;

pub use domain::{AdRecord, FlatRow};
pub use error::{Result, ScraperError};
