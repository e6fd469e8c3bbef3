pub mod config;
pub mod export;
pub mod extractor;
pub mod fetcher;
pub mod report;
pub mod runner;
pub mod sites;

pub use extractor::{ListingRecord, SiteRuleSet, extract};
