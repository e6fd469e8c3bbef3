//! Runs the fetch → extract → write cycle for each site.
//!
//! A site that fails to fetch, or whose page yields nothing, is reported and
//! skipped; the remaining sites still run.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::export::write_csv;
use crate::extractor::{ListingRecord, extract};
use crate::fetcher::{FetchError, ReaderClient};
use crate::sites::Site;

/// Characters of raw content logged when a page yields no listings.
const EMPTY_PREVIEW_CHARS: usize = 1000;

/// Listings kept on the outcome for console display.
const SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SiteStatus {
    /// Listings were found and written to `path`.
    Saved { path: PathBuf },
    /// The page was fetched but nothing looked like a listing.
    Empty,
    /// Fetching or writing failed.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteOutcome {
    pub site: &'static str,
    pub jobs: usize,
    #[serde(flatten)]
    pub status: SiteStatus,
    #[serde(skip)]
    pub sample: Vec<ListingRecord>,
}

impl SiteOutcome {
    fn failed(site: &'static str, reason: impl Into<String>) -> Self {
        Self {
            site,
            jobs: 0,
            status: SiteStatus::Failed {
                reason: reason.into(),
            },
            sample: Vec::new(),
        }
    }

    /// A CSV file was produced for the site.
    pub fn is_success(&self) -> bool {
        matches!(self.status, SiteStatus::Saved { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    client: ReaderClient,
    output_dir: PathBuf,
    concurrency: usize,
}

impl Runner {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::with_client(
            ReaderClient::new(config.reader())?,
            config,
        ))
    }

    pub fn with_client(client: ReaderClient, config: &Config) -> Self {
        Self {
            client,
            output_dir: config.output_dir().to_path_buf(),
            concurrency: config.concurrency(),
        }
    }

    #[instrument(skip_all, fields(site = site.key()))]
    pub async fn run_site(&self, site: &Site) -> SiteOutcome {
        info!("Scraping {} jobs from {}", site.name(), site.listing_url());

        let page = match self.client.fetch(site.listing_url()).await {
            Ok(page) => page,
            Err(err) => {
                warn!("Failed to fetch content: {}", err);
                return SiteOutcome::failed(site.key(), err.to_string());
            }
        };

        let records = extract(&page.content, site.rules());
        if records.is_empty() {
            warn!(
                preview = page.preview(EMPTY_PREVIEW_CHARS),
                "No jobs found in fetched content"
            );
            return SiteOutcome {
                site: site.key(),
                jobs: 0,
                status: SiteStatus::Empty,
                sample: Vec::new(),
            };
        }

        let path = self.output_dir.join(site.output_file());
        if let Err(err) = write_csv(&records, &path) {
            warn!(path = %path.display(), "Failed to write csv: {}", err);
            return SiteOutcome::failed(site.key(), err.to_string());
        }

        info!(
            "Scraped {} jobs and saved to {}",
            records.len(),
            path.display()
        );

        SiteOutcome {
            site: site.key(),
            jobs: records.len(),
            status: SiteStatus::Saved { path },
            sample: records.into_iter().take(SAMPLE_SIZE).collect(),
        }
    }

    /// Run every site. Outcomes come back in the order of `sites`.
    pub async fn run_all(&self, sites: Vec<Site>) -> Vec<SiteOutcome> {
        if self.concurrency <= 1 {
            let mut outcomes = Vec::with_capacity(sites.len());
            for site in &sites {
                outcomes.push(self.run_site(site).await);
            }
            return outcomes;
        }

        // Never more permits than sites
        let permits = Arc::new(Semaphore::new(self.concurrency.min(sites.len()).max(1)));
        let handles: Vec<_> = sites
            .into_iter()
            .map(|site| {
                let runner = self.clone();
                let permits = Arc::clone(&permits);
                let key = site.key();
                let handle = tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    runner.run_site(&site).await
                });
                (key, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (key, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(site = key, "Site task aborted: {}", err);
                    SiteOutcome::failed(key, err.to_string())
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}
