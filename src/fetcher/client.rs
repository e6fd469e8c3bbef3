use crate::config::ReaderConfig;
use crate::fetcher::{
    backoff::{BASE_DELAY, backoff_delay},
    errors::{FetchError, is_retriable_status},
    pipeline::{is_supported_content_type, process_response},
    types::ReaderPage,
};
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use tracing::{instrument, warn};
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("jobsweep/", env!("CARGO_PKG_VERSION"));

/// Client for the text-extraction reader proxy.
///
/// A listing page `https://site/jobs` is fetched as `GET {base}/https://site/jobs`
/// and comes back as markdown-like text.
#[derive(Debug, Clone)]
pub struct ReaderClient {
    http: Client,
    config: ReaderConfig,
    retry_base: Duration,
}

impl ReaderClient {
    pub fn new(config: &ReaderConfig) -> Result<Self, FetchError> {
        let http = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            http,
            config: config.clone(),
            retry_base: BASE_DELAY,
        })
    }

    /// Override the base delay between attempts.
    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    /// The proxy URL used for a listing page.
    pub fn reader_url(&self, target: &Url) -> Result<Url, FetchError> {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, target))?)
    }

    /// Fetch a listing page through the reader, retrying transient failures.
    #[instrument(skip_all, fields(url = %target_url))]
    pub async fn fetch(&self, target_url: &str) -> Result<ReaderPage, FetchError> {
        let target = Url::parse(target_url)?;
        let reader_url = self.reader_url(&target)?;
        let attempts = self.config.attempts.max(1);

        let mut attempt = 0;
        loop {
            match self.fetch_once(&target, &reader_url).await {
                Ok(page) => return Ok(page),
                Err(err) if err.should_retry() && attempt + 1 < attempts => {
                    let delay = backoff_delay(attempt, self.retry_base);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying reader fetch after error: {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_once(&self, target: &Url, reader_url: &Url) -> Result<ReaderPage, FetchError> {
        let mut request = self.http.get(reader_url.clone());
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                retriable: is_retriable_status(status),
            });
        }

        // The reader answers with text/plain unless told otherwise
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/plain")
            .to_string();

        if !is_supported_content_type(&content_type) {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        // Check body size after download (in case Content-Length was missing)
        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        process_response(target.clone(), status, &body_bytes, &content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_url_prefixes_target() {
        let config = ReaderConfig::new(Url::parse("https://r.jina.ai").unwrap());
        let client = ReaderClient::new(&config).unwrap();
        let target = Url::parse("https://jerrie.se/lediga-jobb").unwrap();

        let url = client.reader_url(&target).unwrap();
        assert_eq!(url.as_str(), "https://r.jina.ai/https://jerrie.se/lediga-jobb");
    }

    #[test]
    fn reader_url_keeps_query() {
        let config = ReaderConfig::new(Url::parse("https://r.jina.ai/").unwrap());
        let client = ReaderClient::new(&config).unwrap();
        let target = Url::parse("https://sjr.se/lediga-jobb-samling/?filter=gi_city%3Dstockholm")
            .unwrap();

        let url = client.reader_url(&target).unwrap();
        assert!(url.as_str().starts_with("https://r.jina.ai/https://sjr.se/"));
        assert_eq!(url.query(), Some("filter=gi_city%3Dstockholm"));
    }
}
