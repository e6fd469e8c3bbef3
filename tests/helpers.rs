#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use jobsweep::{config::ReaderConfig, fetcher::ReaderClient};
use url::Url;
use wiremock::MockServer;

/// Reader settings pointing at a mock server, one attempt per fetch.
pub fn reader_config(server: &MockServer) -> ReaderConfig {
    ReaderConfig::new(Url::parse(&server.uri()).unwrap())
        .with_attempts(1)
        .with_timeout(Duration::from_secs(5))
}

/// Client that retries without sleeping.
pub fn reader_client(config: &ReaderConfig) -> ReaderClient {
    ReaderClient::new(config)
        .unwrap()
        .with_retry_base(Duration::ZERO)
}

/// Fresh per-test output directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jobsweep-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
