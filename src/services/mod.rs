pub mod backend;
pub mod classifier;
pub mod draft;
pub mod notify;
pub mod pricing;
pub mod store;

use std::time::Duration;

use anyhow::Context;

/// HTTP client shared by the REST adapters. Every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}
