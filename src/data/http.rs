use tracing::debug;

use crate::data::JsonFetcher;
use crate::error::{ChartError, ChartResult};

/// Unauthenticated HTTP GET transport backed by a blocking `reqwest` client.
///
/// Non-success status codes count as failures. No retries.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl JsonFetcher for HttpFetcher {
    fn fetch_text(&self, locator: &str) -> ChartResult<String> {
        debug!(locator, "http get");
        self.client
            .get(locator)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| ChartError::data_unavailable(locator, format!("request error: {e}")))?
            .text()
            .map_err(|e| ChartError::data_unavailable(locator, format!("body read error: {e}")))
    }
}
