//! Dataset acquisition: locator resolution, transport, and JSON decoding.
//!
//! Every transport or parse failure surfaces as `ChartError::DataUnavailable`.
//! There is no retry logic.

pub mod cyclists;
pub mod education;
pub mod gdp;
pub mod geocode;
pub mod hierarchy;
mod http;
pub mod temperature;
pub mod topology;

use std::collections::HashMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ChartError, ChartResult};

pub use http::HttpFetcher;

/// Transport that resolves a locator to raw text.
pub trait JsonFetcher {
    fn fetch_text(&self, locator: &str) -> ChartResult<String>;
}

impl<F: JsonFetcher + ?Sized> JsonFetcher for &F {
    fn fetch_text(&self, locator: &str) -> ChartResult<String> {
        (**self).fetch_text(locator)
    }
}

impl<F: JsonFetcher + ?Sized> JsonFetcher for Box<F> {
    fn fetch_text(&self, locator: &str) -> ChartResult<String> {
        (**self).fetch_text(locator)
    }
}

/// Fetches `locator` and decodes it as `T`.
pub fn fetch_json<T, F>(fetcher: &F, locator: &str) -> ChartResult<T>
where
    T: DeserializeOwned,
    F: JsonFetcher + ?Sized,
{
    let text = fetcher.fetch_text(locator).inspect_err(|err| {
        warn!(locator, error = %err, "dataset fetch failed");
    })?;
    debug!(locator, bytes = text.len(), "dataset fetched");
    serde_json::from_str(&text).map_err(|e| {
        warn!(locator, error = %e, "dataset decode failed");
        ChartError::data_unavailable(locator, format!("invalid json: {e}"))
    })
}

/// Default locator with an optional override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    default_locator: String,
    override_locator: Option<String>,
}

impl DataSource {
    #[must_use]
    pub fn new(default_locator: impl Into<String>) -> Self {
        Self {
            default_locator: default_locator.into(),
            override_locator: None,
        }
    }

    #[must_use]
    pub fn with_override(mut self, locator: Option<String>) -> Self {
        self.override_locator = locator;
        self
    }

    /// The override when set, otherwise the default.
    #[must_use]
    pub fn locator(&self) -> &str {
        self.override_locator
            .as_deref()
            .unwrap_or(&self.default_locator)
    }

    #[must_use]
    pub fn default_locator(&self) -> &str {
        &self.default_locator
    }
}

/// Reads local files; accepts plain paths and `file://` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl JsonFetcher for FileFetcher {
    fn fetch_text(&self, locator: &str) -> ChartResult<String> {
        let path = local_path(locator)?;
        std::fs::read_to_string(&path)
            .map_err(|e| ChartError::data_unavailable(locator, format!("read failed: {e}")))
    }
}

fn local_path(locator: &str) -> ChartResult<PathBuf> {
    match Url::parse(locator) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_err(|()| ChartError::data_unavailable(locator, "invalid file url")),
        _ => Ok(PathBuf::from(locator)),
    }
}

/// Dispatches on the locator scheme: `http(s)` goes to the network, anything
/// else is read from disk.
#[derive(Debug, Clone, Default)]
pub struct AutoFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl AutoFetcher {
    #[must_use]
    pub fn new(http: HttpFetcher) -> Self {
        Self {
            http,
            file: FileFetcher,
        }
    }
}

impl JsonFetcher for AutoFetcher {
    fn fetch_text(&self, locator: &str) -> ChartResult<String> {
        match Url::parse(locator) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => self.http.fetch_text(locator),
            _ => self.file.fetch_text(locator),
        }
    }
}

/// In-memory locator map, used for fixtures and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    documents: HashMap<String, String>,
}

impl StaticFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(mut self, locator: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(locator.into(), body.into());
        self
    }

    pub fn insert(&mut self, locator: impl Into<String>, body: impl Into<String>) {
        self.documents.insert(locator.into(), body.into());
    }
}

impl JsonFetcher for StaticFetcher {
    fn fetch_text(&self, locator: &str) -> ChartResult<String> {
        self.documents
            .get(locator)
            .cloned()
            .ok_or_else(|| ChartError::data_unavailable(locator, "no document registered"))
    }
}

/// JSON number that may arrive as a string (`"82.53"`).
///
/// Unparseable strings and `null` decode to `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LenientNumber(pub f64);

impl<'de> serde::Deserialize<'de> for LenientNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let number = match value {
            serde_json::Value::Number(number) => number.as_f64().unwrap_or(0.0),
            serde_json::Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
            serde_json::Value::Bool(flag) => f64::from(u8::from(flag)),
            _ => 0.0,
        };
        Ok(Self(if number.is_finite() { number } else { 0.0 }))
    }
}
