//! Country-code to flag-glyph lookup used by scatterplot tooltips.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::data::{HttpFetcher, JsonFetcher, fetch_json};
use crate::error::{ChartError, ChartResult};

pub const REST_COUNTRIES_BASE_URL: &str = "https://restcountries.com/v3.1/alpha/";

/// Offset from an ASCII uppercase letter to its regional indicator symbol.
const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;

/// Resolves an ISO 3166 alpha-3 code to its alpha-2 form.
pub trait FlagLookup {
    fn alpha2(&self, alpha3: &str) -> ChartResult<String>;
}

#[derive(Debug, Deserialize)]
struct CountryEntry {
    cca2: String,
}

/// One GET per lookup against the restcountries API.
#[derive(Debug, Clone)]
pub struct RestCountriesLookup<F = HttpFetcher> {
    fetcher: F,
    base_url: String,
}

impl Default for RestCountriesLookup<HttpFetcher> {
    fn default() -> Self {
        Self::new(HttpFetcher::default())
    }
}

impl<F: JsonFetcher> RestCountriesLookup<F> {
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            base_url: REST_COUNTRIES_BASE_URL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl<F: JsonFetcher> FlagLookup for RestCountriesLookup<F> {
    fn alpha2(&self, alpha3: &str) -> ChartResult<String> {
        let locator = format!("{}{alpha3}", self.base_url);
        let entries: Vec<CountryEntry> = fetch_json(&self.fetcher, &locator)
            .map_err(|e| ChartError::lookup_failed(alpha3, e))?;
        entries
            .into_iter()
            .next()
            .map(|entry| entry.cca2)
            .ok_or_else(|| ChartError::lookup_failed(alpha3, "empty response"))
    }
}

/// Fixed code table; unknown codes fail.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    codes: HashMap<String, String>,
}

impl StaticLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_code(mut self, alpha3: impl Into<String>, alpha2: impl Into<String>) -> Self {
        self.codes.insert(alpha3.into(), alpha2.into());
        self
    }
}

impl FlagLookup for StaticLookup {
    fn alpha2(&self, alpha3: &str) -> ChartResult<String> {
        self.codes
            .get(alpha3)
            .cloned()
            .ok_or_else(|| ChartError::lookup_failed(alpha3, "unknown country code"))
    }
}

/// Regional-indicator pair for a two-letter code, e.g. `FR` -> 🇫🇷.
#[must_use]
pub fn flag_emoji(alpha2: &str) -> Option<String> {
    if alpha2.len() != 2 || !alpha2.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    alpha2
        .bytes()
        .map(|b| char::from_u32(REGIONAL_INDICATOR_OFFSET + u32::from(b.to_ascii_uppercase())))
        .collect()
}

/// Flag glyph for `alpha3`, or the code itself when the lookup fails.
pub fn flag_or_code<L: FlagLookup + ?Sized>(lookup: &L, alpha3: &str) -> String {
    let resolved = lookup.alpha2(alpha3).and_then(|alpha2| {
        flag_emoji(&alpha2)
            .ok_or_else(|| ChartError::lookup_failed(alpha3, format!("invalid alpha-2 `{alpha2}`")))
    });
    match resolved {
        Ok(flag) => {
            debug!(alpha3, "flag resolved");
            flag
        }
        Err(err) => {
            warn!(alpha3, error = %err, "flag lookup failed, using code");
            alpha3.to_owned()
        }
    }
}
