use serde::Deserialize;

use crate::data::{JsonFetcher, fetch_json};
use crate::error::ChartResult;

pub const CYCLIST_DATA_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/cyclist-data.json";

/// One fastest-ascent record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RiderRecord {
    /// Ride time as published, `MM:SS`.
    pub time: String,
    #[serde(default)]
    pub place: u32,
    pub seconds: u32,
    pub name: String,
    pub year: i32,
    /// ISO 3166 alpha-3 code.
    pub nationality: String,
    /// Doping allegation note; empty when there is none.
    #[serde(default)]
    pub doping: String,
    #[serde(default, rename = "URL")]
    pub url: String,
}

impl RiderRecord {
    #[must_use]
    pub fn has_doping_allegation(&self) -> bool {
        !self.doping.trim().is_empty()
    }
}

pub fn load_riders<F: JsonFetcher + ?Sized>(
    fetcher: &F,
    locator: &str,
) -> ChartResult<Vec<RiderRecord>> {
    fetch_json(fetcher, locator)
}
