use serde::Deserialize;

use crate::data::{JsonFetcher, fetch_json};
use crate::error::ChartResult;

pub const TEMPERATURE_DATA_URL: &str = "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/global-temperature.json";

/// Monthly deviation from the base temperature. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MonthlyVariance {
    pub year: i32,
    pub month: u32,
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureDataset {
    pub base_temperature: f64,
    pub monthly_variance: Vec<MonthlyVariance>,
}

impl TemperatureDataset {
    pub fn load<F: JsonFetcher + ?Sized>(fetcher: &F, locator: &str) -> ChartResult<Self> {
        fetch_json(fetcher, locator)
    }

    /// Absolute temperature of one record.
    #[must_use]
    pub fn temperature(&self, record: &MonthlyVariance) -> f64 {
        self.base_temperature + record.variance
    }
}
