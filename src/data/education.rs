use std::collections::HashMap;

use serde::Deserialize;

use crate::data::topology::Topology;
use crate::data::{JsonFetcher, LenientNumber, fetch_json};
use crate::error::ChartResult;

pub const EDUCATION_DATA_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/choropleth_map/for_user_education.json";
pub const COUNTY_TOPOLOGY_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/choropleth_map/counties.json";

/// Adult population share holding a bachelor's degree or higher, per county.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EducationRecord {
    pub fips: u32,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub area_name: String,
    #[serde(default, rename = "bachelorsOrHigher")]
    pub bachelors_or_higher: LenientNumber,
}

impl EducationRecord {
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.bachelors_or_higher.0
    }
}

/// Education records plus the county topology they color.
#[derive(Debug, Clone, PartialEq)]
pub struct EducationDataset {
    pub records: Vec<EducationRecord>,
    pub topology: Topology,
    by_fips: HashMap<u32, usize>,
}

impl EducationDataset {
    #[must_use]
    pub fn new(records: Vec<EducationRecord>, topology: Topology) -> Self {
        let by_fips = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.fips, index))
            .rev()
            .collect();
        Self {
            records,
            topology,
            by_fips,
        }
    }

    /// Fetches education records first, then the topology.
    pub fn load<F: JsonFetcher + ?Sized>(
        fetcher: &F,
        education_locator: &str,
        topology_locator: &str,
    ) -> ChartResult<Self> {
        let records: Vec<EducationRecord> = fetch_json(fetcher, education_locator)?;
        let topology: Topology = fetch_json(fetcher, topology_locator)?;
        Ok(Self::new(records, topology))
    }

    /// Index of the first record for `fips`.
    #[must_use]
    pub fn index_of(&self, fips: u32) -> Option<usize> {
        self.by_fips.get(&fips).copied()
    }

    #[must_use]
    pub fn find(&self, fips: u32) -> Option<&EducationRecord> {
        self.index_of(fips).and_then(|index| self.records.get(index))
    }

    /// Percentage for `fips`; counties without a record count as zero.
    #[must_use]
    pub fn percentage(&self, fips: u32) -> f64 {
        self.find(fips).map_or(0.0, EducationRecord::percentage)
    }
}
