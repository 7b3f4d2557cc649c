use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::primitives::parse_utc_date;
use crate::data::{JsonFetcher, fetch_json};
use crate::error::{ChartError, ChartResult};

pub const GDP_DATA_URL: &str =
    "https://raw.githubusercontent.com/FreeCodeCamp/ProjectReferenceData/master/GDP-data.json";

/// Either the published document or a bare `[[date, value], ...]` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GdpDocument {
    Full {
        data: Vec<(String, f64)>,
        #[serde(default)]
        from_date: Option<String>,
        #[serde(default)]
        to_date: Option<String>,
    },
    Bare(Vec<(String, f64)>),
}

/// One quarterly GDP sample.
#[derive(Debug, Clone, PartialEq)]
pub struct GdpRecord {
    /// Date exactly as published, e.g. `1947-01-01`.
    pub date_label: String,
    pub date: DateTime<Utc>,
    /// Billions of dollars.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GdpDataset {
    pub records: Vec<GdpRecord>,
    /// Declared time bounds; the record extent when the source omits them.
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
}

impl GdpDataset {
    pub fn load<F: JsonFetcher + ?Sized>(fetcher: &F, locator: &str) -> ChartResult<Self> {
        let document: GdpDocument = fetch_json(fetcher, locator)?;
        Self::from_document(document)
            .map_err(|e| ChartError::data_unavailable(locator, e))
    }

    fn from_document(document: GdpDocument) -> ChartResult<Self> {
        let (data, from_date, to_date) = match document {
            GdpDocument::Full {
                data,
                from_date,
                to_date,
            } => (data, from_date, to_date),
            GdpDocument::Bare(data) => (data, None, None),
        };

        let records = data
            .into_iter()
            .map(|(date_label, value)| {
                let date = parse_utc_date(&date_label)?;
                Ok(GdpRecord {
                    date_label,
                    date,
                    value,
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;

        let first = records.iter().map(|record| record.date).min();
        let last = records.iter().map(|record| record.date).max();
        let from_date = match from_date {
            Some(label) => parse_utc_date(&label)?,
            None => first.ok_or_else(|| {
                ChartError::InvalidData("gdp dataset has no records".to_owned())
            })?,
        };
        let to_date = match to_date {
            Some(label) => parse_utc_date(&label)?,
            None => last.ok_or_else(|| {
                ChartError::InvalidData("gdp dataset has no records".to_owned())
            })?,
        };

        Ok(Self {
            records,
            from_date,
            to_date,
        })
    }
}
