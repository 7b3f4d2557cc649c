use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Fetch or parse failure for a page dataset. The page stays in its
    /// loading state.
    #[error("data unavailable from `{locator}`: {reason}")]
    DataUnavailable { locator: String, reason: String },

    /// Auxiliary lookup failure. Callers fall back to the raw identifier.
    #[error("lookup failed for `{key}`: {reason}")]
    LookupFailed { key: String, reason: String },
}

impl ChartError {
    pub(crate) fn data_unavailable(locator: &str, reason: impl std::fmt::Display) -> Self {
        Self::DataUnavailable {
            locator: locator.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn lookup_failed(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::LookupFailed {
            key: key.to_owned(),
            reason: reason.to_string(),
        }
    }
}
