use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::scale::extent;
use crate::error::{ChartError, ChartResult};

/// Lower/upper bound of one threshold bucket. `None` means open-ended.
pub type BucketExtent = (Option<f64>, Option<f64>);

/// Maps a continuous value onto one of `N` discrete outputs through `N - 1`
/// ascending cut points.
///
/// Bucket `i` covers `[thresholds[i - 1], thresholds[i])`; the first bucket has
/// no lower bound and the last has no upper bound. Equal adjacent cut points
/// leave the bucket between them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdScale<T> {
    thresholds: Vec<f64>,
    outputs: Vec<T>,
}

impl<T: Clone> ThresholdScale<T> {
    /// Builds a scale from explicit, non-decreasing cut points.
    pub fn new(thresholds: Vec<f64>, outputs: Vec<T>) -> ChartResult<Self> {
        if outputs.is_empty() {
            return Err(ChartError::InvalidData(
                "threshold scale needs at least one output".to_owned(),
            ));
        }
        if thresholds.len() + 1 != outputs.len() {
            return Err(ChartError::InvalidData(format!(
                "threshold scale needs {} cut points for {} outputs, got {}",
                outputs.len() - 1,
                outputs.len(),
                thresholds.len()
            )));
        }
        if thresholds.iter().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(
                "threshold cut points must be finite".to_owned(),
            ));
        }
        if thresholds.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(ChartError::InvalidData(
                "threshold cut points must be ascending".to_owned(),
            ));
        }
        Ok(Self {
            thresholds,
            outputs,
        })
    }

    /// Splits the observed `[min, max]` of `values` into `outputs.len()` equal
    /// steps and keeps only the interior boundaries as cut points.
    ///
    /// A flat extent is widened by half a unit on each side.
    pub fn from_values<I>(values: I, outputs: Vec<T>) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = extent(values)?;
        Self::from_extent(min, max, outputs)
    }

    pub fn from_extent(min: f64, max: f64, outputs: Vec<T>) -> ChartResult<Self> {
        if outputs.is_empty() {
            return Err(ChartError::InvalidData(
                "threshold scale needs at least one output".to_owned(),
            ));
        }
        let (min, max) = normalize_extent(min, max)?;
        let buckets = outputs.len();
        let step = (max - min) / buckets as f64;
        let thresholds: Vec<f64> = (1..buckets).map(|i| min + i as f64 * step).collect();
        if thresholds.windows(2).any(|pair| pair[0] == pair[1]) {
            warn!(
                min,
                max,
                buckets,
                "threshold step below float resolution; some buckets are empty"
            );
        }
        Self::new(thresholds, outputs)
    }

    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    #[must_use]
    pub fn outputs(&self) -> &[T] {
        &self.outputs
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.outputs.len()
    }

    /// Index of the bucket containing `value`.
    #[must_use]
    pub fn bucket(&self, value: f64) -> usize {
        self.thresholds.partition_point(|threshold| *threshold <= value)
    }

    #[must_use]
    pub fn map(&self, value: f64) -> &T {
        &self.outputs[self.bucket(value)]
    }

    /// Inverse lookup of bucket `index`; `None` for an out-of-range index.
    #[must_use]
    pub fn invert_extent(&self, index: usize) -> Option<BucketExtent> {
        if index >= self.outputs.len() {
            return None;
        }
        let lower = index
            .checked_sub(1)
            .and_then(|i| self.thresholds.get(i))
            .copied();
        let upper = self.thresholds.get(index).copied();
        Some((lower, upper))
    }
}

impl<T: Clone + PartialEq> ThresholdScale<T> {
    /// Inverse lookup by output value, matching the first bucket emitting it.
    #[must_use]
    pub fn invert_extent_of(&self, output: &T) -> Option<BucketExtent> {
        let index = self.outputs.iter().position(|candidate| candidate == output)?;
        self.invert_extent(index)
    }
}

fn normalize_extent(min: f64, max: f64) -> ChartResult<(f64, f64)> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ChartError::InvalidData(
            "threshold extent must be finite".to_owned(),
        ));
    }
    if min == max {
        return Ok((min - 0.5, max + 0.5));
    }
    Ok((min.min(max), min.max(max)))
}
