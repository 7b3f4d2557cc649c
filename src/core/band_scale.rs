use std::hash::Hash;

use indexmap::IndexSet;

use crate::error::{ChartError, ChartResult};

/// Ordinal scale splitting a continuous pixel range into equal-width bands.
///
/// Categories keep first-seen order and duplicates collapse. When the range is
/// reversed (`start > end`) the band order is reversed as well, so the first
/// category sits at the far end of the range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<K: Eq + Hash> {
    domain: IndexSet<K>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    step: f64,
    bandwidth: f64,
    starts: Vec<f64>,
}

impl<K: Eq + Hash + Clone> BandScale<K> {
    pub fn new<I>(domain: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = K>,
    {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "band range must be finite".to_owned(),
            ));
        }
        let mut scale = Self {
            domain: domain.into_iter().collect(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            step: 0.0,
            bandwidth: 0.0,
            starts: Vec::new(),
        };
        scale.rescale();
        Ok(scale)
    }

    /// Sets inner and outer padding to the same ratio.
    pub fn with_padding(self, padding: f64) -> ChartResult<Self> {
        self.with_paddings(padding, padding)
    }

    /// Inner padding must lie in `[0, 1]`; outer padding must be `>= 0`.
    pub fn with_paddings(mut self, inner: f64, outer: f64) -> ChartResult<Self> {
        if !inner.is_finite() || !(0.0..=1.0).contains(&inner) {
            return Err(ChartError::InvalidData(
                "band inner padding must be finite and in [0, 1]".to_owned(),
            ));
        }
        if !outer.is_finite() || outer < 0.0 {
            return Err(ChartError::InvalidData(
                "band outer padding must be finite and >= 0".to_owned(),
            ));
        }
        self.padding_inner = inner;
        self.padding_outer = outer;
        self.rescale();
        Ok(self)
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let reverse = self.range.1 < self.range.0;
        let (mut start, stop) = if reverse {
            (self.range.1, self.range.0)
        } else {
            self.range
        };

        self.step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        start += (stop - start - self.step * (n - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);

        let step = self.step;
        self.starts = (0..self.domain.len())
            .map(|i| start + step * i as f64)
            .collect();
        if reverse {
            self.starts.reverse();
        }
    }

    /// Start coordinate of the band for `key`, if the key is in the domain.
    #[must_use]
    pub fn map(&self, key: &K) -> Option<f64> {
        self.domain
            .get_index_of(key)
            .and_then(|index| self.starts.get(index).copied())
    }

    /// Center coordinate of the band for `key`.
    #[must_use]
    pub fn center(&self, key: &K) -> Option<f64> {
        self.map(key).map(|start| start + self.bandwidth * 0.5)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn domain(&self) -> impl Iterator<Item = &K> {
        self.domain.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }
}
