use std::hash::Hash;

use indexmap::IndexSet;

use crate::error::{ChartError, ChartResult};

/// Discrete scale assigning outputs to categories in first-seen order.
///
/// Outputs are reused cyclically once there are more categories than outputs.
/// The domain is fixed at construction; unknown keys map to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale<K: Eq + Hash, T> {
    domain: IndexSet<K>,
    outputs: Vec<T>,
}

impl<K: Eq + Hash, T> OrdinalScale<K, T> {
    pub fn new<I>(domain: I, outputs: Vec<T>) -> ChartResult<Self>
    where
        I: IntoIterator<Item = K>,
    {
        if outputs.is_empty() {
            return Err(ChartError::InvalidData(
                "ordinal scale needs at least one output".to_owned(),
            ));
        }
        Ok(Self {
            domain: domain.into_iter().collect(),
            outputs,
        })
    }

    #[must_use]
    pub fn map(&self, key: &K) -> Option<&T> {
        let index = self.domain.get_index_of(key)?;
        self.outputs.get(index % self.outputs.len())
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
