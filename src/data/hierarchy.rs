use serde::Deserialize;

use crate::core::Hierarchical;
use crate::data::{JsonFetcher, LenientNumber, fetch_json};
use crate::error::ChartResult;

/// Node of a `{name, children}` / `{name, category, value}` tree.
///
/// Leaf values are often published as strings; they decode leniently.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub value: LenientNumber,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn load<F: JsonFetcher + ?Sized>(fetcher: &F, locator: &str) -> ChartResult<Self> {
        fetch_json(fetcher, locator)
    }

    /// Category label, falling back to the node name.
    #[must_use]
    pub fn category_or_name(&self) -> &str {
        self.category.as_deref().unwrap_or(&self.name)
    }
}

impl Hierarchical for TreeNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn own_value(&self) -> f64 {
        self.value.0
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}
