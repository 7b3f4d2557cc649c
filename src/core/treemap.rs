//! Hierarchy layout: ancestor path ids, value summation, ordering and
//! squarified tiling.

use crate::core::types::Rect;
use crate::error::{ChartError, ChartResult};

/// Golden ratio, the default target aspect ratio for squarified rows.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Read access to a hierarchical datum.
pub trait Hierarchical {
    fn name(&self) -> &str;

    /// Value contributed by this node itself; internal nodes usually report 0.
    fn own_value(&self) -> f64;

    fn children(&self) -> &[Self]
    where
        Self: Sized;
}

/// One laid-out node.
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapNode<'a, T> {
    /// Ancestor names joined with the layout separator, root first.
    pub id: String,
    pub depth: usize,
    /// Distance to the deepest descendant leaf.
    pub height: usize,
    /// Own value plus the sum of all descendants.
    pub value: f64,
    pub rect: Rect,
    pub data: &'a T,
    pub parent: Option<usize>,
    children: Vec<usize>,
}

impl<T> TreemapNode<'_, T> {
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Result of a treemap layout pass, stored as a pre-order arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Treemap<'a, T> {
    nodes: Vec<TreemapNode<'a, T>>,
}

impl<'a, T> Treemap<'a, T> {
    #[must_use]
    pub fn root(&self) -> &TreemapNode<'a, T> {
        &self.nodes[0]
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&TreemapNode<'a, T>> {
        self.nodes.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaves in sorted pre-order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&TreemapNode<'a, T>> {
        let mut leaves = Vec::new();
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.is_leaf() {
                leaves.push(node);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        leaves
    }

    /// Leaves below `index` (or the node itself when it is a leaf).
    #[must_use]
    pub fn leaves_under(&self, index: usize) -> Vec<&TreemapNode<'a, T>> {
        let mut leaves = Vec::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.is_leaf() {
                leaves.push(node);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        leaves
    }
}

/// Treemap layout configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapLayout {
    width: f64,
    height: f64,
    ratio: f64,
    separator: String,
}

impl TreemapLayout {
    pub fn new(width: f64, height: f64) -> ChartResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidData(
                "treemap size must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            width,
            height,
            ratio: GOLDEN_RATIO,
            separator: ".".to_owned(),
        })
    }

    pub fn with_ratio(mut self, ratio: f64) -> ChartResult<Self> {
        if !ratio.is_finite() || ratio < 1.0 {
            return Err(ChartError::InvalidData(
                "treemap ratio must be finite and >= 1".to_owned(),
            ));
        }
        self.ratio = ratio;
        Ok(self)
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Builds the hierarchy, sums values, sorts siblings by descending height
    /// then descending value, and tiles every internal node.
    pub fn layout<'a, T: Hierarchical>(&self, root: &'a T) -> ChartResult<Treemap<'a, T>> {
        let mut nodes = Vec::new();
        push_subtree(&mut nodes, root, None, 0, &self.separator)?;

        for index in (0..nodes.len()).rev() {
            let (height, child_sum) = nodes[index]
                .children
                .iter()
                .fold((0usize, 0.0f64), |(height, sum), &child| {
                    let child = &nodes[child];
                    (height.max(child.height + 1), sum + child.value)
                });
            nodes[index].height = height;
            nodes[index].value += child_sum;
        }

        for index in 0..nodes.len() {
            let mut children = std::mem::take(&mut nodes[index].children);
            children.sort_by(|&a, &b| {
                let (a, b) = (&nodes[a], &nodes[b]);
                b.height
                    .cmp(&a.height)
                    .then_with(|| b.value.total_cmp(&a.value))
            });
            nodes[index].children = children;
        }

        nodes[0].rect = Rect::new(0.0, 0.0, self.width, self.height);
        // Pre-order: every parent is positioned before its children.
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let node = &nodes[index];
            if node.children.is_empty() {
                continue;
            }
            let children = node.children.clone();
            let values: Vec<f64> = children.iter().map(|&child| nodes[child].value).collect();
            let rects = squarify(&values, node.value, node.rect, self.ratio);
            for (&child, rect) in children.iter().zip(rects) {
                nodes[child].rect = rect;
            }
            stack.extend(children.iter().rev().copied());
        }

        Ok(Treemap { nodes })
    }
}

fn push_subtree<'a, T: Hierarchical>(
    nodes: &mut Vec<TreemapNode<'a, T>>,
    datum: &'a T,
    parent: Option<usize>,
    depth: usize,
    separator: &str,
) -> ChartResult<usize> {
    let own = datum.own_value();
    let value = if own.is_finite() { own } else { 0.0 };
    if value < 0.0 {
        return Err(ChartError::InvalidData(format!(
            "treemap node `{}` has a negative value",
            datum.name()
        )));
    }

    let id = match parent {
        Some(parent) => format!("{}{separator}{}", nodes[parent].id, datum.name()),
        None => datum.name().to_owned(),
    };
    let index = nodes.len();
    nodes.push(TreemapNode {
        id,
        depth,
        height: 0,
        value,
        rect: Rect::new(0.0, 0.0, 0.0, 0.0),
        data: datum,
        parent,
        children: Vec::new(),
    });

    for child in datum.children() {
        let child_index = push_subtree(nodes, child, Some(index), depth + 1, separator)?;
        nodes[index].children.push(child_index);
    }
    Ok(index)
}

/// Squarified tiling of `values` (already ordered) inside `rect`.
///
/// Rows are grown while the worst aspect ratio keeps improving relative to
/// `ratio`, then laid out along the shorter side.
#[must_use]
pub fn squarify(values: &[f64], total: f64, rect: Rect, ratio: f64) -> Vec<Rect> {
    let n = values.len();
    let mut out = vec![Rect::new(0.0, 0.0, 0.0, 0.0); n];
    let (mut x0, mut y0, x1, y1) = (rect.x0, rect.y0, rect.x1, rect.y1);
    let mut remaining = total;
    let (mut i0, mut i1) = (0usize, 0usize);

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Skip leading empty nodes.
        let mut sum_value;
        loop {
            sum_value = values[i1];
            i1 += 1;
            if sum_value != 0.0 || i1 >= n {
                break;
            }
        }

        let mut min_value = sum_value;
        let mut max_value = sum_value;
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum_value * sum_value * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let node_value = values[i1];
            sum_value += node_value;
            min_value = min_value.min(node_value);
            max_value = max_value.max(node_value);
            beta = sum_value * sum_value * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum_value -= node_value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = i0..i1;
        if dx < dy {
            let row_y1 = if remaining != 0.0 {
                y0 + dy * sum_value / remaining
            } else {
                y1
            };
            dice(&values[row.clone()], sum_value, Rect::new(x0, y0, x1, row_y1), &mut out[row]);
            if remaining != 0.0 {
                y0 = row_y1;
            }
        } else {
            let row_x1 = if remaining != 0.0 {
                x0 + dx * sum_value / remaining
            } else {
                x1
            };
            slice(&values[row.clone()], sum_value, Rect::new(x0, y0, row_x1, y1), &mut out[row]);
            if remaining != 0.0 {
                x0 = row_x1;
            }
        }

        remaining -= sum_value;
        i0 = i1;
    }
    out
}

/// Lays a row out left to right, full height.
fn dice(values: &[f64], total: f64, rect: Rect, out: &mut [Rect]) {
    let k = if total != 0.0 {
        rect.width() / total
    } else {
        0.0
    };
    let mut x = rect.x0;
    for (value, slot) in values.iter().zip(out.iter_mut()) {
        let next = x + value * k;
        *slot = Rect::new(x, rect.y0, next, rect.y1);
        x = next;
    }
}

/// Lays a row out top to bottom, full width.
fn slice(values: &[f64], total: f64, rect: Rect, out: &mut [Rect]) {
    let k = if total != 0.0 {
        rect.height() / total
    } else {
        0.0
    };
    let mut y = rect.y0;
    for (value, slot) in values.iter().zip(out.iter_mut()) {
        let next = y + value * k;
        *slot = Rect::new(rect.x0, y, rect.x1, next);
        y = next;
    }
}
