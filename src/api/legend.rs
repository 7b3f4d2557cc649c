//! Legend construction for threshold, ordinal and symbol encodings.

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::api::axis::{AxisOrient, AxisTick, axis_group};
use crate::api::config::OrdinalLegendConfig;
use crate::core::{BandScale, BucketExtent, OrdinalScale, ThresholdScale, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, FrameGroup, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

const LABEL_FONT_SIZE: f64 = 12.0;

/// One bucket of a threshold legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendCell {
    pub extent: BucketExtent,
    pub color: Color,
    pub x: f64,
    /// Zero for open-ended buckets.
    pub width: f64,
}

/// Color strip for a threshold scale: one cell per bucket, cut points as ticks.
///
/// Cells and ticks are positioned by a band scale over the cut points with
/// padding 1, so the first and last bucket collapse to zero width.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdLegend {
    pub cells: Vec<LegendCell>,
    pub ticks: Vec<AxisTick>,
    range: (f64, f64),
}

impl ThresholdLegend {
    pub fn build<F>(scale: &ThresholdScale<Color>, range: (f64, f64), format: F) -> ChartResult<Self>
    where
        F: Fn(f64) -> String,
    {
        let band = BandScale::new(scale.thresholds().iter().copied().map(OrderedFloat), range)?
            .with_padding(1.0)?;
        let position = |value: f64| band.map(&OrderedFloat(value));

        let cells = (0..scale.bucket_count())
            .map(|index| {
                let extent = scale.invert_extent(index).ok_or_else(|| {
                    ChartError::InvalidData(format!("legend bucket {index} out of range"))
                })?;
                let (x, width) = match extent {
                    (Some(lower), Some(upper)) => {
                        let x0 = position(lower).unwrap_or(range.0);
                        let x1 = position(upper).unwrap_or(x0);
                        (x0, (x1 - x0).max(0.0))
                    }
                    (Some(bound), None) | (None, Some(bound)) => {
                        (position(bound).unwrap_or(range.0), 0.0)
                    }
                    (None, None) => (range.0, 0.0),
                };
                Ok(LegendCell {
                    extent,
                    color: scale.outputs()[index],
                    x,
                    width,
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;

        let ticks = scale
            .thresholds()
            .iter()
            .filter_map(|&value| {
                position(value).map(|position| AxisTick {
                    position,
                    label: format(value),
                })
            })
            .collect();

        debug!(buckets = cells.len(), "threshold legend built");
        Ok(Self {
            cells,
            ticks,
            range,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Swatch group (`legend`) and its tick axis (`legend-axis`).
    #[must_use]
    pub fn to_groups(
        &self,
        cell_height: f64,
        swatch_translate: (f64, f64),
        axis_translate: (f64, f64),
    ) -> (FrameGroup, FrameGroup) {
        let mut swatches = FrameGroup::new()
            .with_id("legend")
            .with_translate(swatch_translate.0, swatch_translate.1);
        swatches.rects = self
            .cells
            .iter()
            .map(|cell| RectPrimitive::new(cell.x, 0.0, cell.width, cell_height, cell.color))
            .collect();

        let axis = axis_group(
            "legend-axis",
            AxisOrient::Bottom,
            axis_translate,
            self.range,
            &self.ticks,
        );
        (swatches, axis)
    }
}

/// Detached legend surface for an ordinal color scale: fixed-column grid of
/// swatches and labels, row-major, in the order `categories` are given.
pub fn ordinal_legend_frame(
    categories: &[String],
    colors: &OrdinalScale<String, Color>,
    width: f64,
    config: OrdinalLegendConfig,
) -> ChartResult<RenderFrame> {
    if config.columns == 0 {
        return Err(ChartError::InvalidData(
            "legend needs at least one column".to_owned(),
        ));
    }
    if !width.is_finite() || width <= 0.0 {
        return Err(ChartError::InvalidData(
            "legend width must be finite and > 0".to_owned(),
        ));
    }
    let rows = categories.len().div_ceil(config.columns).max(1);
    let item_width = width / config.columns as f64;
    let height = config.item_height * rows as f64;

    let mut group = FrameGroup::new();
    for (index, category) in categories.iter().enumerate() {
        let x = (index % config.columns) as f64 * item_width;
        let y = (index / config.columns) as f64 * config.item_height;
        let fill = colors.map(category).copied().ok_or_else(|| {
            ChartError::InvalidData(format!("legend category `{category}` has no color"))
        })?;
        group.rects.push(
            RectPrimitive::new(x, y, config.swatch_size, config.swatch_size, fill)
                .with_class("legend-item"),
        );
        if !category.is_empty() {
            group.texts.push(TextPrimitive::new(
                category.clone(),
                x + config.swatch_size + 4.0,
                y + config.swatch_size - 2.0,
                LABEL_FONT_SIZE,
                Color::BLACK,
                TextHAlign::Left,
            ));
        }
    }

    let viewport = Viewport::new(width.round() as u32, height.round() as u32).validate()?;
    Ok(RenderFrame::new(viewport).with_id("legend").with_group(group))
}

/// One marker-and-label row of a symbol legend.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub stroke: Color,
    pub label: String,
}

/// Vertical list of outlined markers with right-aligned labels to their left.
#[must_use]
pub fn symbol_legend(
    entries: &[SymbolEntry],
    anchor: (f64, f64),
    radius: f64,
    row_gap: f64,
) -> FrameGroup {
    let mut group = FrameGroup::new().with_id("legend");
    for (row, entry) in entries.iter().enumerate() {
        let cy = anchor.1 + row as f64 * row_gap;
        group
            .circles
            .push(CirclePrimitive::outlined(anchor.0, cy, radius, entry.stroke, 2.0));
        group.texts.push(TextPrimitive::new(
            entry.label.clone(),
            anchor.0 - radius * 2.0,
            cy + 4.0,
            LABEL_FONT_SIZE,
            Color::BLACK,
            TextHAlign::Right,
        ));
    }
    group
}
