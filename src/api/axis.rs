//! Axis primitives for continuous and band charts.

use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::core::{BandScale, LinearScale, TimeScale};
use crate::render::{Color, FrameGroup, LinePrimitive, TextHAlign, TextPrimitive};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const FONT_SIZE: f64 = 10.0;
const STROKE_WIDTH: f64 = 1.0;

/// Side of the plot area an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

/// One labeled tick in scale-range coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Ticks of a linear scale at nice values.
pub fn linear_ticks<F>(scale: LinearScale, count: usize, format: F) -> Vec<AxisTick>
where
    F: Fn(f64) -> String,
{
    scale
        .ticks(count)
        .into_iter()
        .map(|value| AxisTick {
            position: scale.map(value),
            label: format(value),
        })
        .collect()
}

/// Calendar-aligned ticks of a time scale.
pub fn time_ticks<F>(scale: TimeScale, count: usize, format: F) -> Vec<AxisTick>
where
    F: Fn(DateTime<Utc>) -> String,
{
    scale
        .ticks(count)
        .into_iter()
        .map(|time| AxisTick {
            position: scale.map(time),
            label: format(time),
        })
        .collect()
}

/// One tick per accepted band, centered on the band.
pub fn band_ticks<K, P, F>(scale: &BandScale<K>, accept: P, format: F) -> Vec<AxisTick>
where
    K: Eq + Hash + Clone,
    P: Fn(&K) -> bool,
    F: Fn(&K) -> String,
{
    scale
        .domain()
        .filter(|key| accept(key))
        .filter_map(|key| {
            scale.center(key).map(|position| AxisTick {
                position,
                label: format(key),
            })
        })
        .collect()
}

/// Domain line, tick marks and labels translated to the axis origin.
///
/// `range` is the pixel extent of the scale along the axis direction.
#[must_use]
pub fn axis_group(
    id: &str,
    orient: AxisOrient,
    translate: (f64, f64),
    range: (f64, f64),
    ticks: &[AxisTick],
) -> FrameGroup {
    let color = Color::BLACK;
    let mut group = FrameGroup::new()
        .with_id(id)
        .with_translate(translate.0, translate.1);

    match orient {
        AxisOrient::Bottom => {
            group
                .lines
                .push(LinePrimitive::new(range.0, 0.0, range.1, 0.0, STROKE_WIDTH, color));
            for tick in ticks {
                group.lines.push(LinePrimitive::new(
                    tick.position,
                    0.0,
                    tick.position,
                    TICK_SIZE,
                    STROKE_WIDTH,
                    color,
                ));
                group.texts.push(TextPrimitive::new(
                    tick.label.clone(),
                    tick.position,
                    TICK_SIZE + TICK_PADDING + FONT_SIZE,
                    FONT_SIZE,
                    color,
                    TextHAlign::Center,
                ));
            }
        }
        AxisOrient::Left => {
            group
                .lines
                .push(LinePrimitive::new(0.0, range.0, 0.0, range.1, STROKE_WIDTH, color));
            for tick in ticks {
                group.lines.push(LinePrimitive::new(
                    -TICK_SIZE,
                    tick.position,
                    0.0,
                    tick.position,
                    STROKE_WIDTH,
                    color,
                ));
                group.texts.push(TextPrimitive::new(
                    tick.label.clone(),
                    -(TICK_SIZE + TICK_PADDING),
                    tick.position + FONT_SIZE * 0.32,
                    FONT_SIZE,
                    color,
                    TextHAlign::Right,
                ));
            }
        }
    }
    // Empty labels would fail text validation.
    group.texts.retain(|text| !text.text.is_empty());
    group
}
