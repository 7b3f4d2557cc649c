use std::time::Duration;

use tracing::debug;

use crate::api::axis::{AxisOrient, axis_group, linear_ticks, time_ticks};
use crate::api::config::BarChartConfig;
use crate::api::format::{currency, month_year_of, plain_number};
use crate::api::ChartPage;
use crate::core::{LinearScale, TimeScale, Viewport, multi_scale_format};
use crate::data::gdp::GdpDataset;
use crate::data::{DataSource, JsonFetcher};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{TooltipContent, TooltipPlacement};
use crate::render::{Color, ElementId, FrameGroup, PointerHandlers, Shape, VisualElement};

/// Quarterly US GDP as one bar per quarter.
#[derive(Debug, Clone)]
pub struct BarChartPage {
    config: BarChartConfig,
    source: DataSource,
    bar_color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarScales {
    pub x: TimeScale,
    pub y: LinearScale,
}

impl BarChartPage {
    pub fn new(config: BarChartConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        config.padding.validate()?;
        config.tooltip.validate()?;
        let bar_color = Color::from_hex(&config.bar_color)?;
        Ok(Self {
            source: DataSource::new(config.data_url.clone()),
            config,
            bar_color,
        })
    }

    /// Replaces the dataset locator, e.g. with a fixture path.
    #[must_use]
    pub fn with_source(mut self, locator: Option<String>) -> Self {
        self.source = self.source.with_override(locator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &BarChartConfig {
        &self.config
    }
}

impl ChartPage for BarChartPage {
    type Data = GdpDataset;
    type Scales = BarScales;

    fn title(&self) -> String {
        "United States GDP".to_owned()
    }

    fn description(&self) -> Option<String> {
        Some("Gross domestic product, billions of dollars, seasonally adjusted".to_owned())
    }

    fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    fn fetch<F: JsonFetcher + ?Sized>(&self, fetcher: &F) -> ChartResult<GdpDataset> {
        GdpDataset::load(fetcher, self.source.locator())
    }

    fn build_scales(&self, data: &GdpDataset) -> ChartResult<BarScales> {
        let viewport = self.config.viewport;
        let x = TimeScale::new(
            (data.from_date, data.to_date),
            self.config.padding.x_range(viewport),
        )?;
        let max = data
            .records
            .iter()
            .map(|record| record.value)
            .filter(|value| value.is_finite())
            .fold(None, |acc: Option<f64>, value| {
                Some(acc.map_or(value, |current| current.max(value)))
            })
            .ok_or_else(|| ChartError::InvalidData("gdp dataset has no values".to_owned()))?;
        let y = LinearScale::new((0.0, max), self.config.padding.y_range(viewport))?;
        debug!(records = data.records.len(), max, "bar scales built");
        Ok(BarScales { x, y })
    }

    fn render_shapes(&self, data: &GdpDataset, scales: &BarScales) -> ChartResult<Vec<VisualElement>> {
        let viewport = self.config.viewport;
        let bar_width = viewport.width_f64() / data.records.len().max(1) as f64;
        let baseline = viewport.height_f64() - self.config.padding.bottom;

        data.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let y = scales.y.map(record.value);
                let shape = Shape::Rect {
                    x: scales.x.map(record.date),
                    y,
                    width: bar_width,
                    height: (baseline - y).max(0.0),
                };
                let element = VisualElement::new(ElementId(index), index, shape, "bar")
                    .with_fill(self.bar_color)
                    .with_handlers(PointerHandlers::HOVER_AND_CLICK)
                    .with_data("date", &record.date_label)
                    .with_data("gdp", plain_number(record.value));
                element.validate()?;
                Ok(element)
            })
            .collect()
    }

    fn render_axes(&self, _data: &GdpDataset, scales: &BarScales) -> ChartResult<Vec<FrameGroup>> {
        let viewport = self.config.viewport;
        let padding = self.config.padding;
        let x_ticks = time_ticks(scales.x, self.config.x_tick_count, multi_scale_format);
        let y_ticks = linear_ticks(scales.y, self.config.y_tick_count, plain_number);
        Ok(vec![
            axis_group(
                "x-axis",
                AxisOrient::Bottom,
                (0.0, viewport.height_f64() - padding.bottom),
                scales.x.range(),
                &x_ticks,
            ),
            axis_group(
                "y-axis",
                AxisOrient::Left,
                (padding.left, 0.0),
                scales.y.range(),
                &y_ticks,
            ),
        ])
    }

    fn tooltip_placement(&self, _scales: &BarScales) -> TooltipPlacement {
        self.config.tooltip
    }

    fn tooltip(
        &self,
        data: &GdpDataset,
        _scales: &BarScales,
        element: &VisualElement,
    ) -> ChartResult<TooltipContent> {
        let record = data.records.get(element.record).ok_or_else(|| {
            ChartError::InvalidData(format!("bar element refers to missing record {}", element.record))
        })?;
        Ok(TooltipContent::from_lines([
            month_year_of(record.date),
            format!("{} Billion", currency(record.value)?),
        ])
        .with_data("date", &record.date_label))
    }

    fn revert_delay(&self) -> Duration {
        Duration::from_millis(self.config.highlight_delay_ms)
    }
}
