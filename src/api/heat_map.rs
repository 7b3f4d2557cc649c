use tracing::debug;

use crate::api::axis::{AxisOrient, axis_group, band_ticks};
use crate::api::config::{HeatMapConfig, parse_palette};
use crate::api::format::{celsius, month_name, month_year, one_decimal, plain_number};
use crate::api::legend::ThresholdLegend;
use crate::api::{ChartPage, LegendPlacement};
use crate::core::{BandScale, ThresholdScale, Viewport, extent};
use crate::data::temperature::TemperatureDataset;
use crate::data::{DataSource, JsonFetcher};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{TooltipContent, TooltipPlacement};
use crate::render::{Color, ElementId, FrameGroup, Shape, VisualElement};

/// Monthly global land-surface temperature, one cell per month and year.
#[derive(Debug, Clone)]
pub struct HeatMapPage {
    config: HeatMapConfig,
    source: DataSource,
    palette: Vec<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatScales {
    /// Years in first-seen order.
    pub x: BandScale<i32>,
    /// Zero-based months, December first, on a bottom-to-top range.
    pub y: BandScale<u32>,
    pub color: ThresholdScale<Color>,
}

impl HeatMapPage {
    pub fn new(config: HeatMapConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        config.padding.validate()?;
        config.tooltip.validate()?;
        if config.year_tick_every <= 0 {
            return Err(ChartError::InvalidData(
                "year tick interval must be > 0".to_owned(),
            ));
        }
        let palette = parse_palette(&config.palette)?;
        Ok(Self {
            source: DataSource::new(config.data_url.clone()),
            config,
            palette,
        })
    }

    #[must_use]
    pub fn with_source(mut self, locator: Option<String>) -> Self {
        self.source = self.source.with_override(locator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &HeatMapConfig {
        &self.config
    }

    fn chart_height(&self) -> f64 {
        self.config.viewport.height_f64()
    }
}

impl ChartPage for HeatMapPage {
    type Data = TemperatureDataset;
    type Scales = HeatScales;

    fn title(&self) -> String {
        "Monthly Global Land-Surface Temperature".to_owned()
    }

    fn description(&self) -> Option<String> {
        Some("Variance from the base temperature, by month and year".to_owned())
    }

    /// Cell area plus the legend strip below it.
    fn viewport(&self) -> Viewport {
        let legend = self.config.legend;
        let extra = (legend.height + legend.padding).max(0.0).round() as u32;
        Viewport::new(
            self.config.viewport.width,
            self.config.viewport.height + extra,
        )
    }

    fn fetch<F: JsonFetcher + ?Sized>(&self, fetcher: &F) -> ChartResult<TemperatureDataset> {
        TemperatureDataset::load(fetcher, self.source.locator())
    }

    fn build_scales(&self, data: &TemperatureDataset) -> ChartResult<HeatScales> {
        let viewport = self.config.viewport;
        let padding = self.config.padding;
        let x = BandScale::new(
            data.monthly_variance.iter().map(|record| record.year),
            padding.x_range(viewport),
        )?;
        let y = BandScale::new((0..12).rev(), padding.y_range(viewport))?;

        let (min, max) = extent(
            data.monthly_variance
                .iter()
                .map(|record| data.temperature(record)),
        )?;
        let color = ThresholdScale::from_extent(min, max, self.palette.clone())?;
        debug!(
            years = x.len(),
            min,
            max,
            buckets = color.bucket_count(),
            "heat map scales built"
        );
        Ok(HeatScales { x, y, color })
    }

    fn render_shapes(
        &self,
        data: &TemperatureDataset,
        scales: &HeatScales,
    ) -> ChartResult<Vec<VisualElement>> {
        data.monthly_variance
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let month0 = record.month.checked_sub(1).ok_or_else(|| {
                    ChartError::InvalidData(format!("month {} out of range", record.month))
                })?;
                let (Some(x), Some(y)) = (scales.x.map(&record.year), scales.y.map(&month0)) else {
                    return Err(ChartError::InvalidData(format!(
                        "no cell for {}-{:02}",
                        record.year, record.month
                    )));
                };
                let temperature = data.temperature(record);
                let shape = Shape::Rect {
                    x,
                    y,
                    width: scales.x.bandwidth(),
                    height: scales.y.bandwidth(),
                };
                let element = VisualElement::new(ElementId(index), index, shape, "cell")
                    .with_fill(*scales.color.map(temperature))
                    .with_data("month", month0)
                    .with_data("year", record.year)
                    .with_data("temp", plain_number(temperature));
                element.validate()?;
                Ok(element)
            })
            .collect()
    }

    fn render_legend(
        &self,
        _data: &TemperatureDataset,
        scales: &HeatScales,
        _elements: &[VisualElement],
    ) -> ChartResult<LegendPlacement> {
        let legend = self.config.legend;
        let strip = ThresholdLegend::build(
            &scales.color,
            (self.config.padding.left, legend.width),
            one_decimal,
        )?;
        let chart_height = self.chart_height();
        let (swatches, axis) =
            strip.to_groups(legend.height, (0.0, chart_height), (0.0, chart_height + legend.height));
        Ok(LegendPlacement::Inline(vec![axis, swatches]))
    }

    fn render_axes(
        &self,
        _data: &TemperatureDataset,
        scales: &HeatScales,
    ) -> ChartResult<Vec<FrameGroup>> {
        let padding = self.config.padding;
        let every = self.config.year_tick_every;
        let x_ticks = band_ticks(&scales.x, |year| year % every == 0, ToString::to_string);
        let y_ticks = band_ticks(
            &scales.y,
            |_| true,
            |month| month_name(*month).unwrap_or_default().to_owned(),
        );
        Ok(vec![
            axis_group(
                "x-axis",
                AxisOrient::Bottom,
                (0.0, self.chart_height() - padding.bottom),
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

    /// Sits one month band above the pointer.
    fn tooltip_placement(&self, scales: &HeatScales) -> TooltipPlacement {
        TooltipPlacement {
            offset_y: self.config.tooltip.offset_y - scales.y.bandwidth(),
            ..self.config.tooltip
        }
    }

    fn tooltip(
        &self,
        data: &TemperatureDataset,
        _scales: &HeatScales,
        element: &VisualElement,
    ) -> ChartResult<TooltipContent> {
        let record = data.monthly_variance.get(element.record).ok_or_else(|| {
            ChartError::InvalidData(format!(
                "cell element refers to missing record {}",
                element.record
            ))
        })?;
        let month0 = record.month.saturating_sub(1);
        Ok(TooltipContent::from_lines([
            month_year(record.year, month0)?,
            celsius(data.temperature(record)),
            celsius(record.variance),
        ])
        .with_data("year", record.year))
    }
}
