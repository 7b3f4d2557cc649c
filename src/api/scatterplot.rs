use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

use crate::api::axis::{AxisOrient, axis_group, time_ticks};
use crate::api::config::ScatterplotConfig;
use crate::api::format::minutes_seconds;
use crate::api::legend::{SymbolEntry, symbol_legend};
use crate::api::{ChartPage, LegendPlacement};
use crate::core::primitives::{to_iso_string, utc_date};
use crate::core::{TimeScale, Viewport, extent, multi_scale_format};
use crate::data::cyclists::{RiderRecord, load_riders};
use crate::data::geocode::{FlagLookup, RestCountriesLookup, flag_or_code};
use crate::data::{DataSource, JsonFetcher};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{TooltipContent, TooltipPlacement};
use crate::render::{Color, ElementId, FrameGroup, Shape, VisualElement, escape_xml};

/// Fastest Alpe d'Huez ascents, split by doping allegations.
pub struct ScatterplotPage<L = RestCountriesLookup> {
    config: ScatterplotConfig,
    source: DataSource,
    lookup: L,
    clean_color: Color,
    doping_color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterScales {
    /// January 1st of each year, padded by one year on both sides.
    pub x: TimeScale,
    /// Ride time as an instant after the reference midnight; slowest at the bottom.
    pub y: TimeScale,
}

/// Midnight UTC, 31 December 1899: the zero of the ride-time axis.
fn ride_time_origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1899, 12, 31, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Ride time of `seconds` as an instant on the y axis.
#[must_use]
pub fn ride_time(seconds: u32) -> DateTime<Utc> {
    ride_time_origin() + Duration::seconds(i64::from(seconds))
}

impl<L: FlagLookup> ScatterplotPage<L> {
    pub fn new(config: ScatterplotConfig, lookup: L) -> ChartResult<Self> {
        config.viewport.validate()?;
        config.padding.validate()?;
        config.tooltip.validate()?;
        if !config.dot_radius.is_finite() || config.dot_radius <= 0.0 {
            return Err(ChartError::InvalidData(
                "dot radius must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            source: DataSource::new(config.data_url.clone()),
            clean_color: Color::from_hex(&config.clean_color)?,
            doping_color: Color::from_hex(&config.doping_color)?,
            lookup,
            config,
        })
    }

    #[must_use]
    pub fn with_source(mut self, locator: Option<String>) -> Self {
        self.source = self.source.with_override(locator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ScatterplotConfig {
        &self.config
    }
}

impl<L: FlagLookup> ChartPage for ScatterplotPage<L> {
    type Data = Vec<RiderRecord>;
    type Scales = ScatterScales;

    fn title(&self) -> String {
        "Doping in Professional Bicycle Racing".to_owned()
    }

    fn description(&self) -> Option<String> {
        Some("35 Fastest times up Alpe d'Huez".to_owned())
    }

    fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    fn fetch<F: JsonFetcher + ?Sized>(&self, fetcher: &F) -> ChartResult<Vec<RiderRecord>> {
        load_riders(fetcher, self.source.locator())
    }

    fn build_scales(&self, data: &Vec<RiderRecord>) -> ChartResult<ScatterScales> {
        let viewport = self.config.viewport;
        let padding = self.config.padding;

        let (first_year, last_year) = extent(data.iter().map(|rider| f64::from(rider.year)))?;
        let x = TimeScale::new(
            (
                utc_date(first_year as i32 - 1, 1, 1)?,
                utc_date(last_year as i32 + 1, 1, 1)?,
            ),
            padding.x_range(viewport),
        )?;

        let (fastest, slowest) = extent(data.iter().map(|rider| f64::from(rider.seconds)))?;
        let y = TimeScale::new(
            (ride_time(slowest as u32), ride_time(fastest as u32)),
            padding.y_range(viewport),
        )?;
        debug!(riders = data.len(), first_year, last_year, "scatter scales built");
        Ok(ScatterScales { x, y })
    }

    fn render_shapes(
        &self,
        data: &Vec<RiderRecord>,
        scales: &ScatterScales,
    ) -> ChartResult<Vec<VisualElement>> {
        data.iter()
            .enumerate()
            .map(|(index, rider)| {
                let year_start = utc_date(rider.year, 1, 1)?;
                let time = ride_time(rider.seconds);
                let (class, stroke) = if rider.has_doping_allegation() {
                    ("dot doping", self.doping_color)
                } else {
                    ("dot clean", self.clean_color)
                };
                let shape = Shape::Circle {
                    cx: scales.x.map(year_start),
                    cy: scales.y.map(time),
                    radius: self.config.dot_radius,
                };
                let element = VisualElement::new(ElementId(index), index, shape, class)
                    .with_fill(Color::WHITE)
                    .with_stroke(stroke)
                    .with_data("xvalue", to_iso_string(year_start))
                    .with_data("yvalue", to_iso_string(time));
                element.validate()?;
                Ok(element)
            })
            .collect()
    }

    fn render_legend(
        &self,
        _data: &Vec<RiderRecord>,
        _scales: &ScatterScales,
        _elements: &[VisualElement],
    ) -> ChartResult<LegendPlacement> {
        let viewport = self.config.viewport;
        let anchor = (
            viewport.width_f64() - self.config.padding.right,
            viewport.height_f64() / 2.0 - 20.0,
        );
        let entries = [
            SymbolEntry {
                stroke: self.clean_color,
                label: "No doping allegations".to_owned(),
            },
            SymbolEntry {
                stroke: self.doping_color,
                label: "Riders with doping allegations".to_owned(),
            },
        ];
        Ok(LegendPlacement::Inline(vec![symbol_legend(
            &entries,
            anchor,
            self.config.dot_radius,
            24.0,
        )]))
    }

    fn render_axes(
        &self,
        _data: &Vec<RiderRecord>,
        scales: &ScatterScales,
    ) -> ChartResult<Vec<FrameGroup>> {
        let viewport = self.config.viewport;
        let padding = self.config.padding;
        let x_ticks = time_ticks(scales.x, self.config.x_tick_count, multi_scale_format);
        let y_ticks = time_ticks(scales.y, self.config.y_tick_count, minutes_seconds);
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

    fn tooltip_placement(&self, _scales: &ScatterScales) -> TooltipPlacement {
        self.config.tooltip
    }

    /// Resolves the rider's flag on every hover; failures fall back to the code.
    fn tooltip(
        &self,
        data: &Vec<RiderRecord>,
        _scales: &ScatterScales,
        element: &VisualElement,
    ) -> ChartResult<TooltipContent> {
        let rider = data.get(element.record).ok_or_else(|| {
            ChartError::InvalidData(format!(
                "dot element refers to missing record {}",
                element.record
            ))
        })?;
        let flag = flag_or_code(&self.lookup, &rider.nationality);
        let mut lines = vec![
            format!("{} {}", escape_xml(&rider.name), escape_xml(&flag)),
            format!(
                "<b>Year:</b> {}, <b>Time:</b> {}",
                rider.year,
                escape_xml(&rider.time)
            ),
        ];
        if rider.has_doping_allegation() {
            lines.push(format!("<i>{}</i>", escape_xml(&rider.doping)));
        }
        Ok(TooltipContent::from_lines(lines)
            .with_data("year", to_iso_string(utc_date(rider.year, 1, 1)?)))
    }
}
