use tracing::debug;

use crate::api::config::{ChoroplethConfig, parse_palette};
use crate::api::format::{plain_number, rounded_percent};
use crate::api::legend::ThresholdLegend;
use crate::api::{ChartPage, LegendPlacement};
use crate::core::{Point, ThresholdScale, Viewport, stepped_range};
use crate::data::education::EducationDataset;
use crate::data::topology::{Feature, FeatureGeometry};
use crate::data::{DataSource, JsonFetcher};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{TooltipContent, TooltipPlacement};
use crate::render::{Color, ElementId, PointerHandlers, Shape, VisualElement, escape_xml};

/// US counties colored by the share of adults holding a bachelor's degree.
#[derive(Debug, Clone)]
pub struct ChoroplethPage {
    config: ChoroplethConfig,
    education_source: DataSource,
    topology_source: DataSource,
    palette: Vec<Color>,
}

/// Education records plus the decoded county shapes and state borders.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethData {
    pub education: EducationDataset,
    pub counties: Vec<Feature>,
    /// Arcs shared by two different states.
    pub state_borders: Vec<Vec<Point>>,
}

impl ChoroplethData {
    /// Numeric FIPS code of county `index`, if it has one.
    #[must_use]
    pub fn county_fips(&self, index: usize) -> Option<u32> {
        self.counties
            .get(index)?
            .id
            .as_ref()?
            .as_number()
            .and_then(|fips| u32::try_from(fips).ok())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethScales {
    pub color: ThresholdScale<Color>,
}

impl ChoroplethPage {
    pub fn new(config: ChoroplethConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        config.padding.validate()?;
        config.tooltip.validate()?;
        let palette = parse_palette(&config.palette)?;
        Ok(Self {
            education_source: DataSource::new(config.education_url.clone()),
            topology_source: DataSource::new(config.topology_url.clone()),
            config,
            palette,
        })
    }

    #[must_use]
    pub fn with_sources(mut self, education: Option<String>, topology: Option<String>) -> Self {
        self.education_source = self.education_source.with_override(education);
        self.topology_source = self.topology_source.with_override(topology);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ChoroplethConfig {
        &self.config
    }

    fn legend_left(&self) -> f64 {
        let legend = self.config.legend;
        legend
            .left
            .unwrap_or(self.config.viewport.width_f64() / 3.0 + legend.width)
    }
}

#[cfg(feature = "parallel-projection")]
fn project_counties(counties: &[Feature]) -> Vec<String> {
    use rayon::prelude::*;

    counties.par_iter().map(Feature::path_data).collect()
}

#[cfg(not(feature = "parallel-projection"))]
fn project_counties(counties: &[Feature]) -> Vec<String> {
    counties.iter().map(Feature::path_data).collect()
}

impl ChartPage for ChoroplethPage {
    type Data = ChoroplethData;
    type Scales = ChoroplethScales;

    fn title(&self) -> String {
        "United States Educational Attainment".to_owned()
    }

    fn description(&self) -> Option<String> {
        Some(
            "Percentage of adults age 25 and older with a bachelor's degree or higher (2010-2014)"
                .to_owned(),
        )
    }

    fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    fn fetch<F: JsonFetcher + ?Sized>(&self, fetcher: &F) -> ChartResult<ChoroplethData> {
        let topology_locator = self.topology_source.locator();
        let education =
            EducationDataset::load(fetcher, self.education_source.locator(), topology_locator)?;
        let counties = education
            .topology
            .features(&self.config.counties_object)
            .map_err(|e| ChartError::data_unavailable(topology_locator, e))?;
        let state_borders = education
            .topology
            .interior_mesh(&self.config.states_object)
            .map_err(|e| ChartError::data_unavailable(topology_locator, e))?;
        debug!(
            records = education.records.len(),
            counties = counties.len(),
            border_arcs = state_borders.len(),
            "choropleth data decoded"
        );
        Ok(ChoroplethData {
            education,
            counties,
            state_borders,
        })
    }

    fn build_scales(&self, _data: &ChoroplethData) -> ChartResult<ChoroplethScales> {
        let buckets = self.palette.len();
        let step = (self.config.threshold_stop - self.config.threshold_start)
            / buckets.saturating_sub(1).max(1) as f64;
        let mut thresholds =
            stepped_range(self.config.threshold_start, self.config.threshold_stop, step);
        thresholds.truncate(buckets.saturating_sub(1));
        let color = ThresholdScale::new(thresholds, self.palette.clone())?;
        Ok(ChoroplethScales { color })
    }

    fn render_shapes(
        &self,
        data: &ChoroplethData,
        scales: &ChoroplethScales,
    ) -> ChartResult<Vec<VisualElement>> {
        let paths = project_counties(&data.counties);
        let mut elements = paths
            .into_iter()
            .enumerate()
            .map(|(index, d)| {
                let fips = data.county_fips(index);
                let percentage = fips.map_or(0.0, |fips| data.education.percentage(fips));
                let fips_label = data.counties[index]
                    .id
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                VisualElement::new(ElementId(index), index, Shape::Path { d }, "county")
                    .with_fill(*scales.color.map(percentage))
                    .with_data("fips", fips_label)
                    .with_data("education", plain_number(percentage))
            })
            .collect::<Vec<_>>();

        let borders = FeatureGeometry::MultiLineString(data.state_borders.clone());
        let index = elements.len();
        elements.push(
            VisualElement::new(
                ElementId(index),
                0,
                Shape::Path {
                    d: borders.path_data(),
                },
                "stroke-white fill-none",
            )
            .with_stroke(Color::WHITE)
            .with_handlers(PointerHandlers::NONE),
        );
        Ok(elements)
    }

    fn render_legend(
        &self,
        _data: &ChoroplethData,
        scales: &ChoroplethScales,
        _elements: &[VisualElement],
    ) -> ChartResult<LegendPlacement> {
        let legend = self.config.legend;
        let left = self.legend_left();
        let strip = ThresholdLegend::build(&scales.color, (0.0, legend.width), rounded_percent)?;
        let (swatches, axis) = strip.to_groups(
            legend.height,
            (left, legend.top),
            (left, legend.height + legend.top),
        );
        Ok(LegendPlacement::Inline(vec![axis, swatches]))
    }

    fn tooltip_placement(&self, _scales: &ChoroplethScales) -> TooltipPlacement {
        self.config.tooltip
    }

    fn tooltip(
        &self,
        data: &ChoroplethData,
        _scales: &ChoroplethScales,
        element: &VisualElement,
    ) -> ChartResult<TooltipContent> {
        let fips = data.county_fips(element.record);
        let record = fips.and_then(|fips| data.education.find(fips));
        let percentage = record.map_or(0.0, |record| record.percentage());
        let (area_name, state) = record.map_or(("", ""), |record| {
            (record.area_name.as_str(), record.state.as_str())
        });
        Ok(TooltipContent::from_lines([format!(
            "{}, <b>{}</b>: <i>{}%</i>",
            escape_xml(area_name),
            escape_xml(state),
            plain_number(percentage)
        )])
        .with_data("education", plain_number(percentage)))
    }
}
