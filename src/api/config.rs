use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::treemap::TreemapDataset;
use crate::core::{Padding, Viewport};
use crate::data::cyclists::CYCLIST_DATA_URL;
use crate::data::education::{COUNTY_TOPOLOGY_URL, EDUCATION_DATA_URL};
use crate::data::gdp::GDP_DATA_URL;
use crate::data::temperature::TEMPERATURE_DATA_URL;
use crate::error::{ChartError, ChartResult};
use crate::interaction::TooltipPlacement;
use crate::render::{Color, palette_from_hex};

/// JSON round-trip for page configs, so hosts can keep setups in files.
pub trait JsonConfig: Serialize + DeserializeOwned {
    /// Serializes config to pretty JSON for debug/config files.
    fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON. Missing fields take their defaults.
    fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

pub const HEAT_MAP_PALETTE: [&str; 11] = [
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026",
];

pub const CHOROPLETH_PALETTE: [&str; 9] = [
    "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8",
    "#1e40af",
];

pub const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

fn owned_palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|color| (*color).to_owned()).collect()
}

/// Parses a configured palette, rejecting empty ones.
pub(crate) fn parse_palette(colors: &[String]) -> ChartResult<Vec<Color>> {
    if colors.is_empty() {
        return Err(ChartError::InvalidData("palette must not be empty".to_owned()));
    }
    let refs: Vec<&str> = colors.iter().map(String::as_str).collect();
    palette_from_hex(&refs)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartConfig {
    #[serde(default = "default_standard_viewport")]
    pub viewport: Viewport,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default = "default_bar_tooltip")]
    pub tooltip: TooltipPlacement,
    #[serde(default = "default_gdp_url")]
    pub data_url: String,
    #[serde(default = "default_bar_color")]
    pub bar_color: String,
    /// Delay before a click highlight reverts.
    #[serde(default = "default_highlight_delay_ms")]
    pub highlight_delay_ms: u64,
    #[serde(default = "default_tick_count")]
    pub x_tick_count: usize,
    #[serde(default = "default_tick_count")]
    pub y_tick_count: usize,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            viewport: default_standard_viewport(),
            padding: Padding::default(),
            tooltip: default_bar_tooltip(),
            data_url: default_gdp_url(),
            bar_color: default_bar_color(),
            highlight_delay_ms: default_highlight_delay_ms(),
            x_tick_count: default_tick_count(),
            y_tick_count: default_tick_count(),
        }
    }
}

impl JsonConfig for BarChartConfig {}

/// Geometry of the legend strip under the heat map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatLegendConfig {
    /// Right end of the legend band range; the left end is the chart's left padding.
    pub width: f64,
    pub height: f64,
    /// Space below the legend reserved for its tick labels.
    pub padding: f64,
}

impl Default for HeatLegendConfig {
    fn default() -> Self {
        Self {
            width: 396.0,
            height: 20.0,
            padding: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatMapConfig {
    /// Size of the cell area; the legend strip is added below it.
    #[serde(default = "default_heat_viewport")]
    pub viewport: Viewport,
    #[serde(default = "default_heat_padding")]
    pub padding: Padding,
    /// `offset_y` is applied on top of the negated month band height.
    #[serde(default = "default_heat_tooltip")]
    pub tooltip: TooltipPlacement,
    #[serde(default)]
    pub legend: HeatLegendConfig,
    #[serde(default = "default_heat_palette")]
    pub palette: Vec<String>,
    #[serde(default = "default_temperature_url")]
    pub data_url: String,
    /// Year axis shows only years divisible by this.
    #[serde(default = "default_year_tick_every")]
    pub year_tick_every: i32,
}

impl Default for HeatMapConfig {
    fn default() -> Self {
        Self {
            viewport: default_heat_viewport(),
            padding: default_heat_padding(),
            tooltip: default_heat_tooltip(),
            legend: HeatLegendConfig::default(),
            palette: default_heat_palette(),
            data_url: default_temperature_url(),
            year_tick_every: default_year_tick_every(),
        }
    }
}

impl JsonConfig for HeatMapConfig {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterplotConfig {
    #[serde(default = "default_standard_viewport")]
    pub viewport: Viewport,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default = "default_scatter_tooltip")]
    pub tooltip: TooltipPlacement,
    #[serde(default = "default_cyclist_url")]
    pub data_url: String,
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f64,
    #[serde(default = "default_clean_color")]
    pub clean_color: String,
    #[serde(default = "default_doping_color")]
    pub doping_color: String,
    #[serde(default = "default_tick_count")]
    pub x_tick_count: usize,
    #[serde(default = "default_tick_count")]
    pub y_tick_count: usize,
}

impl Default for ScatterplotConfig {
    fn default() -> Self {
        Self {
            viewport: default_standard_viewport(),
            padding: Padding::default(),
            tooltip: default_scatter_tooltip(),
            data_url: default_cyclist_url(),
            dot_radius: default_dot_radius(),
            clean_color: default_clean_color(),
            doping_color: default_doping_color(),
            x_tick_count: default_tick_count(),
            y_tick_count: default_tick_count(),
        }
    }
}

impl JsonConfig for ScatterplotConfig {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethLegendConfig {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    /// Defaults to a third of the viewport width plus the legend width.
    #[serde(default)]
    pub left: Option<f64>,
}

impl Default for ChoroplethLegendConfig {
    fn default() -> Self {
        Self {
            width: 256.0,
            height: 10.0,
            top: 20.0,
            left: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethConfig {
    #[serde(default = "default_wide_viewport")]
    pub viewport: Viewport,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default)]
    pub tooltip: TooltipPlacement,
    #[serde(default)]
    pub legend: ChoroplethLegendConfig,
    #[serde(default = "default_choropleth_palette")]
    pub palette: Vec<String>,
    /// Thresholds run from `threshold_start` towards `threshold_stop` in
    /// `palette.len() - 1` equal steps.
    #[serde(default = "default_threshold_start")]
    pub threshold_start: f64,
    #[serde(default = "default_threshold_stop")]
    pub threshold_stop: f64,
    #[serde(default = "default_education_url")]
    pub education_url: String,
    #[serde(default = "default_topology_url")]
    pub topology_url: String,
    #[serde(default = "default_counties_object")]
    pub counties_object: String,
    #[serde(default = "default_states_object")]
    pub states_object: String,
}

impl Default for ChoroplethConfig {
    fn default() -> Self {
        Self {
            viewport: default_wide_viewport(),
            padding: Padding::default(),
            tooltip: TooltipPlacement::default(),
            legend: ChoroplethLegendConfig::default(),
            palette: default_choropleth_palette(),
            threshold_start: default_threshold_start(),
            threshold_stop: default_threshold_stop(),
            education_url: default_education_url(),
            topology_url: default_topology_url(),
            counties_object: default_counties_object(),
            states_object: default_states_object(),
        }
    }
}

impl JsonConfig for ChoroplethConfig {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrdinalLegendConfig {
    pub columns: usize,
    pub item_height: f64,
    pub swatch_size: f64,
    /// Vertical margin around the detached legend surface.
    pub padding: f64,
}

impl Default for OrdinalLegendConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            item_height: 24.0,
            swatch_size: 16.0,
            padding: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapConfig {
    #[serde(default = "default_wide_viewport")]
    pub viewport: Viewport,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default)]
    pub tooltip: TooltipPlacement,
    #[serde(default)]
    pub dataset: TreemapDataset,
    /// Replaces the dataset's published locator, e.g. with a fixture path.
    #[serde(default)]
    pub data_url: Option<String>,
    #[serde(default = "default_tableau10")]
    pub palette: Vec<String>,
    #[serde(default)]
    pub legend: OrdinalLegendConfig,
}

impl Default for TreemapConfig {
    fn default() -> Self {
        Self {
            viewport: default_wide_viewport(),
            padding: Padding::default(),
            tooltip: TooltipPlacement::default(),
            dataset: TreemapDataset::default(),
            data_url: None,
            palette: default_tableau10(),
            legend: OrdinalLegendConfig::default(),
        }
    }
}

impl JsonConfig for TreemapConfig {}

fn default_standard_viewport() -> Viewport {
    Viewport::new(896, 512)
}

fn default_heat_viewport() -> Viewport {
    Viewport::new(896 * 2, 512)
}

fn default_wide_viewport() -> Viewport {
    Viewport::new(1024 - 75, 640)
}

fn default_heat_padding() -> Padding {
    Padding::new(20.0, 20.0, 30.0, 65.0)
}

fn default_bar_tooltip() -> TooltipPlacement {
    TooltipPlacement {
        width: 128.0,
        offset_x: 40.0,
        right_padding: 20.0,
        offset_y: -50.0,
        flip_on_overflow: true,
    }
}

fn default_heat_tooltip() -> TooltipPlacement {
    TooltipPlacement {
        width: 144.0,
        offset_x: 15.0,
        right_padding: 20.0,
        offset_y: 0.0,
        flip_on_overflow: true,
    }
}

fn default_scatter_tooltip() -> TooltipPlacement {
    TooltipPlacement {
        width: 144.0,
        offset_x: 20.0,
        right_padding: 20.0,
        offset_y: -20.0,
        flip_on_overflow: false,
    }
}

fn default_gdp_url() -> String {
    GDP_DATA_URL.to_owned()
}

fn default_temperature_url() -> String {
    TEMPERATURE_DATA_URL.to_owned()
}

fn default_cyclist_url() -> String {
    CYCLIST_DATA_URL.to_owned()
}

fn default_education_url() -> String {
    EDUCATION_DATA_URL.to_owned()
}

fn default_topology_url() -> String {
    COUNTY_TOPOLOGY_URL.to_owned()
}

fn default_counties_object() -> String {
    "counties".to_owned()
}

fn default_states_object() -> String {
    "states".to_owned()
}

fn default_bar_color() -> String {
    "#60a5fa".to_owned()
}

fn default_clean_color() -> String {
    "#3b82f6".to_owned()
}

fn default_doping_color() -> String {
    "#f87171".to_owned()
}

fn default_highlight_delay_ms() -> u64 {
    1000
}

fn default_tick_count() -> usize {
    10
}

fn default_year_tick_every() -> i32 {
    10
}

fn default_dot_radius() -> f64 {
    6.0
}

fn default_threshold_start() -> f64 {
    2.6
}

fn default_threshold_stop() -> f64 {
    75.1
}

fn default_heat_palette() -> Vec<String> {
    owned_palette(&HEAT_MAP_PALETTE)
}

fn default_choropleth_palette() -> Vec<String> {
    owned_palette(&CHOROPLETH_PALETTE)
}

fn default_tableau10() -> Vec<String> {
    owned_palette(&TABLEAU10)
}
