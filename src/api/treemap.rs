use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::api::config::{TreemapConfig, parse_palette};
use crate::api::format::plain_number;
use crate::api::legend::ordinal_legend_frame;
use crate::api::{ChartPage, LegendPlacement};
use crate::core::{OrdinalScale, Rect, TreemapLayout, Viewport};
use crate::data::hierarchy::TreeNode;
use crate::data::{DataSource, JsonFetcher};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{TooltipContent, TooltipPlacement};
use crate::render::{Color, ElementId, Shape, VisualElement, escape_xml};

const TREE_MAP_BASE_URL: &str = "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/";

/// Published hierarchies the treemap page can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreemapDataset {
    #[default]
    Game,
    Movie,
    Kickstarter,
}

impl TreemapDataset {
    pub const ALL: [Self; 3] = [Self::Game, Self::Movie, Self::Kickstarter];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Movie => "movie",
            Self::Kickstarter => "kickstarter",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dataset| dataset.key() == key)
    }

    /// Selection from a `data` query value; anything unknown means `Game`.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(Self::from_key).unwrap_or_default()
    }

    /// Selection from a full page URL such as `https://host/treemap?data=movie`.
    #[must_use]
    pub fn from_page_url(page_url: &str) -> Self {
        match Url::parse(page_url) {
            Ok(url) => {
                let value = url
                    .query_pairs()
                    .find(|(name, _)| name == "data")
                    .map(|(_, value)| value.into_owned());
                Self::from_query(value.as_deref())
            }
            Err(err) => {
                warn!(page_url, error = %err, "unparseable page url, using default dataset");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn url(self) -> String {
        let file = match self {
            Self::Game => "video-game-sales-data.json",
            Self::Movie => "movie-data.json",
            Self::Kickstarter => "kickstarter-funding-data.json",
        };
        format!("{TREE_MAP_BASE_URL}{file}")
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Game => "Video Game Sales 🎮",
            Self::Movie => "Movie Sales 🎥",
            Self::Kickstarter => "Kickstarter Pledges 🏦💰",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Game => "Top 100 Most Sold Video Games Grouped by Platform",
            Self::Movie => "Top 100 Highest Grossing Movies Grouped By Genre",
            Self::Kickstarter => "Top 100 Most Pledged Kickstarter Campaigns Grouped By Category",
        }
    }

    /// Tooltip label of the grouping field.
    #[must_use]
    pub fn category_name(self) -> &'static str {
        match self {
            Self::Game => "Platform",
            Self::Movie => "Genre",
            Self::Kickstarter => "Category",
        }
    }

    /// Tooltip label of the leaf value.
    #[must_use]
    pub fn value_name(self) -> &'static str {
        match self {
            Self::Game => "Sales",
            Self::Movie => "Revenue",
            Self::Kickstarter => "Pledged",
        }
    }
}

/// Laid-out leaf, detached from the borrowed hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapTile {
    /// Ancestor names joined with `.`, root first.
    pub id: String,
    pub name: String,
    pub category: String,
    pub value: f64,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreemapScales {
    /// Leaves in layout order.
    pub tiles: Vec<TreemapTile>,
    pub color: OrdinalScale<String, Color>,
    /// Distinct leaf categories in first-seen order.
    pub categories: Vec<String>,
}

/// Hierarchical dataset tiled by value and colored by category.
#[derive(Debug, Clone)]
pub struct TreemapPage {
    config: TreemapConfig,
    source: DataSource,
    palette: Vec<Color>,
}

impl TreemapPage {
    pub fn new(config: TreemapConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        config.tooltip.validate()?;
        if config.legend.columns == 0 {
            return Err(ChartError::InvalidData(
                "legend needs at least one column".to_owned(),
            ));
        }
        let palette = parse_palette(&config.palette)?;
        let source = DataSource::new(config.dataset.url()).with_override(config.data_url.clone());
        Ok(Self {
            config,
            source,
            palette,
        })
    }

    #[must_use]
    pub fn with_source(mut self, locator: Option<String>) -> Self {
        if locator.is_some() {
            self.source = self.source.with_override(locator);
        }
        self
    }

    #[must_use]
    pub fn dataset(&self) -> TreemapDataset {
        self.config.dataset
    }

    #[must_use]
    pub fn config(&self) -> &TreemapConfig {
        &self.config
    }

    fn legend_width(&self) -> f64 {
        self.config.viewport.width_f64() / 2.0
    }
}

impl ChartPage for TreemapPage {
    type Data = TreeNode;
    type Scales = TreemapScales;

    fn title(&self) -> String {
        self.config.dataset.title().to_owned()
    }

    fn description(&self) -> Option<String> {
        Some(self.config.dataset.description().to_owned())
    }

    fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    fn fetch<F: JsonFetcher + ?Sized>(&self, fetcher: &F) -> ChartResult<TreeNode> {
        TreeNode::load(fetcher, self.source.locator())
    }

    fn build_scales(&self, data: &TreeNode) -> ChartResult<TreemapScales> {
        let viewport = self.config.viewport;
        let treemap =
            TreemapLayout::new(viewport.width_f64(), viewport.height_f64())?.layout(data)?;

        let tiles: Vec<TreemapTile> = treemap
            .leaves()
            .into_iter()
            .map(|leaf| TreemapTile {
                id: leaf.id.clone(),
                name: leaf.data.name.clone(),
                category: leaf.data.category.clone().unwrap_or_default(),
                value: leaf.data.value.0,
                rect: leaf.rect,
            })
            .collect();

        let categories: Vec<String> = tiles
            .iter()
            .map(|tile| tile.category.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        let color = OrdinalScale::new(categories.iter().cloned(), self.palette.clone())?;
        debug!(
            tiles = tiles.len(),
            categories = categories.len(),
            "treemap laid out"
        );
        Ok(TreemapScales {
            tiles,
            color,
            categories,
        })
    }

    fn render_shapes(
        &self,
        _data: &TreeNode,
        scales: &TreemapScales,
    ) -> ChartResult<Vec<VisualElement>> {
        scales
            .tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| {
                let fill = scales.color.map(&tile.category).copied().ok_or_else(|| {
                    ChartError::InvalidData(format!("category `{}` has no color", tile.category))
                })?;
                let shape = Shape::Rect {
                    x: tile.rect.x0,
                    y: tile.rect.y0,
                    width: tile.rect.width(),
                    height: tile.rect.height(),
                };
                let element = VisualElement::new(ElementId(index), index, shape, "tile")
                    .with_fill(fill)
                    .with_stroke(Color::WHITE)
                    .with_label(tile.name.clone())
                    .with_path_id(tile.id.clone())
                    .with_data("name", &tile.name)
                    .with_data("category", &tile.category)
                    .with_data("value", plain_number(tile.value));
                element.validate()?;
                Ok(element)
            })
            .collect()
    }

    fn render_legend(
        &self,
        _data: &TreeNode,
        scales: &TreemapScales,
        _elements: &[VisualElement],
    ) -> ChartResult<LegendPlacement> {
        let frame = ordinal_legend_frame(
            &scales.categories,
            &scales.color,
            self.legend_width(),
            self.config.legend,
        )?;
        Ok(LegendPlacement::Detached(frame))
    }

    fn tooltip_placement(&self, _scales: &TreemapScales) -> TooltipPlacement {
        self.config.tooltip
    }

    fn tooltip(
        &self,
        _data: &TreeNode,
        scales: &TreemapScales,
        element: &VisualElement,
    ) -> ChartResult<TooltipContent> {
        let tile = scales.tiles.get(element.record).ok_or_else(|| {
            ChartError::InvalidData(format!(
                "tile element refers to missing leaf {}",
                element.record
            ))
        })?;
        let dataset = self.config.dataset;
        let value = plain_number(tile.value);
        Ok(TooltipContent::from_lines([
            escape_xml(&tile.name),
            format!(
                "<b>{}:</b> {}",
                dataset.category_name(),
                escape_xml(&tile.category)
            ),
            format!("<b>{}:</b> {value}", dataset.value_name()),
        ])
        .with_data("value", value))
    }
}
