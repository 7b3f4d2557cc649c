//! Chart pages and the orchestrator that drives them.

pub mod axis;
pub mod bar_chart;
pub mod choropleth;
pub mod config;
mod context;
pub mod format;
pub mod heat_map;
pub mod legend;
pub mod scatterplot;
pub mod treemap;

pub use bar_chart::{BarChartPage, BarScales};
pub use choropleth::{ChoroplethData, ChoroplethPage, ChoroplethScales};
pub use config::{
    BarChartConfig, ChoroplethConfig, ChoroplethLegendConfig, HeatLegendConfig, HeatMapConfig,
    JsonConfig, OrdinalLegendConfig, ScatterplotConfig, TreemapConfig,
};
pub use context::ChartContext;
pub use heat_map::{HeatMapPage, HeatScales};
pub use scatterplot::{ScatterScales, ScatterplotPage};
pub use treemap::{TreemapDataset, TreemapPage, TreemapScales, TreemapTile};

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::{Point, Viewport};
use crate::data::JsonFetcher;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{DEFAULT_REVERT_DELAY, TooltipContent, TooltipPlacement, TooltipState};
use crate::render::{
    ElementId, FrameGroup, HtmlPage, RenderFrame, Renderer, SvgRenderer, VisualElement,
};

/// Where a page's legend is drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LegendPlacement {
    #[default]
    None,
    /// Groups drawn inside the chart surface.
    Inline(Vec<FrameGroup>),
    /// A separate surface next to the chart.
    Detached(RenderFrame),
}

/// One visualization page: how to fetch its dataset, build its scales and turn
/// records into elements.
///
/// `Scales` can only be produced from fetched data, and shapes can only be
/// rendered from `Scales`, so nothing is drawn before the domains are final.
pub trait ChartPage {
    type Data;
    type Scales;

    fn title(&self) -> String;

    fn description(&self) -> Option<String> {
        None
    }

    /// Size of the main chart surface.
    fn viewport(&self) -> Viewport;

    fn fetch<F: JsonFetcher + ?Sized>(&self, fetcher: &F) -> ChartResult<Self::Data>;

    fn build_scales(&self, data: &Self::Data) -> ChartResult<Self::Scales>;

    /// One element per record, in record order.
    fn render_shapes(
        &self,
        data: &Self::Data,
        scales: &Self::Scales,
    ) -> ChartResult<Vec<VisualElement>>;

    fn render_legend(
        &self,
        _data: &Self::Data,
        _scales: &Self::Scales,
        _elements: &[VisualElement],
    ) -> ChartResult<LegendPlacement> {
        Ok(LegendPlacement::None)
    }

    /// Axis groups; continuous and band charts only.
    fn render_axes(&self, _data: &Self::Data, _scales: &Self::Scales) -> ChartResult<Vec<FrameGroup>> {
        Ok(Vec::new())
    }

    fn tooltip_placement(&self, scales: &Self::Scales) -> TooltipPlacement;

    fn tooltip(
        &self,
        data: &Self::Data,
        scales: &Self::Scales,
        element: &VisualElement,
    ) -> ChartResult<TooltipContent>;

    fn revert_delay(&self) -> Duration {
        DEFAULT_REVERT_DELAY
    }
}

/// Loading indicator versus revealed chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Loading,
    Ready,
}

struct LoadedChart<P: ChartPage> {
    data: P::Data,
    scales: P::Scales,
    context: ChartContext,
    legend: LegendPlacement,
    axes: Vec<FrameGroup>,
}

/// Sequences one page: fetch, scales, shapes, legend, axes, reveal.
pub struct ChartOrchestrator<P: ChartPage> {
    page: P,
    ui_state: UiState,
    screen_width: Option<f64>,
    loaded: Option<LoadedChart<P>>,
}

impl<P: ChartPage> ChartOrchestrator<P> {
    #[must_use]
    pub fn new(page: P) -> Self {
        Self {
            page,
            ui_state: UiState::Loading,
            screen_width: None,
            loaded: None,
        }
    }

    /// Screen width used for tooltip overflow checks; defaults to the chart width.
    #[must_use]
    pub fn with_screen_width(mut self, screen_width: f64) -> Self {
        self.screen_width = Some(screen_width);
        self
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[must_use]
    pub fn ui_state(&self) -> UiState {
        self.ui_state
    }

    #[must_use]
    pub fn data(&self) -> Option<&P::Data> {
        self.loaded.as_ref().map(|loaded| &loaded.data)
    }

    #[must_use]
    pub fn scales(&self) -> Option<&P::Scales> {
        self.loaded.as_ref().map(|loaded| &loaded.scales)
    }

    #[must_use]
    pub fn context(&self) -> Option<&ChartContext> {
        self.loaded.as_ref().map(|loaded| &loaded.context)
    }

    /// Rendered data elements; empty while loading.
    #[must_use]
    pub fn elements(&self) -> &[VisualElement] {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.context.elements())
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn tooltip_state(&self) -> TooltipState {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.context.tooltip().state().clone())
            .unwrap_or_default()
    }

    /// Runs the pipeline once.
    ///
    /// On failure the chart stays in `UiState::Loading` with no elements; a
    /// second call after success is rejected.
    pub fn load<F: JsonFetcher + ?Sized>(&mut self, fetcher: &F) -> ChartResult<()> {
        if self.ui_state == UiState::Ready {
            return Err(ChartError::InvalidData("chart is already loaded".to_owned()));
        }
        let title = self.page.title();
        let loaded = self.run_pipeline(fetcher).inspect_err(|err| {
            warn!(chart = %title, error = %err, "chart load failed, staying in loading state");
        })?;
        self.loaded = Some(loaded);
        self.ui_state = UiState::Ready;
        info!(
            chart = %title,
            elements = self.elements().len(),
            "chart ready"
        );
        Ok(())
    }

    fn run_pipeline<F: JsonFetcher + ?Sized>(&self, fetcher: &F) -> ChartResult<LoadedChart<P>> {
        let data = self.page.fetch(fetcher)?;
        let scales = self.page.build_scales(&data)?;
        debug!("scale domains final");

        let mut elements = self.page.render_shapes(&data, &scales)?;
        for (index, element) in elements.iter_mut().enumerate() {
            element.id = ElementId(index);
        }
        debug!(count = elements.len(), "shapes rendered");

        let legend = self.page.render_legend(&data, &scales, &elements)?;
        let axes = self.page.render_axes(&data, &scales)?;

        let viewport = self.page.viewport();
        let screen_width = self.screen_width.unwrap_or_else(|| viewport.width_f64());
        let context = ChartContext::new(
            viewport,
            elements,
            self.page.tooltip_placement(&scales),
            screen_width,
            self.page.revert_delay(),
        )?;

        Ok(LoadedChart {
            data,
            scales,
            context,
            legend,
            axes,
        })
    }

    fn loaded(&self) -> ChartResult<&LoadedChart<P>> {
        self.loaded
            .as_ref()
            .ok_or_else(|| ChartError::InvalidData("chart is still loading".to_owned()))
    }

    fn loaded_mut(&mut self) -> ChartResult<&mut LoadedChart<P>> {
        self.loaded
            .as_mut()
            .ok_or_else(|| ChartError::InvalidData("chart is still loading".to_owned()))
    }

    /// Main chart surface: data layer, inline legend, then axes.
    pub fn frame(&self) -> ChartResult<RenderFrame> {
        let loaded = self.loaded()?;
        let mut data_layer = FrameGroup::new();
        data_layer.elements = loaded.context.elements().to_vec();

        let mut frame = RenderFrame::new(loaded.context.viewport()).with_group(data_layer);
        frame.title = Some(self.page.title());
        frame.description = self.page.description();
        if let LegendPlacement::Inline(groups) = &loaded.legend {
            frame.groups.extend(groups.iter().cloned());
        }
        frame.groups.extend(loaded.axes.iter().cloned());
        Ok(frame)
    }

    /// The main surface followed by a detached legend surface, if any.
    pub fn frames(&self) -> ChartResult<Vec<RenderFrame>> {
        let mut frames = vec![self.frame()?];
        if let LegendPlacement::Detached(legend) = &self.loaded()?.legend {
            frames.push(legend.clone());
        }
        Ok(frames)
    }

    pub fn render_with<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        for frame in self.frames()? {
            renderer.render(&frame)?;
        }
        Ok(())
    }

    /// SVG document of the main surface.
    pub fn to_svg(&self) -> ChartResult<String> {
        SvgRenderer::default().to_svg_string(&self.frame()?)
    }

    /// Host page; shows only the loading indicator until the chart is ready.
    pub fn to_html(&self) -> ChartResult<String> {
        let mut page = HtmlPage::new(self.page.title());
        page.description = self.page.description();
        page.loading = self.ui_state == UiState::Loading;
        if self.loaded.is_some() {
            let svg = SvgRenderer::default();
            page.svg_documents = self
                .frames()?
                .iter()
                .map(|frame| svg.to_svg_string(frame))
                .collect::<ChartResult<_>>()?;
            page.tooltip = self.tooltip_state();
        }
        Ok(page.to_html())
    }

    fn tooltip_for(&self, id: ElementId) -> ChartResult<TooltipContent> {
        let loaded = self.loaded()?;
        let element = loaded.context.element(id)?;
        self.page.tooltip(&loaded.data, &loaded.scales, element)
    }

    /// Hover start over `id`; returns the tooltip translation when shown.
    pub fn pointer_enter(&mut self, id: ElementId, pointer: Point) -> ChartResult<Option<Point>> {
        if !self.loaded()?.context.handlers(id)?.hover {
            return Ok(None);
        }
        let content = self.tooltip_for(id)?;
        self.loaded_mut()?.context.pointer_enter(id, pointer, content)
    }

    pub fn pointer_leave(&mut self, id: ElementId) -> ChartResult<()> {
        self.loaded_mut()?.context.pointer_leave(id)
    }

    /// Click at monotonic time `now`; only click-enabled elements react.
    pub fn click(
        &mut self,
        id: ElementId,
        pointer: Point,
        now: Duration,
    ) -> ChartResult<Option<Point>> {
        if !self.loaded()?.context.handlers(id)?.click_highlight {
            return Ok(None);
        }
        let content = self.tooltip_for(id)?;
        self.loaded_mut()?.context.click(id, pointer, content, now)
    }

    /// Fires pending highlight reverts due at `now`.
    pub fn advance_clock(&mut self, now: Duration) -> ChartResult<Vec<ElementId>> {
        self.loaded_mut()?.context.advance_clock(now)
    }

    pub fn set_screen_width(&mut self, screen_width: f64) -> ChartResult<()> {
        self.screen_width = Some(screen_width);
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.context.set_screen_width(screen_width)?;
        }
        Ok(())
    }
}
