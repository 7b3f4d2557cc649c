use std::time::Duration;

use tracing::{debug, trace};

use crate::core::{Point, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HighlightTimers, TooltipContent, TooltipController, TooltipPlacement};
use crate::render::{ElementId, PointerHandlers, VisualElement};

/// Per-chart interaction state owned by the orchestrator.
///
/// Holds the rendered data elements, the single tooltip and the pending
/// click-highlight reverts. Nothing here is shared between charts.
#[derive(Debug, Clone)]
pub struct ChartContext {
    viewport: Viewport,
    elements: Vec<VisualElement>,
    tooltip: TooltipController,
    timers: HighlightTimers,
    /// Element whose click forced the current tooltip, if any.
    forced_by: Option<ElementId>,
}

impl ChartContext {
    pub fn new(
        viewport: Viewport,
        elements: Vec<VisualElement>,
        placement: TooltipPlacement,
        screen_width: f64,
        revert_delay: Duration,
    ) -> ChartResult<Self> {
        Ok(Self {
            viewport: viewport.validate()?,
            elements,
            tooltip: TooltipController::new(placement, screen_width)?,
            timers: HighlightTimers::new(revert_delay),
            forced_by: None,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn elements(&self) -> &[VisualElement] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> ChartResult<&VisualElement> {
        self.elements
            .get(id.0)
            .filter(|element| element.id == id)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown element id {}", id.0)))
    }

    /// Pointer events `id` reacts to.
    pub fn handlers(&self, id: ElementId) -> ChartResult<PointerHandlers> {
        Ok(self.element(id)?.handlers)
    }

    fn element_mut(&mut self, id: ElementId) -> ChartResult<&mut VisualElement> {
        self.elements
            .get_mut(id.0)
            .filter(|element| element.id == id)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown element id {}", id.0)))
    }

    #[must_use]
    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    #[must_use]
    pub fn timers(&self) -> &HighlightTimers {
        &self.timers
    }

    pub fn set_screen_width(&mut self, screen_width: f64) -> ChartResult<()> {
        self.tooltip.set_screen_width(screen_width)
    }

    /// Ids of the currently highlighted elements.
    pub fn highlighted(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .filter(|element| element.highlighted)
            .map(|element| element.id)
    }

    /// Shows `content` for a hover over `id`.
    ///
    /// Returns `None` when the element does not react to hover.
    pub fn pointer_enter(
        &mut self,
        id: ElementId,
        pointer: Point,
        content: TooltipContent,
    ) -> ChartResult<Option<Point>> {
        if !self.element(id)?.handlers.hover {
            return Ok(None);
        }
        self.forced_by = None;
        Ok(Some(self.tooltip.show(pointer, content)))
    }

    pub fn pointer_leave(&mut self, id: ElementId) -> ChartResult<()> {
        if self.element(id)?.handlers.hover {
            self.forced_by = None;
            self.tooltip.hide();
        }
        Ok(())
    }

    /// Highlights `id` and forces its tooltip until `now + delay`.
    ///
    /// Pending reverts of earlier clicks are cancelled and reverted first.
    pub fn click(
        &mut self,
        id: ElementId,
        pointer: Point,
        content: TooltipContent,
        now: Duration,
    ) -> ChartResult<Option<Point>> {
        if !self.element(id)?.handlers.click_highlight {
            return Ok(None);
        }
        for cancelled in self.timers.schedule(id, now) {
            if cancelled != id {
                self.element_mut(cancelled)?.highlighted = false;
            }
        }
        self.element_mut(id)?.highlighted = true;
        self.forced_by = Some(id);
        debug!(element = id.0, "click highlight");
        Ok(Some(self.tooltip.show(pointer, content)))
    }

    /// Fires every revert due at `now`; returns the reverted elements.
    ///
    /// The tooltip is hidden only when it still belongs to the expiring click.
    pub fn advance_clock(&mut self, now: Duration) -> ChartResult<Vec<ElementId>> {
        let expired = self.timers.expire(now);
        for &id in &expired {
            self.element_mut(id)?.highlighted = false;
            if self.forced_by == Some(id) {
                self.forced_by = None;
                self.tooltip.hide();
            }
            trace!(element = id.0, "highlight reverted");
        }
        Ok(expired)
    }
}
