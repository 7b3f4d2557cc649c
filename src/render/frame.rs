use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, LinePrimitive, RectPrimitive, TextPrimitive, VisualElement,
};

/// Translated group of primitives (axis, legend, data layer).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameGroup {
    pub id: Option<String>,
    pub translate: (f64, f64),
    pub elements: Vec<VisualElement>,
    pub rects: Vec<RectPrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl FrameGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate = (x, y);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for element in &self.elements {
            element.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
            && self.rects.is_empty()
            && self.circles.is_empty()
            && self.lines.is_empty()
            && self.texts.is_empty()
    }
}

/// Backend-agnostic scene for one chart surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub groups: Vec<FrameGroup>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            id: None,
            title: None,
            description: None,
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: FrameGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.viewport.validate()?;
        for group in &self.groups {
            group.validate()?;
        }
        Ok(())
    }

    /// All data-bound elements across groups, in draw order.
    pub fn elements(&self) -> impl Iterator<Item = &VisualElement> {
        self.groups.iter().flat_map(|group| group.elements.iter())
    }

    /// Group with the given id, e.g. `legend` or `x-axis`.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&FrameGroup> {
        self.groups
            .iter()
            .find(|group| group.id.as_deref() == Some(id))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(FrameGroup::is_empty)
    }
}
