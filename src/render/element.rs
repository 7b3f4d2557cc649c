use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Stable handle of one rendered element inside its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

/// Geometry of a rendered element in chart pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
    },
    /// SVG path data.
    Path { d: String },
}

impl Shape {
    fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => {
                if !x.is_finite() || !y.is_finite() {
                    return Err(ChartError::InvalidData(
                        "element rect position must be finite".to_owned(),
                    ));
                }
                if !width.is_finite() || !height.is_finite() || *width < 0.0 || *height < 0.0 {
                    return Err(ChartError::InvalidData(
                        "element rect size must be finite and >= 0".to_owned(),
                    ));
                }
            }
            Self::Circle { cx, cy, radius } => {
                if !cx.is_finite() || !cy.is_finite() || !radius.is_finite() || *radius <= 0.0 {
                    return Err(ChartError::InvalidData(
                        "element circle must be finite with radius > 0".to_owned(),
                    ));
                }
            }
            Self::Path { .. } => {}
        }
        Ok(())
    }
}

/// Pointer events an element forwards to the tooltip controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerHandlers {
    pub hover: bool,
    /// One-shot highlight plus forced tooltip on click.
    pub click_highlight: bool,
}

impl PointerHandlers {
    pub const NONE: Self = Self {
        hover: false,
        click_highlight: false,
    };
    pub const HOVER: Self = Self {
        hover: true,
        click_highlight: false,
    };
    pub const HOVER_AND_CLICK: Self = Self {
        hover: true,
        click_highlight: true,
    };
}

/// `data-*` attributes, most elements carry two or three.
pub type DataAttributes = SmallVec<[(&'static str, String); 4]>;

/// One rendered primitive bound to exactly one source record.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElement {
    pub id: ElementId,
    /// Index of the source record in the page dataset.
    pub record: usize,
    pub shape: Shape,
    pub class: String,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub data: DataAttributes,
    /// Inline label drawn inside the element (treemap tiles).
    pub label: Option<String>,
    /// Synthesized hierarchical identifier (treemap tiles).
    pub path_id: Option<String>,
    pub handlers: PointerHandlers,
    pub highlighted: bool,
}

impl VisualElement {
    #[must_use]
    pub fn new(id: ElementId, record: usize, shape: Shape, class: impl Into<String>) -> Self {
        Self {
            id,
            record,
            shape,
            class: class.into(),
            fill: None,
            stroke: None,
            data: DataAttributes::new(),
            label: None,
            path_id: None,
            handlers: PointerHandlers::HOVER,
            highlighted: false,
        }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    #[must_use]
    pub fn with_data(mut self, name: &'static str, value: impl ToString) -> Self {
        self.data.push((name, value.to_string()));
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_path_id(mut self, path_id: impl Into<String>) -> Self {
        self.path_id = Some(path_id.into());
        self
    }

    #[must_use]
    pub fn with_handlers(mut self, handlers: PointerHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Value of the `data-{name}` attribute, if set.
    #[must_use]
    pub fn data_value(&self, name: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.shape.validate()?;
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        Ok(())
    }
}
