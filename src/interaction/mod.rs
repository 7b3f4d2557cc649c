//! Tooltip placement and visibility state.

mod highlight;

pub use highlight::{DEFAULT_REVERT_DELAY, HighlightTimers};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Point;
use crate::error::{ChartError, ChartResult};
use crate::render::DataAttributes;

/// Geometry rules for placing the tooltip box next to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    /// Fixed tooltip box width in pixels.
    pub width: f64,
    /// Horizontal gap between pointer and box (applied on either side).
    pub offset_x: f64,
    /// Space kept free at the right edge of the screen.
    pub right_padding: f64,
    /// Added to the pointer's y coordinate.
    pub offset_y: f64,
    /// When false the box always sits right of the pointer.
    #[serde(default = "default_flip_on_overflow")]
    pub flip_on_overflow: bool,
}

fn default_flip_on_overflow() -> bool {
    true
}

impl Default for TooltipPlacement {
    fn default() -> Self {
        Self {
            width: 144.0,
            offset_x: 10.0,
            right_padding: 20.0,
            offset_y: -28.0,
            flip_on_overflow: true,
        }
    }
}

impl TooltipPlacement {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("width", self.width),
            ("offset_x", self.offset_x),
            ("right_padding", self.right_padding),
            ("offset_y", self.offset_y),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "tooltip placement `{name}` must be finite"
                )));
            }
        }
        if self.width < 0.0 {
            return Err(ChartError::InvalidData(
                "tooltip width must be >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Horizontal translation for a pointer at `pointer_x` on a screen
    /// `screen_width` pixels wide.
    ///
    /// The box goes right of the pointer unless its right edge plus the right
    /// padding would pass the screen edge; then it goes left of the pointer.
    #[must_use]
    pub fn translate_x(self, pointer_x: f64, screen_width: f64) -> f64 {
        let right_of_pointer = pointer_x + self.offset_x;
        if self.flip_on_overflow && right_of_pointer + self.width + self.right_padding > screen_width
        {
            pointer_x - self.width - self.offset_x
        } else {
            right_of_pointer
        }
    }

    #[must_use]
    pub fn translate(self, pointer: Point, screen_width: f64) -> Point {
        Point::new(
            self.translate_x(pointer.x, screen_width),
            pointer.y + self.offset_y,
        )
    }
}

/// Tooltip body plus the `data-*` attributes mirrored onto the overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipContent {
    /// HTML fragment.
    pub html: String,
    pub data: DataAttributes,
}

impl TooltipContent {
    /// Joins already-escaped HTML lines with line breaks.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let html = lines
            .into_iter()
            .map(|line| line.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("<br/>");
        Self {
            html,
            data: DataAttributes::new(),
        }
    }

    #[must_use]
    pub fn with_data(mut self, name: &'static str, value: impl ToString) -> Self {
        self.data.push((name, value.to_string()));
        self
    }

    /// Text with markup removed and line breaks turned into newlines.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let with_newlines = self.html.replace("<br/>", "\n");
        let mut out = String::with_capacity(with_newlines.len());
        let mut in_tag = false;
        for ch in with_newlines.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(ch),
                _ => {}
            }
        }
        out.replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
    }
}

/// Singleton tooltip state of one chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible {
        content: TooltipContent,
        translate: Point,
    },
}

impl TooltipState {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }

    #[must_use]
    pub fn content(&self) -> Option<&TooltipContent> {
        match self {
            Self::Visible { content, .. } => Some(content),
            Self::Hidden => None,
        }
    }

    #[must_use]
    pub fn translate(&self) -> Option<Point> {
        match self {
            Self::Visible { translate, .. } => Some(*translate),
            Self::Hidden => None,
        }
    }
}

/// Owns the tooltip state machine: `Hidden -> show -> Visible -> hide -> Hidden`.
///
/// Repeated `show` calls overwrite content and position.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipController {
    placement: TooltipPlacement,
    screen_width: f64,
    state: TooltipState,
}

impl TooltipController {
    pub fn new(placement: TooltipPlacement, screen_width: f64) -> ChartResult<Self> {
        if !screen_width.is_finite() || screen_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "tooltip screen width must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            placement: placement.validate()?,
            screen_width,
            state: TooltipState::Hidden,
        })
    }

    #[must_use]
    pub fn placement(&self) -> TooltipPlacement {
        self.placement
    }

    #[must_use]
    pub fn screen_width(&self) -> f64 {
        self.screen_width
    }

    /// Updates the screen width used for overflow checks (window resize).
    pub fn set_screen_width(&mut self, screen_width: f64) -> ChartResult<()> {
        if !screen_width.is_finite() || screen_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "tooltip screen width must be finite and > 0".to_owned(),
            ));
        }
        self.screen_width = screen_width;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Shows `content` next to `pointer` and returns the applied translation.
    pub fn show(&mut self, pointer: Point, content: TooltipContent) -> Point {
        let translate = self.placement.translate(pointer, self.screen_width);
        trace!(x = translate.x, y = translate.y, "show tooltip");
        self.state = TooltipState::Visible { content, translate };
        translate
    }

    pub fn hide(&mut self) {
        if self.state.is_visible() {
            trace!("hide tooltip");
        }
        self.state = TooltipState::Hidden;
    }
}
