mod element;
mod frame;
mod html;
mod null_renderer;
mod primitives;
mod svg;

pub use element::{DataAttributes, ElementId, PointerHandlers, Shape, VisualElement};
pub use frame::{FrameGroup, RenderFrame};
pub use html::HtmlPage;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
    palette_from_hex,
};
pub use svg::{SvgRenderer, escape_xml};

use crate::error::ChartResult;

/// Contract implemented by any output backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from datasets, scales and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
