use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless pipelines.
///
/// It still validates frame content so invalid geometry is caught without a
/// real output backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_element_count: usize,
    pub last_text_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_element_count = frame.elements().count();
        self.last_text_count = frame.groups.iter().map(|group| group.texts.len()).sum();
        self.frames_rendered += 1;
        Ok(())
    }
}
