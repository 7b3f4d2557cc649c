use std::fmt::Write as _;

use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::render::{FrameGroup, RenderFrame, Renderer, Shape, VisualElement};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Serializes frames into standalone SVG documents.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    highlight_class: String,
    last_document: Option<String>,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new("highlight")
    }
}

impl SvgRenderer {
    /// `highlight_class` is appended to the class list of highlighted elements.
    #[must_use]
    pub fn new(highlight_class: impl Into<String>) -> Self {
        Self {
            highlight_class: highlight_class.into(),
            last_document: None,
        }
    }

    #[must_use]
    pub fn last_document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }

    #[must_use]
    pub fn take_document(&mut self) -> Option<String> {
        self.last_document.take()
    }

    /// Renders a validated frame into an SVG string.
    pub fn to_svg_string(&self, frame: &RenderFrame) -> ChartResult<String> {
        frame.validate()?;
        let mut out = String::new();
        self.write_frame(&mut out, frame)
            .map_err(|e| ChartError::InvalidData(format!("failed to write svg: {e}")))?;
        Ok(out)
    }

    fn write_frame(&self, out: &mut String, frame: &RenderFrame) -> std::fmt::Result {
        write!(
            out,
            r#"<svg xmlns="{SVG_NS}" width="{}" height="{}""#,
            frame.viewport.width, frame.viewport.height
        )?;
        if let Some(id) = &frame.id {
            write!(out, r#" id="{}""#, escape_xml(id))?;
        }
        out.push_str(">\n");

        if let Some(title) = &frame.title {
            writeln!(out, "<title>{}</title>", escape_xml(title))?;
        }
        if let Some(description) = &frame.description {
            writeln!(out, "<desc>{}</desc>", escape_xml(description))?;
        }

        for group in &frame.groups {
            self.write_group(out, group)?;
        }
        out.push_str("</svg>\n");
        Ok(())
    }

    fn write_group(&self, out: &mut String, group: &FrameGroup) -> std::fmt::Result {
        out.push_str("<g");
        if let Some(id) = &group.id {
            write!(out, r#" id="{}""#, escape_xml(id))?;
        }
        let (tx, ty) = group.translate;
        if tx != 0.0 || ty != 0.0 {
            write!(out, r#" transform="translate({tx},{ty})""#)?;
        }
        out.push_str(">\n");

        for rect in &group.rects {
            writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}/>"#,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                rect.fill.to_css(),
                class_attribute(rect.class)
            )?;
        }
        for circle in &group.circles {
            writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}"{}/>"#,
                circle.cx,
                circle.cy,
                circle.radius,
                circle.fill.to_css(),
                circle.stroke.to_css(),
                circle.stroke_width,
                class_attribute(circle.class)
            )?;
        }
        for line in &group.lines {
            writeln!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                line.x1,
                line.y1,
                line.x2,
                line.y2,
                line.color.to_css(),
                line.stroke_width
            )?;
        }
        for text in &group.texts {
            writeln!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}">{}</text>"#,
                text.x,
                text.y,
                text.font_size_px,
                text.color.to_css(),
                text.h_align.text_anchor(),
                escape_xml(&text.text)
            )?;
        }
        for element in &group.elements {
            self.write_element(out, element)?;
        }

        out.push_str("</g>\n");
        Ok(())
    }

    fn write_element(&self, out: &mut String, element: &VisualElement) -> std::fmt::Result {
        let mut attributes = String::new();
        let mut class = element.class.clone();
        if element.highlighted {
            class.push(' ');
            class.push_str(&self.highlight_class);
        }
        if !class.is_empty() {
            write!(attributes, r#" class="{}""#, escape_xml(&class))?;
        }
        match element.fill {
            Some(fill) => write!(attributes, r#" fill="{}""#, fill.to_css())?,
            None if matches!(element.shape, Shape::Path { .. }) => {
                attributes.push_str(r#" fill="none""#);
            }
            None => {}
        }
        if let Some(stroke) = element.stroke {
            write!(attributes, r#" stroke="{}""#, stroke.to_css())?;
        }
        if let Some(path_id) = &element.path_id {
            write!(attributes, r#" data-id="{}""#, escape_xml(path_id))?;
        }
        for (name, value) in &element.data {
            write!(attributes, r#" data-{name}="{}""#, escape_xml(value))?;
        }

        match &element.shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => match &element.label {
                Some(label) => {
                    writeln!(out, r#"<g transform="translate({x},{y})">"#)?;
                    writeln!(
                        out,
                        r#"<rect width="{width}" height="{height}"{attributes}/>"#
                    )?;
                    writeln!(
                        out,
                        r#"<foreignObject width="{width}" height="{height}"><div xmlns="{XHTML_NS}">{}</div></foreignObject>"#,
                        escape_xml(label)
                    )?;
                    out.push_str("</g>\n");
                }
                None => writeln!(
                    out,
                    r#"<rect x="{x}" y="{y}" width="{width}" height="{height}"{attributes}/>"#
                )?,
            },
            Shape::Circle { cx, cy, radius } => {
                writeln!(out, r#"<circle cx="{cx}" cy="{cy}" r="{radius}"{attributes}/>"#)?;
            }
            Shape::Path { d } => {
                writeln!(out, r#"<path d="{}"{attributes}/>"#, escape_xml(d))?;
            }
        }
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let document = self.to_svg_string(frame)?;
        trace!(bytes = document.len(), "rendered svg document");
        self.last_document = Some(document);
        Ok(())
    }
}

fn class_attribute(class: Option<&str>) -> String {
    class
        .map(|class| format!(r#" class="{}""#, escape_xml(class)))
        .unwrap_or_default()
}

/// Escapes text for use in XML content and attribute values.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
