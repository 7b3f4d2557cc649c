use std::fmt::Write as _;

use crate::interaction::TooltipState;
use crate::render::escape_xml;

/// Standalone HTML host page: loading indicator, chart container with one or
/// more SVG documents, and the tooltip overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HtmlPage {
    pub title: String,
    pub description: Option<String>,
    pub loading: bool,
    pub svg_documents: Vec<String>,
    pub tooltip: TooltipState,
}

impl HtmlPage {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            loading: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", escape_xml(&self.title));
        out.push_str(
            "<style>#tooltip{position:absolute;left:0;top:0;pointer-events:none;\
             background:#fff;border:1px solid #d1d5db;padding:4px;font-size:12px}</style>\n",
        );
        out.push_str("</head>\n<body>\n");

        let _ = writeln!(out, "<h1 id=\"title\">{}</h1>", escape_xml(&self.title));
        if let Some(description) = &self.description {
            let _ = writeln!(
                out,
                "<p id=\"description\">{}</p>",
                escape_xml(description)
            );
        }

        let (spinner_display, container_display) = if self.loading {
            ("block", "none")
        } else {
            ("none", "block")
        };
        let _ = writeln!(
            out,
            "<div id=\"spinner\" style=\"display:{spinner_display}\">Loading…</div>"
        );
        let _ = writeln!(
            out,
            "<div id=\"chart-container\" style=\"display:{container_display}\">"
        );
        for svg in &self.svg_documents {
            out.push_str(svg);
        }
        out.push_str("</div>\n");

        match &self.tooltip {
            TooltipState::Visible { content, translate } => {
                let mut attributes = String::new();
                for (name, value) in &content.data {
                    let _ = write!(attributes, " data-{name}=\"{}\"", escape_xml(value));
                }
                let _ = writeln!(
                    out,
                    "<div id=\"tooltip\" style=\"display:block;transform:translate({}px,{}px)\"{attributes}>{}</div>",
                    translate.x, translate.y, content.html
                );
            }
            TooltipState::Hidden => {
                out.push_str("<div id=\"tooltip\" style=\"display:none\"></div>\n");
            }
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}
