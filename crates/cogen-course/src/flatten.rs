//! Flattening the course tree into one templated document.
//!
//! Pages are emitted depth-first in pre-order. Each page becomes a
//! `<section>` holding its heading, its expanded body (if any) and then the
//! sections of its children, so parent content always precedes child content
//! and children precede the next sibling.

use std::fmt::Write;

use serde::Serialize;

use crate::html::escape_html;
use crate::model::{Button, Page, Variables};
use crate::template::expand;

/// Deepest heading level used for nested sections.
const MAX_HEADING_LEVEL: usize = 6;

/// A button with its dialog body expanded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedButton {
    /// Display name.
    pub name: String,
    /// Selector token.
    pub selector: String,
    /// Tooltip text.
    pub description: String,
    /// Icon identifier.
    pub icon: String,
    /// Expanded dialog body.
    pub html: String,
}

/// Flatten `nodes` into a single document, expanding every body with `vars`.
pub fn flatten(nodes: &[Page], vars: &Variables) -> String {
    let mut html = String::new();
    flatten_into(&mut html, nodes, vars, 1);
    html
}

fn flatten_into(html: &mut String, nodes: &[Page], vars: &Variables, depth: usize) {
    let level = depth.min(MAX_HEADING_LEVEL);

    for page in nodes {
        let _ = write!(
            html,
            "<section class=\"course-section\" data-id=\"{}\">\n<h{level}>{}</h{level}>\n",
            escape_html(&page.path),
            escape_html(&page.name),
        );

        if page.has_body() {
            html.push_str("<div class=\"section-body\">");
            html.push_str(&expand(&page.data, vars));
            html.push_str("</div>\n");
        }

        flatten_into(html, &page.children, vars, depth + 1);

        html.push_str("</section>\n");
    }
}

/// Expand every button body with `vars`, keeping button order.
pub fn render_buttons(buttons: &[Button], vars: &Variables) -> Vec<RenderedButton> {
    buttons
        .iter()
        .map(|button| RenderedButton {
            name: button.name.clone(),
            selector: button.selector.clone(),
            description: button.description.clone(),
            icon: button.icon.clone(),
            html: expand(&button.data, vars),
        })
        .collect()
}
