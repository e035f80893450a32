//! Sidebar menu rendering.
//!
//! Turns the page tree into nested `<li>` markup for the course sidebar.
//! Drawers get a toggle and a nested `<ul>` with their children; leaves get a
//! plain link. A drawer with a body links to it, an empty drawer only toggles.
//!
//! Rendering is a pure function of the tree and the course path. Bodies are
//! never templated here.

use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::html::escape_html;
use crate::model::Page;

/// Render the sidebar menu for a list of pages.
///
/// Every page appears exactly once, in pre-order.
pub fn render_menu(nodes: &[Page], course: &str) -> String {
    let mut html = String::with_capacity(256 * nodes.len());
    render_items(&mut html, nodes, course);
    html
}

fn render_items(html: &mut String, nodes: &[Page], course: &str) {
    for page in nodes {
        let id = escape_html(&page.path);
        let name = escape_html(&page.name);

        if page.is_drawer() {
            if page.has_body() {
                let _ = write!(
                    html,
                    "<li class=\"sidebar-drawer\" data-id=\"{id}\">\
                     <a href=\"{}\" class=\"sidebar-toggle\">{name}</a>",
                    section_href(course, &page.path),
                );
            } else {
                let _ = write!(
                    html,
                    "<li class=\"sidebar-drawer\" data-id=\"{id}\" data-empty=\"true\">\
                     <a href=\"#\" class=\"sidebar-toggle\">{name}</a>",
                );
            }

            html.push_str("<ul>");
            render_items(html, &page.children, course);
            html.push_str("</ul></li>");
        } else {
            let _ = write!(
                html,
                "<li data-id=\"{id}\"><a href=\"{}\" class=\"sidebar-item\">{name}</a></li>",
                section_href(course, &page.path),
            );
        }
    }
}

/// URL path segment characters left unencoded: A-Z a-z 0-9 - . _ ~
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Link target for a course section.
///
/// Both segments are percent-encoded, which also makes the result safe inside
/// an HTML attribute.
pub fn section_href(course: &str, path: &str) -> String {
    format!(
        "/courses/{}/{}",
        utf8_percent_encode(course, SEGMENT),
        utf8_percent_encode(path, SEGMENT)
    )
}
