//! Interactive section rendering and full-course export.

use std::fmt::Write;

use serde::Serialize;

use crate::flatten::{RenderedButton, flatten, render_buttons};
use crate::html::escape_html;
use crate::locate::{Target, locate, start_page};
use crate::model::{Course, Variables};
use crate::template::{expand, unresolved};

/// Error returned when a section cannot be rendered.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CourseError {
    /// No page in the tree carries the requested path.
    #[error("Section not found: {0}")]
    SectionNotFound(String),
    /// The start of the course was requested but the course has no pages.
    #[error("Course has no pages")]
    EmptyCourse,
}

/// Render the body of one section.
///
/// `Target::Start` resolves to the first page with content (see
/// [`start_page`]); `start_depth` bounds how many empty drawers are skipped.
///
/// # Errors
///
/// Returns [`CourseError::SectionNotFound`] for an unknown path and
/// [`CourseError::EmptyCourse`] for a start request on a course without pages.
pub fn render_section(
    course: &Course,
    target: &Target,
    vars: &Variables,
    start_depth: Option<usize>,
) -> Result<String, CourseError> {
    let page = match target {
        Target::Start => start_page(&course.children, start_depth).ok_or(CourseError::EmptyCourse)?,
        Target::Path(path) => locate(path, &course.children)
            .ok_or_else(|| CourseError::SectionNotFound(path.clone()))?,
    };

    let missing = unresolved(&page.data, vars);
    if !missing.is_empty() {
        tracing::debug!(
            course = %course.path,
            section = %page.path,
            missing = ?missing,
            "Unresolved placeholders"
        );
    }

    Ok(expand(&page.data, vars))
}

/// A whole course flattened for export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    /// Course title.
    pub title: String,
    /// Flattened and expanded page tree.
    pub body: String,
    /// Expanded buttons, kept apart from the page tree.
    pub buttons: Vec<RenderedButton>,
}

/// Flatten a course and its buttons with one variable mapping.
pub fn export(course: &Course, vars: &Variables) -> ExportDocument {
    ExportDocument {
        title: course.title.clone(),
        body: flatten(&course.children, vars),
        buttons: render_buttons(&course.buttons, vars),
    }
}

impl ExportDocument {
    /// Render a standalone HTML document.
    ///
    /// Buttons become `<dialog>` elements after the main content.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(self.body.len() + 1024);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape_html(&self.title));
        html.push_str("</head>\n<body>\n");

        html.push_str("<main class=\"course-document\">\n");
        let _ = writeln!(html, "<h1 class=\"course-title\">{}</h1>", escape_html(&self.title));
        html.push_str(&self.body);
        html.push_str("</main>\n");

        for button in &self.buttons {
            let _ = writeln!(
                html,
                "<dialog class=\"course-dialog\" data-selector=\"{}\" data-icon=\"{}\" title=\"{}\">",
                escape_html(&button.selector),
                escape_html(&button.icon),
                escape_html(&button.description),
            );
            let _ = writeln!(html, "<h2>{}</h2>", escape_html(&button.name));
            html.push_str(&button.html);
            html.push_str("\n</dialog>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}
