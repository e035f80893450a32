//! Course document model.
//!
//! A [`Course`] owns an ordered tree of [`Page`]s and a flat list of
//! [`Button`]s. The JSON shape matches what the course editor submits, so a
//! document can be loaded from storage and replaced wholesale without any
//! intermediate representation.
//!
//! # Drawers and leaves
//!
//! A page with a non-empty `children` list is a *drawer*; a page without
//! children is a *leaf*. Storage may omit `children` or send `null`; both
//! deserialize to an empty list, so "has children" is always a length check.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Flat variable mapping (variable name to value).
///
/// Used both for a course's default variables and for a student's record.
pub type Variables = BTreeMap<String, String>;

/// One trainee's row from the uploaded roster.
pub type StudentRecord = Variables;

static PATH_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("invalid path separator regex"));

/// Root course document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course title.
    #[serde(rename = "courseTitle")]
    pub title: String,
    /// Display name (e.g. the session code).
    #[serde(rename = "courseName", default)]
    pub name: String,
    /// Title-bar text.
    #[serde(rename = "courseSlug", default)]
    pub slug: String,
    /// URL slug. Derived from the title when empty, see [`derive_path`].
    #[serde(rename = "coursePath", default)]
    pub path: String,
    /// Splash page heading.
    #[serde(default)]
    pub splash_title: String,
    /// Splash page instructions.
    #[serde(default)]
    pub splash_instructions: String,
    /// What a trainee is called in this course ("Student", "pod", ...).
    #[serde(default = "default_nomenclature")]
    pub user_nomenclature: String,
    /// Hidden from the public course list.
    #[serde(default)]
    pub private: bool,
    /// Show the logo in the page header.
    #[serde(default = "default_true")]
    pub show_logo: bool,
    /// Default variable values used when no student data is loaded.
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_variables: Variables,
    /// Top-level pages, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Page>,
    /// Modal buttons, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub buttons: Vec<Button>,
}

/// A node of the course tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Display name.
    pub name: String,
    /// Path segment, unique among siblings.
    #[serde(default)]
    pub path: String,
    /// Editor-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Body markup with `{{variable}}` placeholders. May be empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
    /// Child pages, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Page>,
}

/// A modal button shown alongside the course content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Display name.
    pub name: String,
    /// Selector token used by the front end to open the dialog.
    #[serde(default)]
    pub selector: String,
    /// Tooltip text.
    #[serde(default)]
    pub description: String,
    /// Icon identifier.
    #[serde(default)]
    pub icon: String,
    /// Dialog body markup with `{{variable}}` placeholders.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
    /// Editor-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn default_nomenclature() -> String {
    "Student".to_owned()
}

fn default_true() -> bool {
    true
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Derive a URL slug from a title.
///
/// Lower-cases the title and replaces every run of whitespace or underscores
/// with a single hyphen.
///
/// ```
/// use cogen_course::derive_path;
///
/// assert_eq!(derive_path("ILT CLEUR19 extras"), "ilt-cleur19-extras");
/// assert_eq!(derive_path("sae_lab"), "sae-lab");
/// ```
pub fn derive_path(title: &str) -> String {
    PATH_SEPARATORS
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

/// Build a defaults mapping where every value is its own placeholder.
///
/// Rendering with this mapping leaves `{{key}}` tokens visible, which is how
/// a course looks before any student is selected.
pub fn placeholder_defaults<I, S>(keys: I) -> Variables
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .map(|key| {
            let key = key.as_ref();
            (key.to_owned(), format!("{{{{{key}}}}}"))
        })
        .collect()
}

/// Collect pages in pre-order (parent before children, siblings in order).
pub fn preorder(nodes: &[Page]) -> Vec<&Page> {
    fn walk<'a>(nodes: &'a [Page], out: &mut Vec<&'a Page>) {
        for page in nodes {
            out.push(page);
            walk(&page.children, out);
        }
    }

    let mut out = Vec::new();
    walk(nodes, &mut out);
    out
}

impl Page {
    /// Create a childless page with an empty body.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the body.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Page>) -> Self {
        self.children = children;
        self
    }

    /// True if the page has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// A drawer groups child pages in the menu.
    pub fn is_drawer(&self) -> bool {
        self.has_children()
    }

    /// A leaf is a page without children.
    pub fn is_leaf(&self) -> bool {
        !self.has_children()
    }

    /// True if the page has a non-empty body.
    pub fn has_body(&self) -> bool {
        !self.data.is_empty()
    }

    fn normalize(&mut self) {
        if self.path.is_empty() {
            self.path = derive_path(&self.name);
        }
        for child in &mut self.children {
            child.normalize();
        }
    }
}

impl Course {
    /// Create an empty course with the given title and a derived path.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let mut course = Self {
            title: title.into(),
            user_nomenclature: default_nomenclature(),
            show_logo: true,
            ..Self::default()
        };
        course.normalize();
        course
    }

    /// Fill in derived fields.
    ///
    /// Sets the course path from the title when it is empty, and every empty
    /// page path from the page name.
    pub fn normalize(&mut self) {
        if self.path.is_empty() {
            self.path = derive_path(&self.title);
        }
        for page in &mut self.children {
            page.normalize();
        }
    }

    /// Variable names known to this course, sorted.
    pub fn variable_names(&self) -> Vec<&str> {
        self.default_variables.keys().map(String::as_str).collect()
    }

    /// Paths that appear more than once among the same siblings.
    ///
    /// Duplicates are tolerated (the first sibling wins on lookup), but they
    /// make later siblings unreachable, so callers usually want to log them.
    pub fn duplicate_sibling_paths(&self) -> Vec<String> {
        fn collect(nodes: &[Page], out: &mut Vec<String>) {
            let mut seen = HashSet::new();
            for page in nodes {
                if !seen.insert(page.path.as_str()) {
                    out.push(page.path.clone());
                }
                collect(&page.children, out);
            }
        }

        let mut out = Vec::new();
        collect(&self.children, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_derive_path_spaces() {
        assert_eq!(derive_path("ILT CLEUR19 extras"), "ilt-cleur19-extras");
    }

    #[test]
    fn test_derive_path_underscores_and_runs() {
        assert_eq!(derive_path("sae_lab"), "sae-lab");
        assert_eq!(derive_path("A  __ b"), "a-b");
        assert_eq!(derive_path("CoGen\tTest_Course"), "cogen-test-course");
    }

    #[test]
    fn test_placeholder_defaults() {
        let defaults = placeholder_defaults(["number", "Student"]);

        assert_eq!(defaults["number"], "{{number}}");
        assert_eq!(defaults["Student"], "{{Student}}");
        assert_eq!(defaults.len(), 2);
    }

    #[test]
    fn test_deserialize_editor_document() {
        let json = r#"{
            "courseTitle": "CoGen Test Course",
            "courseSlug": "",
            "courseName": "LTRCLD-2019",
            "splashTitle": "Creating Courses with CoGen",
            "splashInstructions": "Please select a pod number",
            "userNomenclature": "pod",
            "children": [
                {"name": "Welcome", "path": "welcome", "id": "552441622311",
                 "data": "Welcome!", "is_open": "false", "children": []}
            ],
            "buttons": [
                {"name": "Session Information", "id": "632680007670", "data": "",
                 "description": "Session Information",
                 "selector": "session-information", "icon": "info"}
            ]
        }"#;

        let mut course: Course = serde_json::from_str(json).unwrap();
        course.normalize();

        assert_eq!(course.title, "CoGen Test Course");
        assert_eq!(course.name, "LTRCLD-2019");
        assert_eq!(course.path, "cogen-test-course");
        assert_eq!(course.user_nomenclature, "pod");
        assert!(course.show_logo);
        assert!(!course.private);
        assert_eq!(course.children[0].id.as_deref(), Some("552441622311"));
        assert_eq!(course.buttons[0].selector, "session-information");
    }

    #[test]
    fn test_null_and_missing_children_are_empty() {
        let json = r#"[
            {"name": "A", "path": "a", "data": "x", "children": null},
            {"name": "B", "path": "b", "data": "y"}
        ]"#;

        let pages: Vec<Page> = serde_json::from_str(json).unwrap();

        assert!(!pages[0].has_children());
        assert!(!pages[1].has_children());
        assert!(pages[0].is_leaf() && pages[1].is_leaf());
        assert_eq!(pages[0].children, pages[1].children);
    }

    #[test]
    fn test_null_data_is_empty_body() {
        let page: Page = serde_json::from_str(r#"{"name": "A", "data": null}"#).unwrap();

        assert!(!page.has_body());
    }

    #[test]
    fn test_explicit_course_path_is_kept() {
        let mut course: Course =
            serde_json::from_str(r#"{"courseTitle": "Some Title", "coursePath": "custom"}"#)
                .unwrap();
        course.normalize();

        assert_eq!(course.path, "custom");
    }

    #[test]
    fn test_normalize_fills_page_paths() {
        let mut course = Course::new("Lab");
        course.children = vec![
            Page::new("Getting Started", "").with_children(vec![Page::new("First_Steps", "")]),
        ];

        course.normalize();

        assert_eq!(course.children[0].path, "getting-started");
        assert_eq!(course.children[0].children[0].path, "first-steps");
    }

    #[test]
    fn test_serialize_roundtrip_keeps_editor_names() {
        let course = Course::new("Lab One");
        let json = serde_json::to_value(&course).unwrap();

        assert_eq!(json["courseTitle"], "Lab One");
        assert_eq!(json["coursePath"], "lab-one");
        assert_eq!(json["userNomenclature"], "Student");
        assert_eq!(json["showLogo"], true);
    }

    #[test]
    fn test_preorder() {
        let tree = vec![
            Page::new("A", "a").with_children(vec![
                Page::new("A1", "a1").with_children(vec![Page::new("A1x", "a1x")]),
                Page::new("A2", "a2"),
            ]),
            Page::new("B", "b"),
        ];

        let paths: Vec<&str> = preorder(&tree).iter().map(|p| p.path.as_str()).collect();

        assert_eq!(paths, vec!["a", "a1", "a1x", "a2", "b"]);
    }

    #[test]
    fn test_duplicate_sibling_paths() {
        let mut course = Course::new("Lab");
        course.children = vec![
            Page::new("A", "intro"),
            Page::new("B", "intro"),
            Page::new("C", "c").with_children(vec![Page::new("D", "intro")]),
        ];

        assert_eq!(course.duplicate_sibling_paths(), vec!["intro".to_owned()]);
    }

    #[test]
    fn test_variable_names_sorted() {
        let mut course = Course::new("Lab");
        course.default_variables = placeholder_defaults(["number", "Student", "ip"]);

        assert_eq!(course.variable_names(), vec!["Student", "ip", "number"]);
    }
}
