//! Course tree model and rendering for CoGen.
//!
//! This crate provides:
//! - [`Course`], [`Page`] and [`Button`]: the course document
//! - [`locate`] and [`start_page`]: finding a section in the page tree
//! - [`render_menu`]: the sidebar menu markup
//! - [`render_section`] and [`export`]: templated section bodies and the
//!   flattened course document
//! - [`resolve`]: merging a student's variables over the course defaults
//!
//! Everything here is pure and synchronous; loading and saving courses is the
//! job of a storage backend.
//!
//! # Quick Start
//!
//! ```
//! use cogen_course::{Course, Page, Target, Variables, render_menu, render_section, resolve};
//!
//! let mut course = Course::new("Cloud Lab");
//! course.children = vec![Page::new("Welcome", "welcome").with_data("Hi {{Student}}")];
//!
//! let session = Variables::from([("Student".to_owned(), "student07".to_owned())]);
//! let vars = resolve(&course.default_variables, Some(&session));
//!
//! let menu = render_menu(&course.children, &course.path);
//! assert!(menu.contains("/courses/cloud-lab/welcome"));
//!
//! let body = render_section(&course, &Target::parse("welcome"), &vars, None).unwrap();
//! assert_eq!(body, "Hi student07");
//! ```

mod flatten;
mod html;
mod locate;
mod menu;
mod model;
mod render;
mod roster;
pub mod template;
mod variables;

pub use flatten::{RenderedButton, flatten, render_buttons};
pub use html::escape_html;
pub use locate::{START_MARKER, Target, locate, start_page};
pub use menu::{render_menu, section_href};
pub use model::{
    Button, Course, Page, StudentRecord, Variables, derive_path, placeholder_defaults, preorder,
};
pub use render::{CourseError, ExportDocument, export, render_section};
pub use roster::{DEFAULT_ID_COLUMN, find_student, roster_keys, student_ids};
pub use variables::resolve;
