//! HTTP request handlers.

pub(crate) mod courses;
pub(crate) mod editor;
pub(crate) mod export;
pub(crate) mod session;

use cogen_course::{Course, Variables, resolve};

use crate::session::Session;

/// Variables for rendering `course` in `session`.
///
/// The student record only applies to the course the session was opened for;
/// other courses render with their defaults.
pub(crate) fn session_variables(course: &Course, session: &Session) -> Variables {
    let student = (session.course == course.path).then_some(&session.student);
    resolve(&course.default_variables, student)
}
