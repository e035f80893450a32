//! Effective variable mapping for a request.

use crate::model::Variables;

/// Merge a session's student record over the course defaults.
///
/// Session values win on shared keys; keys only present in the defaults keep
/// their default (usually the `{{key}}` placeholder itself). Neither input is
/// modified.
pub fn resolve(defaults: &Variables, session: Option<&Variables>) -> Variables {
    let mut vars = defaults.clone();
    if let Some(session) = session {
        for (key, value) in session {
            vars.insert(key.clone(), value.clone());
        }
    }
    vars
}
