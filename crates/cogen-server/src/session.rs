//! In-memory training sessions.
//!
//! A session is created when a trainer picks a student on the splash page.
//! It binds the browser (through a cookie holding the session id) to one
//! course and one roster record. Sessions expire after a period of
//! inactivity; every successful lookup extends them.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use cogen_course::StudentRecord;
use uuid::Uuid;

/// One signed-in training session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    /// Course path the student signed in to.
    pub(crate) course: String,
    /// The student's roster record.
    pub(crate) student: StudentRecord,
    /// Whether the sidebar menu is shown.
    pub(crate) sidebar_shown: bool,
}

#[derive(Debug)]
struct Entry {
    session: Session,
    expires_at: Instant,
}

/// Session store keyed by session id.
#[derive(Debug)]
pub(crate) struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store whose sessions live for `ttl` after their last use.
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a session. The sidebar is shown by default.
    pub(crate) fn create(&self, course: impl Into<String>, student: StudentRecord) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let entry = Entry {
            session: Session {
                course: course.into(),
                student,
                sidebar_shown: true,
            },
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, entry| entry.expires_at > now);
        sessions.insert(id, entry);
        id
    }

    /// Look up a live session and extend its lifetime.
    pub(crate) fn get(&self, id: Uuid) -> Option<Session> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        match sessions.get_mut(&id) {
            Some(entry) if entry.expires_at > now => {
                entry.expires_at = now + self.ttl;
                Some(entry.session.clone())
            }
            Some(_) => {
                sessions.remove(&id);
                None
            }
            None => None,
        }
    }

    /// Record the sidebar preference. Returns false if the session is gone.
    pub(crate) fn set_sidebar(&self, id: Uuid, shown: bool) -> bool {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        match sessions.get_mut(&id) {
            Some(entry) if entry.expires_at > now => {
                entry.session.sidebar_shown = shown;
                entry.expires_at = now + self.ttl;
                true
            }
            _ => false,
        }
    }

    /// End a session.
    pub(crate) fn remove(&self, id: Uuid) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}
