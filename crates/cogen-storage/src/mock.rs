//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use cogen_course::{Course, StudentRecord};

use crate::storage::{CourseSummary, ErrorStatus, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores courses and rosters in memory. Use the builder methods to configure
/// the mock with test data.
///
/// # Example
///
/// ```ignore
/// use cogen_course::Course;
/// use cogen_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new().with_course(Course::new("Cloud Lab"));
///
/// let course = storage.load("cloud-lab").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    courses: RwLock<BTreeMap<String, Course>>,
    rosters: RwLock<HashMap<String, Vec<StudentRecord>>>,
    failure: RwLock<Option<StorageErrorKind>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a course. The course is normalized first.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_course(self, mut course: Course) -> Self {
        course.normalize();
        self.courses
            .write()
            .unwrap()
            .insert(course.path.clone(), course);
        self
    }

    /// Add a roster for a course path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_roster(self, path: impl Into<String>, records: Vec<StudentRecord>) -> Self {
        self.rosters.write().unwrap().insert(path.into(), records);
        self
    }

    /// Make every operation fail with the given kind.
    ///
    /// [`StorageErrorKind::Unavailable`] failures are marked temporary.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, kind: StorageErrorKind) -> Self {
        *self.failure.write().unwrap() = Some(kind);
        self
    }

    fn check_failure(&self) -> Result<(), StorageError> {
        match *self.failure.read().unwrap() {
            Some(kind) => {
                let status = if kind == StorageErrorKind::Unavailable {
                    ErrorStatus::Temporary
                } else {
                    ErrorStatus::Permanent
                };
                Err(StorageError::new(kind).with_backend(BACKEND).with_status(status))
            }
            None => Ok(()),
        }
    }
}

impl Storage for MockStorage {
    fn list(&self) -> Result<Vec<CourseSummary>, StorageError> {
        self.check_failure()?;
        Ok(self
            .courses
            .read()
            .unwrap()
            .values()
            .map(CourseSummary::from)
            .collect())
    }

    fn load(&self, key: &str) -> Result<Course, StorageError> {
        self.check_failure()?;
        let courses = self.courses.read().unwrap();
        courses
            .get(key)
            .or_else(|| courses.values().find(|course| course.title == key))
            .cloned()
            .ok_or_else(|| StorageError::not_found(key).with_backend(BACKEND))
    }

    fn save(&self, course: &Course) -> Result<(), StorageError> {
        self.check_failure()?;
        let mut course = course.clone();
        course.normalize();

        let mut courses = self.courses.write().unwrap();
        let conflict = courses
            .values()
            .any(|existing| existing.path != course.path && existing.title == course.title);
        if conflict {
            return Err(StorageError::new(StorageErrorKind::AlreadyExists)
                .with_path(&course.title)
                .with_backend(BACKEND));
        }

        courses.insert(course.path.clone(), course);
        Ok(())
    }

    fn roster(&self, path: &str) -> Result<Vec<StudentRecord>, StorageError> {
        self.check_failure()?;
        Ok(self
            .rosters
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    fn save_roster(&self, path: &str, records: &[StudentRecord]) -> Result<(), StorageError> {
        self.check_failure()?;
        self.rosters
            .write()
            .unwrap()
            .insert(path.to_owned(), records.to_vec());
        Ok(())
    }
}
