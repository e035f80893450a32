//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`], which keeps one JSON document per course and one
//! JSON roster per course under a data directory:
//!
//! ```text
//! data/
//! ├── courses/
//! │   └── cloud-lab.json
//! └── students/
//!     └── cloud-lab.json
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use cogen_course::{Course, StudentRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::storage::{CourseSummary, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Writes go to a temporary file in the target directory which is then
/// renamed over the old document, so readers never observe a partial write.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use cogen_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("data"));
/// let course = storage.load("cloud-lab")?;
/// ```
pub struct FsStorage {
    /// Root data directory.
    data_dir: PathBuf,
}

impl FsStorage {
    /// Create a filesystem storage rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Root data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn courses_dir(&self) -> PathBuf {
        self.data_dir.join("courses")
    }

    fn students_dir(&self) -> PathBuf {
        self.data_dir.join("students")
    }

    /// Validate that a key is a single safe file stem.
    ///
    /// Rejects empty keys, separators and `..` so a key can never escape the
    /// data directory.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        let invalid = key.is_empty()
            || key == "."
            || key.contains("..")
            || key.contains('/')
            || key.contains('\\');

        if invalid {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(key)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
        let content = fs::read_to_string(path)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))?;
        serde_json::from_str(&content)
            .map_err(|e| StorageError::json(e, path).with_backend(BACKEND))
    }

    fn write_json<T: Serialize + ?Sized>(dir: &Path, path: &Path, value: &T) -> Result<(), StorageError> {
        let io_err = |e: std::io::Error| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND);

        fs::create_dir_all(dir).map_err(io_err)?;

        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| StorageError::json(e, path).with_backend(BACKEND))?;

        let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
        file.write_all(&json).map_err(io_err)?;
        file.persist(path).map_err(|e| io_err(e.error))?;

        Ok(())
    }

    /// Load every stored course, ordered by file name.
    fn load_all(&self) -> Result<Vec<Course>, StorageError> {
        let dir = self.courses_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(e, Some(dir)).with_backend(BACKEND)),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut courses = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read_json::<Course>(&path) {
                Ok(mut course) => {
                    course.normalize();
                    courses.push(course);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable course");
                }
            }
        }
        Ok(courses)
    }
}

impl Storage for FsStorage {
    fn list(&self) -> Result<Vec<CourseSummary>, StorageError> {
        let mut summaries: Vec<CourseSummary> =
            self.load_all()?.iter().map(CourseSummary::from).collect();
        summaries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(summaries)
    }

    fn load(&self, key: &str) -> Result<Course, StorageError> {
        if Self::validate_key(key).is_ok() {
            let path = self.courses_dir().join(format!("{key}.json"));
            match Self::read_json::<Course>(&path) {
                Ok(mut course) => {
                    course.normalize();
                    return Ok(course);
                }
                Err(e) if e.kind() == StorageErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }

        // Fall back to a title lookup.
        self.load_all()?
            .into_iter()
            .find(|course| course.title == key || course.path == key)
            .ok_or_else(|| StorageError::not_found(key).with_backend(BACKEND))
    }

    fn save(&self, course: &Course) -> Result<(), StorageError> {
        let mut course = course.clone();
        course.normalize();
        Self::validate_key(&course.path)?;

        let conflict = self
            .load_all()?
            .into_iter()
            .any(|existing| existing.path != course.path && existing.title == course.title);
        if conflict {
            return Err(StorageError::new(StorageErrorKind::AlreadyExists)
                .with_path(&course.title)
                .with_backend(BACKEND));
        }

        let duplicates = course.duplicate_sibling_paths();
        if !duplicates.is_empty() {
            tracing::warn!(
                course = %course.path,
                duplicates = ?duplicates,
                "Duplicate sibling paths; only the first of each is reachable"
            );
        }

        let dir = self.courses_dir();
        let path = dir.join(format!("{}.json", course.path));
        Self::write_json(&dir, &path, &course)?;

        tracing::info!(course = %course.path, path = %path.display(), "Saved course");
        Ok(())
    }

    fn roster(&self, path: &str) -> Result<Vec<StudentRecord>, StorageError> {
        Self::validate_key(path)?;
        let file = self.students_dir().join(format!("{path}.json"));

        match Self::read_json(&file) {
            Ok(records) => Ok(records),
            Err(e) if e.kind() == StorageErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn save_roster(&self, path: &str, records: &[StudentRecord]) -> Result<(), StorageError> {
        Self::validate_key(path)?;
        let dir = self.students_dir();
        let file = dir.join(format!("{path}.json"));
        Self::write_json(&dir, &file, records)?;

        tracing::info!(course = %path, students = records.len(), "Saved roster");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cogen_course::Page;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn storage() -> (TempDir, FsStorage) {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());
        (dir, storage)
    }

    fn course(title: &str) -> Course {
        let mut course = Course::new(title);
        course.children = vec![Page::new("Welcome", "welcome").with_data("Hi {{Student}}")];
        course
    }

    fn record(number: &str) -> StudentRecord {
        StudentRecord::from([
            ("Number".to_owned(), number.to_owned()),
            ("Student".to_owned(), format!("student{number}")),
        ])
    }

    #[test]
    fn test_save_and_load_by_path() {
        let (_dir, storage) = storage();
        storage.save(&course("Cloud Lab")).unwrap();

        let loaded = storage.load("cloud-lab").unwrap();

        assert_eq!(loaded, course("Cloud Lab"));
    }

    #[test]
    fn test_load_by_title() {
        let (_dir, storage) = storage();
        storage.save(&course("Cloud Lab")).unwrap();

        let loaded = storage.load("Cloud Lab").unwrap();

        assert_eq!(loaded.path, "cloud-lab");
    }

    #[test]
    fn test_load_missing() {
        let (_dir, storage) = storage();

        let err = storage.load("nope").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
    }

    #[test]
    fn test_load_rejects_traversal_without_reading_outside() {
        let (_dir, storage) = storage();

        let err = storage.load("../secret").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
    }

    #[test]
    fn test_load_normalizes_legacy_document() {
        let (dir, storage) = storage();
        let courses = dir.path().join("courses");
        fs::create_dir_all(&courses).unwrap();
        fs::write(
            courses.join("sae-lab.json"),
            r#"{"courseTitle": "SAE Lab", "children": [{"name": "Intro", "data": "", "children": null}]}"#,
        )
        .unwrap();

        let loaded = storage.load("sae-lab").unwrap();

        assert_eq!(loaded.path, "sae-lab");
        assert_eq!(loaded.children[0].path, "intro");
        assert!(loaded.children[0].children.is_empty());
    }

    #[test]
    fn test_save_replaces_whole_document() {
        let (_dir, storage) = storage();
        storage.save(&course("Cloud Lab")).unwrap();

        let mut updated = course("Cloud Lab");
        updated.children = vec![Page::new("Other", "other")];
        storage.save(&updated).unwrap();

        let loaded = storage.load("cloud-lab").unwrap();
        assert_eq!(loaded.children, vec![Page::new("Other", "other")]);
    }

    #[test]
    fn test_save_rejects_duplicate_title() {
        let (_dir, storage) = storage();
        storage.save(&course("Cloud Lab")).unwrap();

        let mut other = course("Cloud Lab");
        other.path = "another-path".to_owned();
        let err = storage.save(&other).unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::AlreadyExists);
    }

    #[test]
    fn test_save_rejects_invalid_path() {
        let (_dir, storage) = storage();
        let mut bad = course("Bad");
        bad.path = "../escape".to_owned();

        let err = storage.save(&bad).unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_list_sorted_by_path() {
        let (_dir, storage) = storage();
        storage.save(&course("Zeta Lab")).unwrap();
        storage.save(&course("Alpha Lab")).unwrap();

        let paths: Vec<String> = storage.list().unwrap().into_iter().map(|s| s.path).collect();

        assert_eq!(paths, vec!["alpha-lab".to_owned(), "zeta-lab".to_owned()]);
    }

    #[test]
    fn test_list_empty_data_dir() {
        let (_dir, storage) = storage();

        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_unreadable_documents() {
        let (dir, storage) = storage();
        storage.save(&course("Cloud Lab")).unwrap();
        fs::write(dir.path().join("courses").join("broken.json"), "{").unwrap();

        let summaries = storage.list().unwrap();

        assert_eq!(summaries.len(), 1);
    }

    #[test]
    fn test_roster_missing_is_empty() {
        let (_dir, storage) = storage();

        assert!(storage.roster("cloud-lab").unwrap().is_empty());
    }

    #[test]
    fn test_roster_roundtrip() {
        let (_dir, storage) = storage();
        let records = vec![record("01"), record("02")];

        storage.save_roster("cloud-lab", &records).unwrap();

        assert_eq!(storage.roster("cloud-lab").unwrap(), records);
    }

    #[test]
    fn test_roster_invalid_json() {
        let (dir, storage) = storage();
        let students = dir.path().join("students");
        fs::create_dir_all(&students).unwrap();
        fs::write(students.join("cloud-lab.json"), "not json").unwrap();

        let err = storage.roster("cloud-lab").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::InvalidData);
    }
}
