//! Storage abstraction for CoGen courses.
//!
//! This crate provides a [`Storage`] trait that separates course loading and
//! saving from the backend that holds the documents. This enables:
//!
//! - **Unit testing** of the server without touching the filesystem
//! - **Backend flexibility** (a document database can replace the JSON files)
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `list()`, `load()`, `save()`, `roster()` and
//!   `save_roster()` methods
//! - [`FsStorage`] implementation keeping one JSON file per course
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use cogen_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("data"));
//! for course in storage.list()? {
//!     println!("{}: {}", course.path, course.title);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{CourseSummary, ErrorStatus, Storage, StorageError, StorageErrorKind};
