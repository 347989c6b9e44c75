//! Submission store
//!
//! Persists the submission collection as a single JSON array document.
//! Each append loads the full collection, pushes one record, and rewrites
//! the whole document. There is no locking; concurrent appends can race
//! and the last writer wins.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::logger;

/// One persisted form submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    pub created_at: String,
}

/// Validated submission fields, before an id and timestamp are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Storage abstraction over the submission collection.
pub trait SubmissionStore: Send + Sync {
    /// Load the full collection in insertion order. An absent backing
    /// document reads as the empty collection; a document that exists but
    /// cannot be read or parsed is an error.
    fn load_all(&self) -> Result<Vec<Submission>, String>;

    /// Append one record and persist the rewritten collection, returning
    /// the stored record. A backing document that cannot be read is
    /// logged and treated as empty, so the rewrite drops whatever the
    /// unreadable document held.
    fn append_one(&self, input: NewSubmission) -> Result<Submission, String>;
}

/// Shared handle used to inject a store into the request handlers.
pub type SharedStore = Arc<dyn SubmissionStore>;

/// JSON flat-file store. The backing document is created lazily on the
/// first successful append.
pub struct FileStore {
    data_path: PathBuf,
}

impl FileStore {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    pub fn shared(data_path: &str) -> SharedStore {
        Arc::new(Self::new(data_path))
    }
}

impl SubmissionStore for FileStore {
    fn load_all(&self) -> Result<Vec<Submission>, String> {
        if !self.data_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.data_path).map_err(|e| {
            format!("Failed to read data file {}: {e}", self.data_path.display())
        })?;

        serde_json::from_str(&content).map_err(|e| {
            format!(
                "Failed to parse data file {}: {e}",
                self.data_path.display()
            )
        })
    }

    fn append_one(&self, input: NewSubmission) -> Result<Submission, String> {
        let mut all = self.load_all().unwrap_or_else(|e| {
            logger::log_error(&e);
            Vec::new()
        });

        let submission = build_record(input, all.last().map(|s| s.id));
        all.push(submission.clone());

        let content = serde_json::to_string_pretty(&all)
            .map_err(|e| format!("Failed to serialize submissions: {e}"))?;

        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    format!("Failed to create data directory {}: {e}", parent.display())
                })?;
            }
        }

        fs::write(&self.data_path, content).map_err(|e| {
            format!(
                "Failed to write data file {}: {e}",
                self.data_path.display()
            )
        })?;

        Ok(submission)
    }
}

/// In-memory store, substituted for the flat file in tests.
#[derive(Default)]
pub struct MemoryStore {
    submissions: Mutex<Vec<Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl SubmissionStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Submission>, String> {
        self.submissions
            .lock()
            .map(|all| all.clone())
            .map_err(|e| format!("Submission store lock poisoned: {e}"))
    }

    fn append_one(&self, input: NewSubmission) -> Result<Submission, String> {
        let mut all = self
            .submissions
            .lock()
            .map_err(|e| format!("Submission store lock poisoned: {e}"))?;
        let submission = build_record(input, all.last().map(|s| s.id));
        all.push(submission.clone());
        Ok(submission)
    }
}

/// Build a record with a timestamp-derived id. The id is bumped past the
/// previous record's id when two submissions land in the same millisecond,
/// so ids stay strictly increasing within one process.
fn build_record(input: NewSubmission, last_id: Option<i64>) -> Submission {
    let now = Utc::now();
    let mut id = now.timestamp_millis();
    if let Some(last) = last_id {
        if id <= last {
            id = last + 1;
        }
    }

    Submission {
        id,
        name: input.name,
        email: input.email,
        phone: input.phone,
        message: input.message,
        created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn scratch_file(tag: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "formsite-store-{tag}-{}-{n}.json",
            std::process::id()
        ))
    }

    fn input(name: &str, email: &str) -> NewSubmission {
        NewSubmission {
            name: name.to_string(),
            email: email.to_string(),
            ..NewSubmission::default()
        }
    }

    #[test]
    fn test_absent_file_reads_empty() {
        let store = FileStore::new(scratch_file("absent"));
        assert_eq!(store.load_all().expect("load"), Vec::new());
    }

    #[test]
    fn test_sequential_appends_round_trip() {
        let path = scratch_file("roundtrip");
        let store = FileStore::new(path.clone());

        let inputs = [
            ("Ada", "ada@example.com"),
            ("Grace", "grace@example.com"),
            ("Edsger", "edsger@example.com"),
        ];
        for (name, email) in inputs {
            store.append_one(input(name, email)).expect("append");
        }

        let all = store.load_all().expect("load");
        assert_eq!(all.len(), inputs.len());
        for (stored, (name, email)) in all.iter().zip(inputs) {
            assert_eq!(stored.name, name);
            assert_eq!(stored.email, email);
            assert_eq!(stored.phone, "");
            assert_eq!(stored.message, "");
            assert!(!stored.created_at.is_empty());
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .append_one(input(&format!("n{i}"), "x@example.com"))
                .expect("append");
        }

        let all = store.load_all().expect("load");
        for pair in all.windows(2) {
            assert!(pair[1].id > pair[0].id, "ids must strictly increase");
        }
    }

    #[test]
    fn test_unreadable_document_falls_back_to_empty() {
        let path = scratch_file("corrupt");
        fs::write(&path, "not json at all").expect("seed");
        let store = FileStore::new(path.clone());

        assert!(store.load_all().is_err());

        // Appending over an unreadable document drops its contents. This
        // pins the documented data-loss window rather than fixing it.
        store.append_one(input("Ada", "ada@example.com")).expect("append");
        let all = store.load_all().expect("load");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ada");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_append_creates_missing_data_directory() {
        let dir = scratch_file("dir");
        let path = dir.join("nested/submissions.json");
        let store = FileStore::new(path.clone());

        store.append_one(input("Ada", "ada@example.com")).expect("append");
        assert_eq!(store.load_all().expect("load").len(), 1);

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_optional_fields_default_when_absent_from_document() {
        let path = scratch_file("optional");
        fs::write(
            &path,
            r#"[{"id":1,"name":"Ada","email":"ada@example.com","created_at":"2024-01-01T00:00:00.000Z"}]"#,
        )
        .expect("seed");
        let store = FileStore::new(path.clone());

        let all = store.load_all().expect("load");
        assert_eq!(all[0].phone, "");
        assert_eq!(all[0].message, "");

        let _ = fs::remove_file(path);
    }
}
