use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::*;

use crate::error::Result;

/// One contact-form record. Appended to the store, never mutated or
/// removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub plan: Option<String>,
    pub message: Option<String>,
}

/// Append-only JSON array file. The read-modify-write is guarded by a
/// per-process mutex; concurrent writers in other processes are not
/// protected against.
#[derive(Debug, Clone)]
pub struct ContactStore {
    path: PathBuf,
    write_guard: Arc<Mutex<()>>,
}

impl ContactStore {
    /// Opens the store, creating an empty array file when absent
    pub fn new(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            info!("Creating empty submissions file at {:?}", path);
            std::fs::write(&path, b"[]")?;
        }
        Ok(ContactStore {
            path,
            write_guard: Arc::new(Mutex::new(())),
        })
    }

    /// Full read-modify-write; errors propagate so the handler can answer
    /// with the failure message
    pub async fn append(&self, submission: ContactSubmission) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        let contents = tokio::fs::read(&self.path).await?;
        let mut submissions: Vec<ContactSubmission> = serde_json::from_slice(&contents)?;
        submissions.push(submission);
        let serialized = serde_json::to_vec_pretty(&submissions)?;
        tokio::fs::write(&self.path, serialized).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.to_owned(),
            email: email.to_owned(),
            plan: None,
            message: None,
        }
    }

    #[tokio::test]
    async fn new_store_creates_empty_array_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.json");
        let _store = ContactStore::new(path.clone()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn existing_file_is_left_untouched_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.json");
        std::fs::write(&path, r#"[{"name":"Ana","email":"a@x.com","plan":null,"message":null}]"#)
            .unwrap();

        let store = ContactStore::new(path.clone()).unwrap();
        store.append(submission("Bo", "b@x.com")).await.unwrap();

        let stored: Vec<ContactSubmission> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "Ana");
        assert_eq!(stored[1].name, "Bo");
    }

    #[tokio::test]
    async fn sequential_appends_keep_submission_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::new(dir.path().join("submissions.json")).unwrap();

        store.append(submission("Ana", "a@x.com")).await.unwrap();
        store.append(submission("Bo", "b@x.com")).await.unwrap();

        let stored: Vec<ContactSubmission> =
            serde_json::from_slice(&std::fs::read(dir.path().join("submissions.json")).unwrap())
                .unwrap();
        assert_eq!(
            stored,
            vec![submission("Ana", "a@x.com"), submission("Bo", "b@x.com")]
        );
    }

    #[tokio::test]
    async fn stored_record_serializes_optional_fields_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.json");
        let store = ContactStore::new(path.clone()).unwrap();

        store.append(submission("Ana", "a@x.com")).await.unwrap();

        let stored: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            stored,
            serde_json::json!([
                {"name": "Ana", "email": "a@x.com", "plan": null, "message": null}
            ])
        );
    }

    #[tokio::test]
    async fn corrupt_file_surfaces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.json");
        std::fs::write(&path, "not json").unwrap();

        let store = ContactStore::new(path).unwrap();
        let result = store.append(submission("Ana", "a@x.com")).await;
        assert!(result.is_err());
    }
}
