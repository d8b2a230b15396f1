//! services/api/src/adapters/store.rs
//!
//! This module contains the document store adapter, which is the concrete
//! implementation of the `DocumentStore` port from the `core` crate. Resumes
//! are kept as whole-file JSON documents in a flat directory, one file per
//! resume name.

use async_trait::async_trait;
use resume_assistant_core::domain::Resume;
use resume_assistant_core::ports::{DocumentStore, PortError, PortResult};
use std::path::{Path, PathBuf};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-system backed document store.
///
/// Saves overwrite the whole document; concurrent writers of the same resume
/// are last-write-wins at file granularity.
#[derive(Clone)]
pub struct FsDocumentStore {
    resume_dir: PathBuf,
}

impl FsDocumentStore {
    /// Creates the store, ensuring its directory layout exists on disk.
    pub fn new(base_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let resume_dir = base_dir.as_ref().join("resumes");
        std::fs::create_dir_all(&resume_dir)?;
        Ok(Self { resume_dir })
    }

    fn resume_path(&self, resume_name: &str) -> PortResult<PathBuf> {
        // Names are flat file names; anything that would escape the directory
        // is rejected.
        if resume_name.is_empty()
            || resume_name.contains('/')
            || resume_name.contains('\\')
            || resume_name.contains("..")
        {
            return Err(PortError::Unexpected(format!(
                "Invalid resume name: '{}'",
                resume_name
            )));
        }
        Ok(self.resume_dir.join(resume_name))
    }
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn list_resumes(&self) -> PortResult<Vec<String>> {
        let resume_dir = self.resume_dir.clone();
        let mut names = tokio::task::spawn_blocking(move || -> std::io::Result<Vec<String>> {
            let mut names = Vec::new();
            for entry in std::fs::read_dir(&resume_dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            Ok(names)
        })
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        names.sort();
        Ok(names)
    }

    async fn get_resume(&self, resume_name: &str) -> PortResult<Resume> {
        let path = self.resume_path(resume_name)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PortError::NotFound(resume_name.to_string()));
            }
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };
        serde_json::from_str(&contents).map_err(|e| {
            PortError::Unexpected(format!("Resume '{}' is not readable: {}", resume_name, e))
        })
    }

    async fn save_resume(&self, resume: &Resume, resume_name: &str) -> PortResult<()> {
        let path = self.resume_path(resume_name)?;
        let contents = serde_json::to_string_pretty(resume)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        info!("Saved resume '{}'", resume_name);
        Ok(())
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use resume_assistant_core::domain::{ResumeElement, Skill};

    fn new_store() -> (FsDocumentStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path()).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (store, _dir) = new_store();
        let mut resume = Resume::new("Ada", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        resume.skills.push(Skill {
            id: "ski_00000001".to_string(),
            name: "Rust".to_string(),
            ..Skill::default()
        });

        store.save_resume(&resume, "ada.json").await.unwrap();
        let loaded = store.get_resume("ada.json").await.unwrap();
        assert_eq!(loaded, resume);
        assert_eq!(store.list_resumes().await.unwrap(), vec!["ada.json"]);
    }

    #[tokio::test]
    async fn missing_resume_is_not_found() {
        let (store, _dir) = new_store();
        match store.get_resume("ghost.json").await {
            Err(PortError::NotFound(name)) => assert_eq!(name, "ghost.json"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn path_escaping_names_are_rejected() {
        let (store, _dir) = new_store();
        assert!(store.get_resume("../escape.json").await.is_err());
        assert!(store
            .save_resume(
                &Resume::new("X", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
                "a/b.json"
            )
            .await
            .is_err());
    }

    #[tokio::test]
    async fn saved_edit_survives_reload() {
        let (store, _dir) = new_store();
        let mut resume = Resume::new("Ada", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        resume.skills.push(Skill {
            id: "ski_00000001".to_string(),
            name: "Rust".to_string(),
            ..Skill::default()
        });
        store.save_resume(&resume, "ada.json").await.unwrap();

        let mut loaded = store.get_resume("ada.json").await.unwrap();
        let replacement = Skill {
            id: "ski_00000001".to_string(),
            name: "Systems programming".to_string(),
            ..Skill::default()
        };
        assert!(loaded.update_element("ski_00000001", ResumeElement::Skill(replacement)));
        store.save_resume(&loaded, "ada.json").await.unwrap();

        let reloaded = store.get_resume("ada.json").await.unwrap();
        assert_eq!(reloaded.skills[0].name, "Systems programming");
    }
}
