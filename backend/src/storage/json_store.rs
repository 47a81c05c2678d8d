//! Single-document JSON state store.
//!
//! The entire application state lives in one file shaped as
//! `{users, families, members, logs}`. Reads and mutations run under one
//! global lock, and every mutation synchronously rewrites the whole
//! document before returning, so concurrent requests serialize on the
//! read-modify-persist sequence. There is no transaction boundary across
//! multiple logical changes; a crash mid-request can lose the most recent
//! write but cannot corrupt earlier ones.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::{Family, LogEntry, Member, User};
use tracing::{error, info};

use crate::error::{Result, ServiceError};

/// The persisted document. Missing top-level keys default to empty on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

pub struct JsonStore {
    path: PathBuf,
    data: Mutex<AppData>,
}

impl JsonStore {
    /// Open the store at `path`.
    ///
    /// A missing file is created with empty defaults. A corrupt or
    /// unreadable file is logged and left untouched on disk; the store
    /// starts from an empty in-memory state and the damaged content is only
    /// replaced by the next successful save.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(raw) => match serde_json::from_str::<AppData>(&raw) {
                    Ok(data) => data,
                    Err(e) => {
                        error!(
                            "State file {} is corrupt ({}); starting with empty state",
                            path.display(),
                            e
                        );
                        AppData::default()
                    }
                },
                Err(e) => {
                    error!(
                        "Could not read state file {} ({}); starting with empty state",
                        path.display(),
                        e
                    );
                    AppData::default()
                }
            }
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
            }
            let data = AppData::default();
            fs::write(&path, serde_json::to_string_pretty(&data)?)
                .with_context(|| format!("failed to create state file {}", path.display()))?;
            info!("Created new state file at {}", path.display());
            data
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Run a read-only closure against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&AppData) -> R) -> R {
        let data = self.data.lock().unwrap();
        f(&data)
    }

    /// Run a mutating closure, then rewrite the whole document.
    ///
    /// The lock is held across mutation and persistence. A failing closure
    /// leaves the file untouched; callers therefore validate before they
    /// mutate.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut AppData) -> Result<R>) -> Result<R> {
        let mut data = self.data.lock().unwrap();
        let out = f(&mut data)?;
        let raw = serde_json::to_string_pretty(&*data)
            .map_err(|e| ServiceError::Internal(e.into()))?;
        fs::write(&self.path, raw).map_err(|e| {
            ServiceError::Internal(
                anyhow::Error::new(e)
                    .context(format!("failed to persist state to {}", self.path.display())),
            )
        })?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Role;
    use tempfile::TempDir;

    fn sample_user() -> User {
        User {
            id: User::generate_id(),
            username: "priya".to_string(),
            password: "pw".to_string(),
            phone: "+919876543210".to_string(),
            role: Role::HeadOfFamily,
            family_id: Family::generate_id(),
        }
    }

    #[test]
    fn test_open_missing_file_creates_empty_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonStore::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(store.read(|d| d.users.len()), 0);
        assert_eq!(store.read(|d| d.logs.len()), 0);
    }

    #[test]
    fn test_open_corrupt_file_degrades_without_repairing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = JsonStore::open(&path).unwrap();

        assert_eq!(store.read(|d| d.users.len()), 0);
        // The damaged file stays on disk until the next save.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json at all");
    }

    #[test]
    fn test_missing_top_level_keys_default_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"users": []}"#).unwrap();

        let store = JsonStore::open(&path).unwrap();

        assert_eq!(store.read(|d| d.families.len()), 0);
        assert_eq!(store.read(|d| d.members.len()), 0);
        assert_eq!(store.read(|d| d.logs.len()), 0);
    }

    #[test]
    fn test_mutation_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        {
            let store = JsonStore::open(&path).unwrap();
            store
                .mutate(|data| {
                    data.users.push(sample_user());
                    Ok(())
                })
                .unwrap();
        }

        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.read(|d| d.users.len()), 1);
        assert_eq!(reopened.read(|d| d.users[0].username.clone()), "priya");
    }

    #[test]
    fn test_failed_mutation_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonStore::open(&path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let result: Result<()> = store.mutate(|data| {
            data.users.push(sample_user());
            Err(ServiceError::NotFound("member".into()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
