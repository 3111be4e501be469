//! Last view state, kept between runs the way a browser keeps the address bar.
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use directory_core::ItemKind;
use directory_logging::{directory_debug, directory_info, directory_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("could not encode view state: {0}")]
    Encode(#[from] ron::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedView {
    kind: String,
    query: String,
    saved_at: String,
}

fn state_filename(kind: ItemKind) -> String {
    format!(".directory_{}.ron", kind.collection())
}

/// Address query saved by the previous run for `kind`, if any.
pub(crate) fn load_query(state_dir: &Path, kind: ItemKind) -> Option<String> {
    let path = state_dir.join(state_filename(kind));
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            directory_warn!("Failed to read view state from {:?}: {}", path, err);
            return None;
        }
    };

    let view: PersistedView = match ron::from_str(&content) {
        Ok(view) => view,
        Err(err) => {
            directory_warn!("Failed to parse view state from {:?}: {}", path, err);
            return None;
        }
    };
    if view.kind != kind.collection() {
        directory_warn!(
            "View state in {:?} is for {:?}, ignoring",
            path,
            view.kind
        );
        return None;
    }

    directory_info!("Restored view state saved at {}", view.saved_at);
    Some(view.query)
}

/// Replaces the saved address query for `kind`.
pub(crate) fn save_query(
    state_dir: &Path,
    kind: ItemKind,
    query: &str,
) -> Result<PathBuf, PersistError> {
    let view = PersistedView {
        kind: kind.collection().to_string(),
        query: query.to_string(),
        saved_at: Utc::now().to_rfc3339(),
    };
    let content = ron::ser::to_string_pretty(&view, ron::ser::PrettyConfig::new())?;
    let target = write_atomic(state_dir, &state_filename(kind), &content)?;
    directory_debug!("View state written to {:?}", target);
    Ok(target)
}

fn ensure_state_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StateDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes to a temp file in `dir`, then renames it over `{dir}/{filename}`.
fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    ensure_state_dir(dir)?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_query_is_restored_per_kind() {
        let dir = tempfile::tempdir().unwrap();

        save_query(dir.path(), ItemKind::Places, "search=kafe&page=2").unwrap();
        save_query(dir.path(), ItemKind::Events, "categories=Koncert").unwrap();

        assert_eq!(
            load_query(dir.path(), ItemKind::Places).as_deref(),
            Some("search=kafe&page=2")
        );
        assert_eq!(
            load_query(dir.path(), ItemKind::Events).as_deref(),
            Some("categories=Koncert")
        );
    }

    #[test]
    fn saving_again_replaces_the_previous_query() {
        let dir = tempfile::tempdir().unwrap();
        save_query(dir.path(), ItemKind::Places, "page=2").unwrap();
        let path = save_query(dir.path(), ItemKind::Places, "").unwrap();

        assert_eq!(path, dir.path().join(".directory_places.ron"));
        assert_eq!(load_query(dir.path(), ItemKind::Places).as_deref(), Some(""));
    }

    #[test]
    fn missing_or_corrupt_state_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_query(dir.path(), ItemKind::Places), None);

        fs::write(dir.path().join(".directory_places.ron"), "not ron at all (").unwrap();
        assert_eq!(load_query(dir.path(), ItemKind::Places), None);
    }

    #[test]
    fn state_dir_is_created_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("state");
        save_query(&nested, ItemKind::Events, "page=3").unwrap();
        assert_eq!(load_query(&nested, ItemKind::Events).as_deref(), Some("page=3"));
    }

    #[test]
    fn file_in_place_of_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blocker");
        fs::write(&file, "x").unwrap();

        let err = save_query(&file, ItemKind::Places, "page=1").unwrap_err();
        assert!(matches!(err, PersistError::StateDir(_)));
    }
}
