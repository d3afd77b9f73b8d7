//! Filesystem storage backend.
//!
//! Each key maps to `<root>/<component>/.../<last>.json`, where components are
//! the `:`-separated parts of the key. A scoped key such as
//! `3f2a...:gamershop_cart` therefore lands in a per-visitor directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{Store, StoreError};

/// Stores each value in its own file under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let mut path = self.root.clone();
        let mut components = key.split(':').peekable();

        while let Some(component) = components.next() {
            if !is_valid_component(component) {
                return Err(StoreError::InvalidKey(key.to_string()));
            }
            if components.peek().is_some() {
                path.push(component);
            } else {
                path.push(format!("{component}.json"));
            }
        }

        Ok(path)
    }
}

fn is_valid_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && component
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target and rename so readers never see a partial file.
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&temp_path, value)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn temp_store() -> (TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_round_trip_and_layout() {
        let (_dir, store) = temp_store();
        store.write("visitor-1:gamershop_cart", "[]").unwrap();

        assert_eq!(
            store.read("visitor-1:gamershop_cart").unwrap().as_deref(),
            Some("[]")
        );
        assert!(store.root().join("visitor-1/gamershop_cart.json").is_file());
    }

    #[test]
    fn test_read_missing_key() {
        let (_dir, store) = temp_store();
        assert!(store.read("missing").unwrap().is_none());
    }

    #[test]
    fn test_remove() {
        let (_dir, store) = temp_store();
        store.write("k", "v").unwrap();
        store.remove("k").unwrap();
        assert!(store.read("k").unwrap().is_none());
        store.remove("k").unwrap();
    }

    #[test]
    fn test_rejects_path_traversal() {
        let (_dir, store) = temp_store();
        for key in ["..:etc", "a/b", "", "a::b", ".", "a:..:b"] {
            assert!(
                matches!(store.write(key, "x"), Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (_dir, store) = temp_store();
        store.write("k", "one").unwrap();
        store.write("k", "two").unwrap();

        let names: Vec<String> = fs::read_dir(store.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }
}
