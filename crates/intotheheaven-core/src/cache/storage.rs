use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::store::{CacheStore, StoreFile};
use super::CacheError;
use crate::http::{Request, Response};

/// Store file extension inside a storage directory.
const STORE_FILE_EXT: &str = "json";

/// The set of named cache stores visible to the offline controller.
///
/// Stores are kept in creation order; `keys` and `match_any` both follow it,
/// so the oldest store wins when two stores hold the same URL.
pub struct CacheStorage {
    root: Option<PathBuf>,
    stores: RwLock<Vec<Arc<CacheStore>>>,
}

impl CacheStorage {
    /// Storage that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            root: None,
            stores: RwLock::new(Vec::new()),
        }
    }

    /// Storage backed by one JSON file per store under `root`.
    ///
    /// Existing store files are loaded; unreadable ones are logged and skipped.
    pub fn open_dir(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        let mut stores = Vec::new();
        for entry in std::fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(STORE_FILE_EXT) {
                continue;
            }
            match Self::load_store(&path) {
                Ok(store) => stores.push(Arc::new(store)),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable cache store"),
            }
        }
        stores.sort_by_key(|store| store.created_at());

        info!(root = %root.display(), stores = stores.len(), "Cache storage opened");
        Ok(Self {
            root: Some(root),
            stores: RwLock::new(stores),
        })
    }

    fn load_store(path: &Path) -> Result<CacheStore, CacheError> {
        let contents = std::fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&contents)?;
        validate_name(&file.name)?;
        Ok(CacheStore::from_file(file, path.to_path_buf()))
    }

    fn store_path(&self, name: &str) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(format!("{}.{}", name, STORE_FILE_EXT)))
    }

    /// Open the named store, creating it if it does not exist yet.
    pub async fn open(&self, name: &str) -> Result<Arc<CacheStore>, CacheError> {
        validate_name(name)?;

        let mut stores = self.stores.write().await;
        if let Some(store) = stores.iter().find(|s| s.name() == name) {
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(CacheStore::new(name.to_string(), self.store_path(name)));
        store.write_file().await?;
        debug!(cache = name, "Created cache store");
        stores.push(Arc::clone(&store));
        Ok(store)
    }

    /// Look up a store without creating it.
    pub async fn store(&self, name: &str) -> Option<Arc<CacheStore>> {
        self.stores
            .read()
            .await
            .iter()
            .find(|s| s.name() == name)
            .cloned()
    }

    pub async fn has(&self, name: &str) -> bool {
        self.store(name).await.is_some()
    }

    /// Names of all stores, in creation order.
    pub async fn keys(&self) -> Vec<String> {
        self.stores
            .read()
            .await
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Delete a store and its backing file. Returns whether it existed.
    pub async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut stores = self.stores.write().await;
        let Some(index) = stores.iter().position(|s| s.name() == name) else {
            return Ok(false);
        };

        if let Some(path) = self.store_path(name) {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        stores.remove(index);
        debug!(cache = name, "Deleted cache store");
        Ok(true)
    }

    /// Search every store, oldest first, for a response to this request.
    pub async fn match_any(&self, request: &Request) -> Option<Response> {
        let stores: Vec<Arc<CacheStore>> = self.stores.read().await.clone();
        for store in stores {
            if let Some(response) = store.match_request(request).await {
                debug!(cache = store.name(), url = %request.url, "Cache hit");
                return Some(response);
            }
        }
        None
    }
}

fn validate_name(name: &str) -> Result<(), CacheError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(CacheError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn request(s: &str) -> Request {
        Request::get(Url::parse(s).unwrap())
    }

    #[tokio::test]
    async fn test_open_is_idempotent_and_ordered() {
        let storage = CacheStorage::in_memory();
        storage.open("app-static-v1").await.unwrap();
        storage.open("app-dynamic-v1").await.unwrap();
        storage.open("app-static-v1").await.unwrap();

        assert_eq!(storage.keys().await, vec!["app-static-v1", "app-dynamic-v1"]);
    }

    #[tokio::test]
    async fn test_invalid_names_are_rejected() {
        let storage = CacheStorage::in_memory();
        for name in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                storage.open(name).await,
                Err(CacheError::InvalidName(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_match_any_prefers_oldest_store() {
        let storage = CacheStorage::in_memory();
        let first = storage.open("first").await.unwrap();
        let second = storage.open("second").await.unwrap();
        let req = request("https://app.example/");

        second.put(&req, Response::with_body("second")).await.unwrap();
        assert_eq!(storage.match_any(&req).await.unwrap().text(), "second");

        first.put(&req, Response::with_body("first")).await.unwrap();
        assert_eq!(storage.match_any(&req).await.unwrap().text(), "first");
    }

    #[tokio::test]
    async fn test_delete_store() {
        let storage = CacheStorage::in_memory();
        storage.open("old").await.unwrap();

        assert!(storage.delete("old").await.unwrap());
        assert!(!storage.delete("old").await.unwrap());
        assert!(!storage.has("old").await);
    }

    #[tokio::test]
    async fn test_directory_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let req = request("https://app.example/groups");

        {
            let storage = CacheStorage::open_dir(dir.path()).unwrap();
            let store = storage.open("app-dynamic-v2").await.unwrap();
            store.put(&req, Response::html("<p>groups</p>")).await.unwrap();
            storage.open("app-empty-v2").await.unwrap();
        }

        let reopened = CacheStorage::open_dir(dir.path()).unwrap();
        assert_eq!(reopened.keys().await, vec!["app-dynamic-v2", "app-empty-v2"]);
        let hit = reopened.match_any(&req).await.unwrap();
        assert_eq!(hit.text(), "<p>groups</p>");
        assert_eq!(hit.content_type(), Some("text/html"));

        assert!(reopened.delete("app-empty-v2").await.unwrap());
        assert!(!dir.path().join("app-empty-v2.json").exists());
    }

    #[tokio::test]
    async fn test_unwritable_directory_caches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("caches");
        let storage = CacheStorage::open_dir(&root).unwrap();
        let store = storage.open("app-static-v2").await.unwrap();
        std::fs::remove_dir_all(&root).unwrap();

        let req = request("https://app.example/");
        assert!(store.put(&req, Response::html("<div></div>")).await.is_err());
        assert_eq!(store.len().await, 0);
        assert!(storage.match_any(&req).await.is_none());
    }
}
