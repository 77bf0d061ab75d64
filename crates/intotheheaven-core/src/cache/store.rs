use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::entry::{CachedData, EntryInfo, StoredResponse};
use super::CacheError;
use crate::http::{Request, Response};

/// Cache key for a URL: the full URL with any fragment removed.
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// On-disk form of a whole store.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StoreFile {
    pub(crate) name: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) entries: BTreeMap<String, CachedData<StoredResponse>>,
}

/// A single named store of request → response pairs.
pub struct CacheStore {
    name: String,
    created_at: DateTime<Utc>,
    entries: RwLock<BTreeMap<String, CachedData<Response>>>,
    path: Option<PathBuf>,
}

impl CacheStore {
    pub(crate) fn new(name: String, path: Option<PathBuf>) -> Self {
        Self {
            name,
            created_at: Utc::now(),
            entries: RwLock::new(BTreeMap::new()),
            path,
        }
    }

    pub(crate) fn from_file(file: StoreFile, path: PathBuf) -> Self {
        let entries = file
            .entries
            .into_iter()
            .map(|(key, cached)| {
                let entry = CachedData {
                    data: cached.data.into_response(),
                    cached_at: cached.cached_at,
                };
                (key, entry)
            })
            .collect();

        Self {
            name: file.name,
            created_at: file.created_at,
            entries: RwLock::new(entries),
            path: Some(path),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up the response stored for a request. Non-GET requests never match.
    pub async fn match_request(&self, request: &Request) -> Option<Response> {
        if request.method != Method::GET {
            return None;
        }
        let key = cache_key(&request.url);
        self.entries
            .read()
            .await
            .get(&key)
            .map(|cached| cached.data.clone())
    }

    /// Store a response, replacing any previous entry for the same URL.
    pub async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        self.put_all(vec![(request.clone(), response)]).await
    }

    /// Store several responses at once. Either every pair is stored or none is.
    pub async fn put_all(&self, pairs: Vec<(Request, Response)>) -> Result<(), CacheError> {
        if let Some((request, _)) = pairs.iter().find(|(r, _)| r.method != Method::GET) {
            return Err(CacheError::UnsupportedMethod(request.method.to_string()));
        }

        // Memory only changes once the file write succeeded
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        for (request, response) in pairs {
            let key = cache_key(&request.url);
            debug!(cache = %self.name, key = %key, status = %response.status, "Caching response");
            next.insert(key, CachedData::new(response));
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    pub async fn delete(&self, request: &Request) -> Result<bool, CacheError> {
        let mut entries = self.entries.write().await;
        let key = cache_key(&request.url);
        if !entries.contains_key(&key) {
            return Ok(false);
        }

        let mut next = entries.clone();
        next.remove(&key);
        self.persist(&next)?;
        *entries = next;
        Ok(true)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn entries(&self) -> Vec<EntryInfo> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(key, cached)| EntryInfo {
                key: key.clone(),
                status: cached.data.status.as_u16(),
                size_bytes: cached.data.body.len(),
                age: cached.age_display(),
            })
            .collect()
    }

    pub(crate) async fn write_file(&self) -> Result<(), CacheError> {
        let entries = self.entries.read().await;
        self.persist(&entries)
    }

    fn persist(&self, entries: &BTreeMap<String, CachedData<Response>>) -> Result<(), CacheError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        let file = StoreFile {
            name: self.name.clone(),
            created_at: self.created_at,
            entries: entries
                .iter()
                .map(|(key, cached)| {
                    let stored = CachedData {
                        data: StoredResponse::from(&cached.data),
                        cached_at: cached.cached_at,
                    };
                    (key.clone(), stored)
                })
                .collect(),
        };

        let contents = serde_json::to_string(&file)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
