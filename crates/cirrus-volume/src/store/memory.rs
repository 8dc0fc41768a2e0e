//! In-memory object store for tests and local development.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use jiff::Timestamp;

use crate::error::{Error, Result};
use crate::store::ObjectStore;
use crate::types::{ObjectInfo, ObjectPage, WriteMetadata};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    metadata: WriteMetadata,
    last_modified: Timestamp,
}

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<String, StoredObject>,
    buckets: Vec<String>,
    regions: HashMap<String, String>,
    denied_locations: HashSet<String>,
}

/// Object store holding everything in process memory.
///
/// Mirrors the upstream semantics the adapter relies on: idempotent
/// deletes, delimiter listings with common prefixes, and per-bucket
/// location lookups that can be denied for discovery tests.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    state: Mutex<State>,
}

impl MemoryObjectStore {
    /// Creates an empty store with no buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bucket with the given region to the account inventory.
    pub fn with_bucket(self, name: impl Into<String>, region: impl Into<String>) -> Self {
        {
            let mut state = self.state_mut();
            let name = name.into();
            state.regions.insert(name.clone(), region.into());
            state.buckets.push(name);
        }
        self
    }

    /// Makes location lookups for `name` fail with an access error.
    pub fn with_denied_location(self, name: impl Into<String>) -> Self {
        self.state_mut().denied_locations.insert(name.into());
        self
    }

    /// Returns the metadata stored alongside `key`, if the key exists.
    pub fn stored_metadata(&self, key: &str) -> Option<WriteMetadata> {
        self.state_mut()
            .objects
            .get(key)
            .map(|object| object.metadata.clone())
    }

    /// Returns whether an object exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.state_mut().objects.contains_key(key)
    }

    fn state_mut(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, key: &str, body: Bytes, metadata: &WriteMetadata) -> Result<()> {
        self.state_mut().objects.insert(
            key.to_string(),
            StoredObject {
                data: body,
                metadata: metadata.clone(),
                last_modified: Timestamp::now(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        self.state_mut()
            .objects
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| Error::not_found(key))
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.state_mut().objects.remove(key);
        Ok(())
    }

    async fn copy_object(&self, src: &str, dst: &str) -> Result<()> {
        let mut state = self.state_mut();
        let source = state
            .objects
            .get(src)
            .cloned()
            .ok_or_else(|| Error::not_found(src))?;
        state.objects.insert(
            dst.to_string(),
            StoredObject {
                last_modified: Timestamp::now(),
                ..source
            },
        );
        Ok(())
    }

    async fn head_object(&self, key: &str) -> Result<ObjectInfo> {
        self.state_mut()
            .objects
            .get(key)
            .map(|object| {
                ObjectInfo::new(key, object.data.len() as u64)
                    .with_last_modified(object.last_modified)
            })
            .ok_or_else(|| Error::not_found(key))
    }

    async fn list_page(&self, prefix: &str, _token: Option<String>) -> Result<ObjectPage> {
        let state = self.state_mut();
        let mut objects = Vec::new();
        let mut common_prefixes = BTreeSet::new();

        for (key, object) in state.objects.range(prefix.to_string()..) {
            let Some(rest) = key.strip_prefix(prefix) else {
                break;
            };
            match rest.find('/') {
                Some(index) => {
                    common_prefixes.insert(format!("{prefix}{}", &rest[..=index]));
                }
                None => {
                    objects.push(
                        ObjectInfo::new(key, object.data.len() as u64)
                            .with_last_modified(object.last_modified),
                    );
                }
            }
        }

        Ok(ObjectPage {
            objects,
            common_prefixes: common_prefixes.into_iter().collect(),
            next_token: None,
        })
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(self.state_mut().buckets.clone())
    }

    async fn bucket_location(&self, bucket: &str) -> Result<String> {
        let state = self.state_mut();
        if state.denied_locations.contains(bucket) {
            return Err(Error::transport_message(format!(
                "access denied for bucket {bucket}"
            )));
        }
        Ok(state.regions.get(bucket).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryObjectStore::new();
        store.delete_object("missing").await.unwrap();

        store
            .put_object("a.txt", Bytes::from_static(b"x"), &WriteMetadata::new())
            .await
            .unwrap();
        store.delete_object("a.txt").await.unwrap();
        store.delete_object("a.txt").await.unwrap();
        assert!(!store.contains("a.txt"));
    }

    #[tokio::test]
    async fn list_page_folds_nested_keys_into_prefixes() {
        let store = MemoryObjectStore::new();
        for key in ["sub/a.txt", "sub/photos/b.png", "sub/photos/c.png", "other/d"] {
            store
                .put_object(key, Bytes::from_static(b"x"), &WriteMetadata::new())
                .await
                .unwrap();
        }

        let page = store.list_page("sub/", None).await.unwrap();
        let keys: Vec<_> = page.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["sub/a.txt"]);
        assert_eq!(page.common_prefixes, ["sub/photos/"]);
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn denied_location_fails_while_others_succeed() {
        let store = MemoryObjectStore::new()
            .with_bucket("open", "eu-west-1")
            .with_bucket("closed", "us-east-2")
            .with_denied_location("closed");

        assert_eq!(store.bucket_location("open").await.unwrap(), "eu-west-1");
        assert!(store.bucket_location("closed").await.unwrap_err().is_transport());
    }
}
