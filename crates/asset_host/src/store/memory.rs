//! In-memory object store used by tests and offline builds.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashSet},
    rc::Rc,
};

use super::service::{ObjectStoreClient, ObjectStoreFuture};
use super::types::{StoreListing, StoreObject, StoreRef};
use crate::path::PATH_SEPARATOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Store operation kind, used to target injected failures.
pub enum MemoryStoreOp {
    /// [`ObjectStoreClient::list`].
    List,
    /// [`ObjectStoreClient::put`].
    Put,
    /// [`ObjectStoreClient::download_url`].
    DownloadUrl,
    /// [`ObjectStoreClient::delete`].
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Object stored by [`MemoryObjectStore`].
pub struct MemoryObject {
    /// Raw object bytes.
    pub bytes: Vec<u8>,
    /// Content type supplied at upload time.
    pub content_type: String,
    /// Access token embedded in download URLs; rotated on every overwrite.
    pub token: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    objects: BTreeMap<String, MemoryObject>,
    failures: HashSet<(MemoryStoreOp, String)>,
    deleted: Vec<String>,
    next_token: u64,
}

#[derive(Debug, Clone, Default)]
/// Ordered in-memory object store keyed by full path.
///
/// Listings come back in lexicographic key order, like most cloud stores. Clones share state.
pub struct MemoryObjectStore {
    inner: Rc<RefCell<MemoryState>>,
}

impl MemoryObjectStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object synchronously (test seeding).
    pub fn insert(&self, path: &str, bytes: &[u8], content_type: &str) {
        self.inner.borrow_mut().store(path, bytes, content_type);
    }

    /// Makes every future `op` on exactly `path` fail until [`Self::clear_failures`].
    pub fn fail_on(&self, op: MemoryStoreOp, path: &str) {
        self.inner
            .borrow_mut()
            .failures
            .insert((op, path.to_string()));
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.inner.borrow_mut().failures.clear();
    }

    /// Returns `true` when an object exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.inner.borrow().objects.contains_key(path)
    }

    /// Returns a copy of the object at `path`.
    pub fn object(&self, path: &str) -> Option<MemoryObject> {
        self.inner.borrow().objects.get(path).cloned()
    }

    /// Returns every stored key in order.
    pub fn paths(&self) -> Vec<String> {
        self.inner.borrow().objects.keys().cloned().collect()
    }

    /// Returns successfully deleted keys in deletion order.
    pub fn deleted_paths(&self) -> Vec<String> {
        self.inner.borrow().deleted.clone()
    }

    fn check(&self, op: MemoryStoreOp, path: &str) -> Result<(), String> {
        if self
            .inner
            .borrow()
            .failures
            .contains(&(op, path.to_string()))
        {
            return Err(format!("injected {op:?} failure for `{path}`"));
        }
        Ok(())
    }
}

impl MemoryState {
    fn store(&mut self, path: &str, bytes: &[u8], content_type: &str) -> StoreRef {
        self.next_token += 1;
        self.objects.insert(
            path.to_string(),
            MemoryObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
                token: self.next_token,
            },
        );
        StoreRef {
            full_path: path.to_string(),
            size: bytes.len() as u64,
            content_type: content_type.to_string(),
        }
    }

    fn list(&self, prefix: &str) -> StoreListing {
        let base = format!("{}{PATH_SEPARATOR}", prefix.trim_end_matches(PATH_SEPARATOR));
        let mut listing = StoreListing::default();
        let mut seen = BTreeSet::new();
        for key in self.objects.keys() {
            let Some(rest) = key.strip_prefix(base.as_str()) else {
                continue;
            };
            match rest.split_once(PATH_SEPARATOR) {
                Some((child, _)) => {
                    if seen.insert(child.to_string()) {
                        listing
                            .sub_prefixes
                            .push(StoreObject::from_full_path(format!("{base}{child}")));
                    }
                }
                None => listing.items.push(StoreObject::from_full_path(key.clone())),
            }
        }
        listing
    }
}

impl ObjectStoreClient for MemoryObjectStore {
    fn list<'a>(&'a self, prefix: &'a str) -> ObjectStoreFuture<'a, Result<StoreListing, String>> {
        Box::pin(async move {
            self.check(MemoryStoreOp::List, prefix)?;
            Ok(self.inner.borrow().list(prefix))
        })
    }

    fn put<'a>(
        &'a self,
        path: &'a str,
        bytes: &'a [u8],
        content_type: &'a str,
    ) -> ObjectStoreFuture<'a, Result<StoreRef, String>> {
        Box::pin(async move {
            self.check(MemoryStoreOp::Put, path)?;
            Ok(self.inner.borrow_mut().store(path, bytes, content_type))
        })
    }

    fn download_url<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<String, String>> {
        Box::pin(async move {
            self.check(MemoryStoreOp::DownloadUrl, path)?;
            let state = self.inner.borrow();
            let object = state
                .objects
                .get(path)
                .ok_or_else(|| format!("object not found: `{path}`"))?;
            Ok(format!("memory://{path}?token={}", object.token))
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.check(MemoryStoreOp::Delete, path)?;
            let mut state = self.inner.borrow_mut();
            if state.objects.remove(path).is_none() {
                return Err(format!("object not found: `{path}`"));
            }
            state.deleted.push(path.to_string());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn names(objects: &[StoreObject]) -> Vec<&str> {
        objects.iter().map(|o| o.full_path.as_str()).collect()
    }

    #[test]
    fn list_partitions_one_level_into_items_and_prefixes() {
        let store = MemoryObjectStore::new();
        store.insert("multimedia/a.webp", b"a", "image/webp");
        store.insert("multimedia/bts/photo.webp", b"p", "image/webp");
        store.insert("multimedia/bts/2024/x.webp", b"x", "image/webp");
        store.insert("multimedia/office/.keep", b"", "application/octet-stream");
        store.insert("multimediax/other.webp", b"o", "image/webp");

        let root = block_on(store.list("multimedia")).expect("list");
        assert_eq!(names(&root.items), vec!["multimedia/a.webp"]);
        assert_eq!(
            names(&root.sub_prefixes),
            vec!["multimedia/bts", "multimedia/office"]
        );
        assert_eq!(root.sub_prefixes[0].name, "bts");

        let bts = block_on(store.list("multimedia/bts/")).expect("list");
        assert_eq!(names(&bts.items), vec!["multimedia/bts/photo.webp"]);
        assert_eq!(names(&bts.sub_prefixes), vec!["multimedia/bts/2024"]);
    }

    #[test]
    fn overwrite_rotates_download_token() {
        let store = MemoryObjectStore::new();
        block_on(store.put("multimedia/a.webp", b"1", "image/webp")).expect("put");
        let first = block_on(store.download_url("multimedia/a.webp")).expect("url");
        block_on(store.put("multimedia/a.webp", b"2", "image/webp")).expect("put");
        let second = block_on(store.download_url("multimedia/a.webp")).expect("url");
        assert_ne!(first, second);
        assert_eq!(
            store.object("multimedia/a.webp").map(|o| o.bytes),
            Some(b"2".to_vec())
        );
    }

    #[test]
    fn injected_failures_target_one_operation_and_path() {
        let store = MemoryObjectStore::new();
        store.insert("multimedia/a.webp", b"a", "image/webp");
        store.insert("multimedia/b.webp", b"b", "image/webp");
        store.fail_on(MemoryStoreOp::Delete, "multimedia/a.webp");

        assert!(block_on(store.delete("multimedia/a.webp")).is_err());
        block_on(store.delete("multimedia/b.webp")).expect("delete b");
        assert!(store.contains("multimedia/a.webp"));
        assert_eq!(store.deleted_paths(), vec!["multimedia/b.webp".to_string()]);

        store.clear_failures();
        block_on(store.delete("multimedia/a.webp")).expect("delete a");
        assert!(store.paths().is_empty());
    }

    #[test]
    fn missing_objects_fail_delete_and_url_lookup() {
        let store = MemoryObjectStore::new();
        assert!(block_on(store.delete("multimedia/none")).is_err());
        assert!(block_on(store.download_url("multimedia/none")).is_err());
    }
}
