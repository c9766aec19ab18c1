use asset_host::{
    MemoryObjectStore, NoopObjectStore, ObjectStoreClient, ObjectStoreFuture, StoreListing,
    StoreRef,
};

use crate::{FirebaseStorageConfig, WebObjectStore};

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected object-store strategy for the active build.
pub enum StoreStrategy {
    /// Firebase Storage over browser `fetch`.
    Browser,
    /// In-process store for demos and offline development.
    Memory,
}

/// Returns the compile-time selected store strategy for the active build.
pub const fn selected_store_strategy() -> StoreStrategy {
    #[cfg(feature = "memory-store")]
    {
        StoreStrategy::Memory
    }

    #[cfg(not(feature = "memory-store"))]
    {
        StoreStrategy::Browser
    }
}

/// Returns the selected store strategy as a stable string token.
pub fn store_strategy_name() -> &'static str {
    match selected_store_strategy() {
        StoreStrategy::Browser => "browser",
        StoreStrategy::Memory => "memory",
    }
}

/// Adapter enum that erases the concrete store backend behind [`ObjectStoreClient`].
#[derive(Debug, Clone)]
pub enum ObjectStoreAdapter {
    /// Firebase Storage REST backend.
    Browser(WebObjectStore),
    /// In-process backend.
    Memory(MemoryObjectStore),
    /// Fallback used when the browser backend has no bucket configured.
    Noop(NoopObjectStore),
}

impl ObjectStoreClient for ObjectStoreAdapter {
    fn list<'a>(&'a self, prefix: &'a str) -> ObjectStoreFuture<'a, Result<StoreListing, String>> {
        match self {
            Self::Browser(store) => store.list(prefix),
            Self::Memory(store) => store.list(prefix),
            Self::Noop(store) => store.list(prefix),
        }
    }

    fn put<'a>(
        &'a self,
        path: &'a str,
        bytes: &'a [u8],
        content_type: &'a str,
    ) -> ObjectStoreFuture<'a, Result<StoreRef, String>> {
        match self {
            Self::Browser(store) => store.put(path, bytes, content_type),
            Self::Memory(store) => store.put(path, bytes, content_type),
            Self::Noop(store) => store.put(path, bytes, content_type),
        }
    }

    fn download_url<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<String, String>> {
        match self {
            Self::Browser(store) => store.download_url(path),
            Self::Memory(store) => store.download_url(path),
            Self::Noop(store) => store.download_url(path),
        }
    }

    fn delete<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.delete(path),
            Self::Memory(store) => store.delete(path),
            Self::Noop(store) => store.delete(path),
        }
    }
}

/// Builds the object store for the selected strategy.
///
/// The browser strategy needs bucket settings; without them the no-op store is returned so
/// listings render empty instead of failing.
pub fn object_store_client(config: Option<FirebaseStorageConfig>) -> ObjectStoreAdapter {
    match selected_store_strategy() {
        StoreStrategy::Browser => match config {
            Some(config) => ObjectStoreAdapter::Browser(WebObjectStore::new(config)),
            None => ObjectStoreAdapter::Noop(NoopObjectStore),
        },
        StoreStrategy::Memory => ObjectStoreAdapter::Memory(MemoryObjectStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn strategy_name_matches_selected_strategy() {
        let expected = if cfg!(feature = "memory-store") {
            "memory"
        } else {
            "browser"
        };
        assert_eq!(store_strategy_name(), expected);
    }

    #[cfg(not(feature = "memory-store"))]
    #[test]
    fn browser_strategy_without_bucket_falls_back_to_noop() {
        let adapter = object_store_client(None);
        assert!(matches!(adapter, ObjectStoreAdapter::Noop(_)));
        assert!(block_on(adapter.list("multimedia")).expect("list").is_empty());

        let configured = object_store_client(Some(FirebaseStorageConfig::new("demo")));
        assert!(matches!(configured, ObjectStoreAdapter::Browser(_)));
    }

    #[test]
    fn memory_adapter_delegates() {
        let memory = MemoryObjectStore::new();
        let adapter = ObjectStoreAdapter::Memory(memory.clone());
        block_on(adapter.put("multimedia/a.webp", b"a", "image/webp")).expect("put");
        assert!(memory.contains("multimedia/a.webp"));
        let listing = block_on(adapter.list("multimedia")).expect("list");
        assert_eq!(listing.items.len(), 1);
        block_on(adapter.delete("multimedia/a.webp")).expect("delete");
        assert!(!memory.contains("multimedia/a.webp"));
    }
}
