//! Object-store client contract consumed by the asset explorer.

use std::{future::Future, pin::Pin, rc::Rc};

use super::types::{StoreListing, StoreRef};

/// Object-safe boxed future used by [`ObjectStoreClient`] async methods.
pub type ObjectStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Flat, prefix-addressed object store.
///
/// Keys are case-sensitive strings separated by `/`. Errors are opaque text: the explorer
/// collapses every store cause into its own error kinds.
pub trait ObjectStoreClient {
    /// Lists one level under `prefix` (given without trailing separator).
    fn list<'a>(&'a self, prefix: &'a str) -> ObjectStoreFuture<'a, Result<StoreListing, String>>;

    /// Stores `bytes` at `path`, replacing any existing object.
    fn put<'a>(
        &'a self,
        path: &'a str,
        bytes: &'a [u8],
        content_type: &'a str,
    ) -> ObjectStoreFuture<'a, Result<StoreRef, String>>;

    /// Resolves a fetchable, possibly time-limited access URL for the object at `path`.
    fn download_url<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<String, String>>;

    /// Deletes the object at `path`.
    fn delete<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<(), String>>;
}

impl<T: ObjectStoreClient + ?Sized> ObjectStoreClient for Rc<T> {
    fn list<'a>(&'a self, prefix: &'a str) -> ObjectStoreFuture<'a, Result<StoreListing, String>> {
        (**self).list(prefix)
    }

    fn put<'a>(
        &'a self,
        path: &'a str,
        bytes: &'a [u8],
        content_type: &'a str,
    ) -> ObjectStoreFuture<'a, Result<StoreRef, String>> {
        (**self).put(path, bytes, content_type)
    }

    fn download_url<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<String, String>> {
        (**self).download_url(path)
    }

    fn delete<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        (**self).delete(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op object store for unsupported targets and baseline tests.
///
/// Listings are empty; every mutation and URL lookup fails.
pub struct NoopObjectStore;

impl NoopObjectStore {
    fn unsupported_error(op: &str) -> String {
        format!("object store unavailable: {op}")
    }
}

impl ObjectStoreClient for NoopObjectStore {
    fn list<'a>(&'a self, _prefix: &'a str) -> ObjectStoreFuture<'a, Result<StoreListing, String>> {
        Box::pin(async { Ok(StoreListing::default()) })
    }

    fn put<'a>(
        &'a self,
        _path: &'a str,
        _bytes: &'a [u8],
        _content_type: &'a str,
    ) -> ObjectStoreFuture<'a, Result<StoreRef, String>> {
        Box::pin(async { Err(Self::unsupported_error("put")) })
    }

    fn download_url<'a>(&'a self, _path: &'a str) -> ObjectStoreFuture<'a, Result<String, String>> {
        Box::pin(async { Err(Self::unsupported_error("download_url")) })
    }

    fn delete<'a>(&'a self, _path: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Err(Self::unsupported_error("delete")) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn noop_object_store_lists_nothing_and_rejects_mutations() {
        let store = NoopObjectStore;
        let store_obj: &dyn ObjectStoreClient = &store;

        assert!(block_on(store_obj.list("multimedia")).expect("list").is_empty());
        let err = block_on(store_obj.put("multimedia/a", b"x", "text/plain"))
            .expect_err("put should fail");
        assert!(err.contains("put"));
        assert!(block_on(store_obj.delete("multimedia/a")).is_err());
        assert!(block_on(store_obj.download_url("multimedia/a")).is_err());
    }

    #[test]
    fn rc_wrapped_store_delegates() {
        let store: Rc<dyn ObjectStoreClient> = Rc::new(NoopObjectStore);
        let err = block_on(store.delete("multimedia/a")).expect_err("delete should fail");
        assert!(err.contains("delete"));
    }
}
