//! Browser object store backed by Firebase Storage REST calls.

use std::{cell::RefCell, rc::Rc};

use asset_host::{ObjectStoreClient, ObjectStoreFuture, StoreListing, StoreRef};

use crate::bridge;
use crate::config::FirebaseStorageConfig;
use crate::rest;

#[derive(Debug, Clone)]
/// [`ObjectStoreClient`] over one storage bucket.
///
/// Clones share the auth token slot, so a token refreshed by the login flow is picked up by
/// every clone on its next request.
pub struct WebObjectStore {
    config: Rc<FirebaseStorageConfig>,
    auth_token: Rc<RefCell<Option<String>>>,
}

impl WebObjectStore {
    /// Creates a store for the configured bucket with no auth token.
    pub fn new(config: FirebaseStorageConfig) -> Self {
        Self {
            config: Rc::new(config),
            auth_token: Rc::new(RefCell::new(None)),
        }
    }

    /// Bucket settings.
    pub fn config(&self) -> &FirebaseStorageConfig {
        &self.config
    }

    /// Replaces the ID token sent with every request. `None` sends anonymous requests.
    pub fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.borrow_mut() = token;
    }

    fn token(&self) -> Option<String> {
        self.auth_token.borrow().clone()
    }

    async fn list_all(&self, prefix: &str) -> Result<StoreListing, String> {
        let mut listing = StoreListing::default();
        let mut page_token: Option<String> = None;
        loop {
            let request = rest::list_request(
                &self.config,
                prefix,
                page_token.as_deref(),
                self.token().as_deref(),
            );
            let response = bridge::fetch(&request, &[]).await?;
            let mut page = rest::decode_list_page(&response)?;
            let next = page.next_page_token.take();
            page.append_to(&mut listing);
            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(listing),
            }
        }
    }

    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoreRef, String> {
        let request =
            rest::upload_request(&self.config, path, content_type, self.token().as_deref());
        let response = bridge::fetch(&request, bytes).await?;
        let metadata = rest::decode_metadata(&response)?;
        Ok(metadata.into_store_ref(bytes.len(), content_type))
    }

    async fn resolve_download_url(&self, path: &str) -> Result<String, String> {
        let request = rest::metadata_request(&self.config, path, self.token().as_deref());
        let response = bridge::fetch(&request, &[]).await?;
        let metadata = rest::decode_metadata(&response)?;
        let token = metadata
            .first_download_token()
            .ok_or_else(|| format!("object `{path}` has no download token"))?;
        Ok(rest::download_url(&self.config, path, token))
    }

    async fn remove(&self, path: &str) -> Result<(), String> {
        let request = rest::delete_request(&self.config, path, self.token().as_deref());
        let response = bridge::fetch(&request, &[]).await?;
        rest::check_status(&response)
    }
}

impl ObjectStoreClient for WebObjectStore {
    fn list<'a>(&'a self, prefix: &'a str) -> ObjectStoreFuture<'a, Result<StoreListing, String>> {
        Box::pin(async move { self.list_all(prefix).await })
    }

    fn put<'a>(
        &'a self,
        path: &'a str,
        bytes: &'a [u8],
        content_type: &'a str,
    ) -> ObjectStoreFuture<'a, Result<StoreRef, String>> {
        Box::pin(async move { self.upload(path, bytes, content_type).await })
    }

    fn download_url<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<String, String>> {
        Box::pin(async move { self.resolve_download_url(path).await })
    }

    fn delete<'a>(&'a self, path: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { self.remove(path).await })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn clones_share_the_auth_token() {
        let store = WebObjectStore::new(FirebaseStorageConfig::new("demo"));
        let clone = store.clone();
        store.set_auth_token(Some("id-token".to_string()));
        assert_eq!(clone.token().as_deref(), Some("id-token"));
        clone.set_auth_token(None);
        assert_eq!(store.token(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn store_operations_report_missing_transport_natively() {
        let store = WebObjectStore::new(FirebaseStorageConfig::new("demo"));
        let store_obj: &dyn ObjectStoreClient = &store;
        let expected = "Browser fetch is only available when compiled for wasm32".to_string();

        assert_eq!(
            block_on(store_obj.list("multimedia")).expect_err("list should fail"),
            expected
        );
        assert_eq!(
            block_on(store_obj.put("multimedia/a.webp", b"x", "image/webp"))
                .expect_err("put should fail"),
            expected
        );
        assert_eq!(
            block_on(store_obj.download_url("multimedia/a.webp")).expect_err("url should fail"),
            expected
        );
        assert_eq!(
            block_on(store_obj.delete("multimedia/a.webp")).expect_err("delete should fail"),
            expected
        );
    }
}
