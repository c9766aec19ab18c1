//! Wire types exchanged with prefix-addressed object stores.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A leaf object or common prefix reported by a store listing.
pub struct StoreObject {
    /// Last key segment.
    pub name: String,
    /// Full key (objects) or full prefix without trailing separator (prefixes).
    pub full_path: String,
}

impl StoreObject {
    /// Builds a store object from its full key, deriving the name from the last segment.
    pub fn from_full_path(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        let name = full_path
            .rsplit('/')
            .next()
            .unwrap_or(full_path.as_str())
            .to_string();
        Self { name, full_path }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Result of listing one prefix level with a `/` delimiter.
pub struct StoreListing {
    /// Leaf objects directly under the prefix, in store order.
    pub items: Vec<StoreObject>,
    /// Common sub-prefixes directly under the prefix, in store order.
    pub sub_prefixes: Vec<StoreObject>,
}

impl StoreListing {
    /// Returns `true` when the prefix has neither leaves nor sub-prefixes.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.sub_prefixes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Reference returned by a successful upload.
pub struct StoreRef {
    /// Full key of the stored object.
    pub full_path: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Content type recorded by the store.
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn store_object_name_is_last_segment() {
        let object = StoreObject::from_full_path("multimedia/bts/photo.webp");
        assert_eq!(object.name, "photo.webp");
        assert_eq!(StoreObject::from_full_path("multimedia").name, "multimedia");
    }

    #[test]
    fn listing_serializes_with_camel_case_fields() {
        let listing = StoreListing {
            items: vec![StoreObject::from_full_path("multimedia/a.webp")],
            sub_prefixes: vec![StoreObject::from_full_path("multimedia/bts")],
        };
        let value = serde_json::to_value(&listing).expect("serialize");
        assert_eq!(value["subPrefixes"][0]["fullPath"], json!("multimedia/bts"));
        assert!(!listing.is_empty());
        assert!(StoreListing::default().is_empty());
    }
}
