//! Collection page envelope shared by the paginated proxy endpoints.

use serde::{Deserialize, Serialize};

/// One page of a paginated collection, as returned by the proxy.
///
/// `next_link` absent means the traversal is complete. An empty `value` with
/// a present `next_link` is a legal, non-terminal page: the server may emit
/// empty pages in the middle of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCollection<T> {
    #[serde(default)]
    pub value: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

impl<T> ResourceCollection<T> {
    pub fn empty() -> Self {
        Self { value: Vec::new(), next_link: None }
    }

    /// Whether this page terminates the traversal.
    pub fn is_last(&self) -> bool {
        self.next_link.is_none()
    }
}

impl<T> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self::empty()
    }
}
