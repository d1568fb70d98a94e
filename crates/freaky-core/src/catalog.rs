//! Catalog types shared between the store and the classifier.

use serde::{Deserialize, Serialize};

/// A category as seen by the classifier: storage-assigned id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
