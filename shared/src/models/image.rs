//! Uploaded image reference

use serde::{Deserialize, Serialize};

/// A stored image: server-side path plus public link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub file_path: String,
    pub link: String,
}
