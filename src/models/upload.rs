use serde::{Deserialize, Serialize};

/// Where an uploaded poster ended up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadReceipt {
    pub success: bool,
    /// Object key inside the bucket
    pub key: String,
    /// Public URL of the stored object
    pub url: String,
}
