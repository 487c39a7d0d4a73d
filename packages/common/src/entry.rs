use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submitted photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Entry {
    pub id: String,
    pub contest_id: String,
    pub photographer_id: String,
    pub photographer_name: String,
    #[serde(default)]
    pub team_id: Option<String>,
    /// Blob-store URL of the image.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_num: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl Entry {
    /// Entry ids are derived from the photographer name and upload instant,
    /// sanitized to `[A-Za-z0-9_-]` so they stay path- and key-safe.
    pub fn derive_id(photographer_name: &str, uploaded_at: DateTime<Utc>) -> String {
        let safe: String = photographer_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}-{}", safe, uploaded_at.timestamp_millis())
    }
}
