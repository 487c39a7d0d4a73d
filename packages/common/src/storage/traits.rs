use async_trait::async_trait;

use super::error::StorageError;

/// Scheme prefix of every blob URL handed out by a store.
pub const URL_SCHEME: &str = "blob://";

/// Logical address of a stored image: contest, photographer, filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobPath {
    contest_id: String,
    photographer_id: String,
    filename: String,
}

impl BlobPath {
    /// Build a validated path. Components may not be empty, contain
    /// separators, or be a dot segment.
    pub fn new(
        contest_id: &str,
        photographer_id: &str,
        filename: &str,
    ) -> Result<Self, StorageError> {
        for component in [contest_id, photographer_id, filename] {
            validate_component(component)?;
        }
        Ok(Self {
            contest_id: contest_id.to_string(),
            photographer_id: photographer_id.to_string(),
            filename: filename.to_string(),
        })
    }

    pub fn relative(&self) -> String {
        format!(
            "{}/{}/{}",
            self.contest_id, self.photographer_id, self.filename
        )
    }

    pub fn url(&self) -> String {
        format!("{URL_SCHEME}{}", self.relative())
    }
}

fn validate_component(component: &str) -> Result<(), StorageError> {
    if component.is_empty()
        || component == "."
        || component == ".."
        || component.contains(['/', '\\'])
        || component.contains('\0')
    {
        return Err(StorageError::InvalidPath(component.to_string()));
    }
    Ok(())
}

/// Split a blob URL back into its validated relative path.
pub(super) fn url_to_relative(url: &str) -> Result<String, StorageError> {
    let relative = url
        .strip_prefix(URL_SCHEME)
        .ok_or_else(|| StorageError::InvalidPath(url.to_string()))?;
    let segments: Vec<&str> = relative.split('/').collect();
    if segments.len() != 3 {
        return Err(StorageError::InvalidPath(url.to_string()));
    }
    for segment in &segments {
        validate_component(segment)?;
    }
    Ok(relative.to_string())
}

/// Path-addressed image storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes at the given path and return the blob URL.
    /// Re-putting the same path overwrites.
    async fn put(&self, path: &BlobPath, data: &[u8]) -> Result<String, StorageError>;

    /// Retrieve the bytes behind a blob URL.
    async fn get(&self, url: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether a blob URL resolves to stored bytes.
    async fn exists(&self, url: &str) -> Result<bool, StorageError>;

    /// Delete a blob by URL.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, url: &str) -> Result<bool, StorageError>;

    /// Delete every blob stored under a contest.
    ///
    /// Returns `true` if anything was removed.
    async fn delete_contest(&self, contest_id: &str) -> Result<bool, StorageError>;
}
