mod error;
mod filesystem;
mod traits;

pub use error::StorageError;
pub use filesystem::FilesystemBlobStore;
pub use traits::{BlobPath, BlobStore, URL_SCHEME};
