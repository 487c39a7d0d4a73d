/// Errors from document store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document '{id}' already exists in '{collection}'")]
    AlreadyExists { collection: String, id: String },
    #[error("document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },
    #[error("collection '{collection}' is already open with a different document type")]
    WrongType { collection: String },
}
