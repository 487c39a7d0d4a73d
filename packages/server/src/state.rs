use std::sync::Arc;

use common::storage::BlobStore;
use common::{Contest, Entry, UserRecord, Vote, archive::Archive, paths};
use livestore::{Collection, Store};

use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub blobs: Arc<dyn BlobStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn contests(&self) -> Result<Collection<Contest>, AppError> {
        Ok(self.store.collection(paths::CONTESTS)?)
    }

    pub fn entries(&self, contest_id: &str) -> Result<Collection<Entry>, AppError> {
        Ok(self.store.collection(&paths::entries(contest_id))?)
    }

    pub fn votes(&self, contest_id: &str) -> Result<Collection<Vote>, AppError> {
        Ok(self.store.collection(&paths::votes(contest_id))?)
    }

    pub fn archives(&self) -> Result<Collection<Archive>, AppError> {
        Ok(self.store.collection(paths::ARCHIVES)?)
    }

    pub fn users(&self) -> Result<Collection<UserRecord>, AppError> {
        Ok(self.store.collection(paths::USERS)?)
    }
}
