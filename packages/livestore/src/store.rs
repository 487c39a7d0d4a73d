use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use dashmap::DashMap;
use tokio::sync::watch;

use crate::error::StoreError;

/// Bounds every stored document type must satisfy.
///
/// `PartialEq` lets live queries suppress wakeups when a mutation leaves
/// their filtered slice unchanged.
pub trait Record: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> Record for T {}

/// The store: a map from collection path to typed collection.
///
/// Cheap to clone; all clones share the same data.
#[derive(Clone, Default)]
pub struct Store {
    collections: Arc<DashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (creating if absent) the typed collection at `path`.
    ///
    /// Fails with `WrongType` if the path was previously opened with a
    /// different document type.
    pub fn collection<T: Record>(&self, path: &str) -> Result<Collection<T>, StoreError> {
        let entry = self
            .collections
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(Shared::<T>::new(path)) as Arc<dyn Any + Send + Sync>)
            .clone();
        let shared = entry
            .downcast::<Shared<T>>()
            .map_err(|_| StoreError::WrongType {
                collection: path.to_string(),
            })?;
        Ok(Collection { shared })
    }
}

struct Watcher<T> {
    filter: Box<dyn Fn(&T) -> bool + Send + Sync>,
    tx: watch::Sender<Vec<T>>,
}

struct Shared<T> {
    path: String,
    docs: RwLock<BTreeMap<String, T>>,
    watchers: Mutex<Vec<Watcher<T>>>,
}

impl<T: Record> Shared<T> {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            docs: RwLock::new(BTreeMap::new()),
            watchers: Mutex::new(Vec::new()),
        }
    }

    fn snapshot_for(docs: &BTreeMap<String, T>, filter: impl Fn(&T) -> bool) -> Vec<T> {
        docs.values().filter(|d| filter(d)).cloned().collect()
    }

    /// Push fresh snapshots to live watchers and prune dropped ones.
    fn notify(&self) {
        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        let mut watchers = self.watchers.lock().unwrap_or_else(|e| e.into_inner());
        watchers.retain(|w| {
            if w.tx.is_closed() {
                return false;
            }
            let snapshot = Self::snapshot_for(&docs, &w.filter);
            w.tx.send_if_modified(|current| {
                if *current == snapshot {
                    false
                } else {
                    *current = snapshot;
                    true
                }
            });
            true
        });
    }
}

/// A typed handle onto one collection. Cheap to clone.
pub struct Collection<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn path(&self) -> &str {
        &self.shared.path
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.shared
            .docs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shared
            .docs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(id)
    }

    /// Insert only if the id is vacant. The check and the insert happen
    /// under one write lock, so concurrent creates race to a single winner.
    pub fn create(&self, id: &str, doc: T) -> Result<(), StoreError> {
        {
            let mut docs = self.shared.docs.write().unwrap_or_else(|e| e.into_inner());
            if docs.contains_key(id) {
                return Err(StoreError::AlreadyExists {
                    collection: self.shared.path.clone(),
                    id: id.to_string(),
                });
            }
            docs.insert(id.to_string(), doc);
        }
        self.shared.notify();
        Ok(())
    }

    /// Insert or replace.
    pub fn put(&self, id: &str, doc: T) {
        self.shared
            .docs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), doc);
        self.shared.notify();
    }

    /// Mutate an existing document in place, returning the new value.
    pub fn update(&self, id: &str, f: impl FnOnce(&mut T)) -> Result<T, StoreError> {
        let updated = {
            let mut docs = self.shared.docs.write().unwrap_or_else(|e| e.into_inner());
            let doc = docs.get_mut(id).ok_or_else(|| StoreError::NotFound {
                collection: self.shared.path.clone(),
                id: id.to_string(),
            })?;
            f(doc);
            doc.clone()
        };
        self.shared.notify();
        Ok(updated)
    }

    /// Returns `true` if the document existed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self
            .shared
            .docs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .is_some();
        if removed {
            self.shared.notify();
        }
        removed
    }

    /// All documents, ordered by id.
    pub fn list(&self) -> Vec<T> {
        self.shared
            .docs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shared
            .docs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to the documents matching `filter`.
    ///
    /// The query starts with the current snapshot and receives a new one
    /// after every mutation that changes its slice. Dropping the query
    /// unsubscribes.
    pub fn watch(&self, filter: impl Fn(&T) -> bool + Send + Sync + 'static) -> LiveQuery<T> {
        // Snapshot and register under the same locks `notify` takes, in the
        // same order: a concurrent mutation is then either already in the
        // initial snapshot or delivered to the registered watcher.
        let docs = self.shared.docs.read().unwrap_or_else(|e| e.into_inner());
        let initial = Shared::snapshot_for(&docs, &filter);
        let (tx, rx) = watch::channel(initial);
        self.shared
            .watchers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Watcher {
                filter: Box::new(filter),
                tx,
            });
        LiveQuery { rx }
    }

    /// Subscribe to the whole collection.
    pub fn watch_all(&self) -> LiveQuery<T> {
        self.watch(|_| true)
    }

    #[cfg(test)]
    fn watcher_count(&self) -> usize {
        self.shared
            .watchers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// A live, filtered view onto a collection.
pub struct LiveQuery<T> {
    rx: watch::Receiver<Vec<T>>,
}

impl<T: Record> LiveQuery<T> {
    /// The latest snapshot, marking it seen.
    pub fn snapshot(&mut self) -> Vec<T> {
        self.rx.borrow_and_update().clone()
    }

    /// Whether an unseen snapshot is pending.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait until the slice changes. Returns `false` if the collection
    /// was torn down.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
