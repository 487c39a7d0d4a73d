//! In-process document store with live queries.
//!
//! Documents are plain values grouped into string-addressed collections
//! (`"contests"`, `"contests/2026-03/votes"`, ...). Readers can hold a
//! [`LiveQuery`] on a filtered slice of a collection; every mutation
//! pushes a fresh snapshot to affected queries, and dropping the query
//! cancels the subscription.

mod error;
mod store;

pub use error::StoreError;
pub use store::{Collection, LiveQuery, Record, Store};
