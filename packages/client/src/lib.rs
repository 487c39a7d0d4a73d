//! Client-side view layer: live contest/gallery subscriptions, ballot
//! drafting, and presentation rules (blind attribution, stable shuffle).

pub mod ballot;
pub mod error;
pub mod gallery;
pub mod session;
pub mod shuffle;

pub use ballot::BallotDraft;
pub use error::ClientError;
pub use gallery::{GalleryItem, GalleryView};
pub use session::{DirectoryView, GalleryFeed, Session};
pub use shuffle::ShuffleCache;
