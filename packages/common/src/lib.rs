pub mod archive;
pub mod contest;
pub mod directory;
pub mod entry;
pub mod paths;
pub mod period;
pub mod phase;
pub mod storage;
pub mod user;
pub mod vote;

pub use contest::Contest;
pub use entry::Entry;
pub use phase::ContestPhase;
pub use user::{Role, UserRecord, Viewer};
pub use vote::{POINT_WEIGHTS, Ranking, VOTE_SLOTS, Vote};
