pub mod archive;
pub mod entries;
pub mod identity;
pub mod votes;
