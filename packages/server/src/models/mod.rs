pub mod archive;
pub mod auth;
pub mod contest;
pub mod entry;
pub mod user;
pub mod vote;
