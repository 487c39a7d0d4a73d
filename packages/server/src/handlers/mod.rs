pub mod admin;
pub mod archive;
pub mod auth;
pub mod blob;
pub mod contest;
pub mod entry;
pub mod user;
pub mod vote;
