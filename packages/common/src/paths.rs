//! Collection path helpers.
//!
//! The document store addresses collections by string path. These helpers
//! are the single source of those strings.

pub const CONTESTS: &str = "contests";
pub const ARCHIVES: &str = "archives";
pub const USERS: &str = "users";

pub fn entries(contest_id: &str) -> String {
    format!("contests/{contest_id}/entries")
}

pub fn votes(contest_id: &str) -> String {
    format!("contests/{contest_id}/votes")
}
