use common::Ranking;
use serde::{Deserialize, Serialize};

/// Request body for casting a ballot.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CastVoteRequest {
    pub ranking: Ranking,
}

/// The viewer's own ballot state, used for cross-device rehydration.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MyVoteResponse {
    pub voted: bool,
    pub ranking: Option<Ranking>,
}

/// Admin view of who has voted so far.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteProgressResponse {
    pub votes_cast: u32,
    pub eligible_voters: u32,
    /// Display names of users who have sealed a ballot.
    pub voted: Vec<String>,
    /// Display names of eligible users still pending.
    pub pending: Vec<String>,
}
