use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Direction of a vote
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoteType {
    #[serde(rename = "upvote")]
    Up,
    #[serde(rename = "downvote")]
    Down,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Up => "upvote",
            VoteType::Down => "downvote",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a vote token is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVoteType(pub String);

impl fmt::Display for UnknownVoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown vote type '{}' (expected upvote or downvote)", self.0)
    }
}

impl std::error::Error for UnknownVoteType {}

impl FromStr for VoteType {
    type Err = UnknownVoteType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteType::Up),
            "downvote" => Ok(VoteType::Down),
            other => Err(UnknownVoteType(other.to_string())),
        }
    }
}

/// Up-voter and down-voter sets embedded in a thread or reply.
///
/// A voter id appears at most once across both lists. Insertion order is kept
/// so that persisted arrays stay stable between writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Votes {
    pub upvotes: Vec<Uuid>,
    pub downvotes: Vec<Uuid>,
}

impl Votes {
    pub fn new(upvotes: Vec<Uuid>, downvotes: Vec<Uuid>) -> Self {
        Self { upvotes, downvotes }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_id: Option<String>,
    pub vote_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub ok: bool,
    pub vote_score: i64,
}

impl VoteResponse {
    pub fn new(vote_score: i64) -> Self {
        Self { ok: true, vote_score }
    }
}
