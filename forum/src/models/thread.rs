use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{ReplyNode, Role, Votes};

/// A discussion thread opened in a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// Unique identifier for the thread
    pub id: Uuid,

    /// Category the thread is filed under
    pub category_id: Uuid,

    /// Author's user id
    pub author_user_id: Uuid,

    /// Role the author posted as; decides who may reply
    pub author_role: Role,

    /// Title of the thread
    pub title: String,

    /// Thread content/body text
    pub body: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Number of detail reads
    pub view_count: i64,

    /// Embedded vote sets
    #[serde(flatten)]
    pub votes: Votes,
}

impl Thread {
    /// Create a new thread with no views and no votes
    pub fn new(
        category_id: Uuid,
        author_user_id: Uuid,
        author_role: Role,
        title: String,
        body: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            author_user_id,
            author_role,
            title,
            body,
            created_at: Utc::now(),
            view_count: 0,
            votes: Votes::default(),
        }
    }
}

/// A thread rendered with its current score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadView {
    #[serde(flatten)]
    pub thread: Thread,
    pub vote_score: i64,
}

/// A thread as it appears in listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    #[serde(flatten)]
    pub thread: Thread,
    pub reply_count: i64,
    pub vote_score: i64,
}

/// Thread detail payload: the thread plus its nested reply tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadDetail {
    pub thread: ThreadView,
    pub replies: Vec<ReplyNode>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreadEnvelope {
    pub ok: bool,
    pub thread: ThreadSummary,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadListQuery {
    pub category_id: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    pub category_id: Option<String>,
    pub author_user_id: Option<String>,
    pub author_role: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub body: Option<String>,
}
