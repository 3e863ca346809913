use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Role, Votes};

/// A reply posted in a thread, either top-level or under another reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub thread_id: Uuid,

    /// `None` for a top-level reply
    pub parent_reply_id: Option<Uuid>,

    pub author_user_id: Uuid,
    pub author_role: Role,
    pub body: String,
    pub created_at: DateTime<Utc>,

    #[serde(flatten)]
    pub votes: Votes,
}

impl Reply {
    pub fn new(
        thread_id: Uuid,
        parent_reply_id: Option<Uuid>,
        author_user_id: Uuid,
        author_role: Role,
        body: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            thread_id,
            parent_reply_id,
            author_user_id,
            author_role,
            body,
            created_at: Utc::now(),
            votes: Votes::default(),
        }
    }
}

/// A reply in a rendered tree. Built per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplyNode {
    #[serde(flatten)]
    pub reply: Reply,
    pub vote_score: i64,
    pub specialties: Vec<String>,
    pub children: Vec<ReplyNode>,
}

impl ReplyNode {
    /// Total number of nodes in this subtree, including this one
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(ReplyNode::subtree_size).sum::<usize>()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub ok: bool,
    pub reply: ReplyNode,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    pub thread_id: Option<String>,
    pub parent_reply_id: Option<String>,
    pub author_user_id: Option<String>,
    pub author_role: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub body: Option<String>,
}
