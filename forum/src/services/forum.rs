use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::permissions::ensure_can_reply;
use super::specialties::{annotate, select_specialties};
use super::tree::build_tree;
use crate::error::{ForumError, ForumResult};
use crate::models::category::DEFAULT_CATEGORIES;
use crate::models::{
    Category, CreateReplyRequest, CreateThreadRequest, Reply, ReplyNode, Role, Thread,
    ThreadDetail, ThreadSummary, ThreadView, VoteRequest, VoteType,
};
use crate::storage::SharedStore;

/// Assembles thread and reply payloads on top of the store
#[derive(Clone)]
pub struct ForumService {
    store: SharedStore,
}

impl ForumService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// All categories, sorted by name
    pub async fn list_categories(&self) -> ForumResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    /// Insert the default categories that are not there yet.
    /// Returns how many were added.
    pub async fn seed_categories(&self) -> ForumResult<usize> {
        let mut inserted = 0;
        for (slug, name) in DEFAULT_CATEGORIES {
            if self
                .store
                .insert_category_if_absent(Category::new(*slug, *name))
                .await?
            {
                inserted += 1;
            }
        }
        info!("Seeded {} forum categories", inserted);
        Ok(inserted)
    }

    /// Threads, newest first, each with its reply count and score.
    /// Counts come from a single grouped aggregation, not from the trees.
    pub async fn list_threads(&self, category_id: Option<&str>) -> ForumResult<Vec<ThreadSummary>> {
        let category_id = match category_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_id("categoryId", raw)?),
            None => None,
        };

        let threads = self.store.list_threads(category_id).await?;
        let thread_ids: Vec<Uuid> = threads.iter().map(|t| t.id).collect();
        let counts = self.store.count_replies_by_thread(&thread_ids).await?;

        Ok(threads
            .into_iter()
            .map(|thread| ThreadSummary {
                reply_count: counts.get(&thread.id).copied().unwrap_or(0),
                vote_score: thread.votes.score(),
                thread,
            })
            .collect())
    }

    pub async fn create_thread(&self, request: CreateThreadRequest) -> ForumResult<ThreadSummary> {
        require_fields(&[
            ("categoryId", &request.category_id),
            ("authorUserId", &request.author_user_id),
            ("authorRole", &request.author_role),
            ("title", &request.title),
            ("body", &request.body),
        ])?;
        request.validate()?;

        let CreateThreadRequest {
            category_id,
            author_user_id,
            author_role,
            title,
            body,
        } = request;
        let category_id = parse_id("categoryId", &category_id.unwrap_or_default())?;
        let author_user_id = parse_id("authorUserId", &author_user_id.unwrap_or_default())?;
        let author_role = parse_role(&author_role.unwrap_or_default())?;

        if self.store.find_category(category_id).await?.is_none() {
            return Err(ForumError::not_found("category not found"));
        }

        let thread = self
            .store
            .create_thread(Thread::new(
                category_id,
                author_user_id,
                author_role,
                title.unwrap_or_default(),
                body.unwrap_or_default(),
            ))
            .await?;

        info!(thread_id = %thread.id, role = %thread.author_role, "Created thread");

        Ok(ThreadSummary {
            thread,
            reply_count: 0,
            vote_score: 0,
        })
    }

    /// Thread with its score and the full nested reply tree.
    ///
    /// Bumps the view counter in the background; a failed bump is logged and
    /// does not fail the read.
    pub async fn get_thread_detail(&self, thread_id: &str) -> ForumResult<ThreadDetail> {
        let thread_id = parse_id("threadId", thread_id)?;
        let thread = self
            .store
            .find_thread(thread_id)
            .await?
            .ok_or_else(|| ForumError::not_found("Thread not found"))?;

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.increment_view_count(thread_id).await {
                warn!(%thread_id, "Failed to increment view count: {}", e);
            }
        });

        let replies = self.store.list_replies(thread_id).await?;
        let specialties = annotate(&*self.store, &replies).await?;
        let reply_count = replies.len();
        let tree = build_tree(replies, &specialties);

        debug!(%thread_id, replies = reply_count, roots = tree.len(), "Assembled thread detail");

        Ok(ThreadDetail {
            thread: ThreadView {
                vote_score: thread.votes.score(),
                thread,
            },
            replies: tree,
        })
    }

    /// Post a reply to a thread, optionally under an existing reply.
    ///
    /// Checks run in a fixed order: required fields, thread existence,
    /// permission gate, parent existence. Nothing is written unless all pass.
    pub async fn create_reply(&self, request: CreateReplyRequest) -> ForumResult<ReplyNode> {
        require_fields(&[
            ("threadId", &request.thread_id),
            ("authorUserId", &request.author_user_id),
            ("authorRole", &request.author_role),
            ("body", &request.body),
        ])?;
        request.validate()?;

        let CreateReplyRequest {
            thread_id,
            parent_reply_id,
            author_user_id,
            author_role,
            body,
        } = request;
        let thread_id = parse_id("threadId", &thread_id.unwrap_or_default())?;
        let author_user_id = parse_id("authorUserId", &author_user_id.unwrap_or_default())?;
        let author_role = parse_role(&author_role.unwrap_or_default())?;
        let parent_reply_id = match parent_reply_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_id("parentReplyId", raw)?),
            _ => None,
        };

        let thread = self
            .store
            .find_thread(thread_id)
            .await?
            .ok_or_else(|| ForumError::not_found("thread not found"))?;

        if let Err(e) = ensure_can_reply(thread.author_role, author_role) {
            info!(%thread_id, thread_role = %thread.author_role, replier_role = %author_role, "Reply rejected");
            return Err(e);
        }

        if let Some(parent_id) = parent_reply_id {
            let parent = self.store.find_reply(parent_id).await?;
            if !parent.is_some_and(|p| p.thread_id == thread_id) {
                return Err(ForumError::not_found("Parent reply not found"));
            }
        }

        let reply = self
            .store
            .create_reply(Reply::new(
                thread_id,
                parent_reply_id,
                author_user_id,
                author_role,
                body.unwrap_or_default(),
            ))
            .await?;

        let specialties = match author_role {
            Role::Researcher => {
                let profiles = self.store.find_profiles(&[author_user_id]).await?;
                select_specialties(profiles.iter().find(|p| p.user_id == author_user_id))
            }
            Role::Patient => Vec::new(),
        };

        info!(reply_id = %reply.id, %thread_id, parent = ?parent_reply_id, "Created reply");

        Ok(ReplyNode {
            vote_score: reply.votes.score(),
            specialties,
            children: Vec::new(),
            reply,
        })
    }

    /// Apply a vote to a reply and return its new score
    pub async fn vote_on_reply(&self, reply_id: &str, request: VoteRequest) -> ForumResult<i64> {
        let (voter, vote) = parse_vote(request)?;
        let reply_id = parse_id("replyId", reply_id)?;

        let votes = self
            .store
            .apply_reply_vote(reply_id, voter, vote)
            .await?
            .ok_or_else(|| ForumError::not_found("Reply not found"))?;

        debug!(%reply_id, %voter, %vote, score = votes.score(), "Reply vote applied");
        Ok(votes.score())
    }

    /// Apply a vote to a thread and return its new score
    pub async fn vote_on_thread(&self, thread_id: &str, request: VoteRequest) -> ForumResult<i64> {
        let (voter, vote) = parse_vote(request)?;
        let thread_id = parse_id("threadId", thread_id)?;

        let votes = self
            .store
            .apply_thread_vote(thread_id, voter, vote)
            .await?
            .ok_or_else(|| ForumError::not_found("Thread not found"))?;

        debug!(%thread_id, %voter, %vote, score = votes.score(), "Thread vote applied");
        Ok(votes.score())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Reject the request if any named field is absent or blank, listing them all
fn require_fields(fields: &[(&str, &Option<String>)]) -> ForumResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ForumError::invalid(format!("{} required", missing.join(", "))))
    }
}

fn parse_id(field: &str, raw: &str) -> ForumResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ForumError::invalid(format!("{} is not a valid id", field)))
}

fn parse_role(raw: &str) -> ForumResult<Role> {
    raw.trim()
        .parse()
        .map_err(|e| ForumError::invalid(format!("authorRole: {}", e)))
}

fn parse_vote(request: VoteRequest) -> ForumResult<(Uuid, VoteType)> {
    if is_blank(&request.user_id) || is_blank(&request.vote_type) {
        return Err(ForumError::invalid(
            "userId and voteType (upvote/downvote) required",
        ));
    }
    let voter = parse_id("userId", &request.user_id.unwrap_or_default())?;
    let vote = request
        .vote_type
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|e| ForumError::invalid(format!("voteType: {}", e)))?;
    Ok((voter, vote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_lists_every_missing_field() {
        let present = Some("x".to_string());
        let blank = Some("  ".to_string());
        let err = require_fields(&[("threadId", &None), ("body", &blank), ("authorRole", &present)])
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: threadId, body required");
    }

    #[test]
    fn test_parse_vote_rejects_unknown_tokens() {
        let request = VoteRequest {
            user_id: Some(Uuid::new_v4().to_string()),
            vote_type: Some("sideways".to_string()),
        };
        assert!(matches!(parse_vote(request), Err(ForumError::InvalidArgument(_))));
    }

    #[test]
    fn test_parse_vote_requires_both_fields() {
        let request = VoteRequest {
            user_id: None,
            vote_type: Some("upvote".to_string()),
        };
        assert!(matches!(parse_vote(request), Err(ForumError::InvalidArgument(_))));
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(parse_id("threadId", "not-a-uuid").is_err());
        assert!(parse_id("threadId", &Uuid::new_v4().to_string()).is_ok());
    }
}
