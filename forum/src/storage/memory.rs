use async_trait::async_trait;
use futures::lock::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    CategoryStore, ForumStore, ProfileStore, ReplyStore, StoreError, StoreResult, ThreadStore,
};
use crate::models::{Category, Profile, Reply, Thread, VoteType, Votes};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    /// Insertion order doubles as a tie-breaker for equal timestamps
    threads: Vec<Thread>,
    replies: Vec<Reply>,
    profiles: HashMap<Uuid, Profile>,
}

/// In-memory implementation of the forum store
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile. Profiles are owned by the profile
    /// service; this exists for seeding and tests.
    pub async fn put_profile(&self, profile: Profile) {
        let mut tables = self.tables.lock().await;
        tables.profiles.insert(profile.user_id, profile);
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let tables = self.tables.lock().await;
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let tables = self.tables.lock().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_category_if_absent(&self, category: Category) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.categories.iter().any(|c| c.slug == category.slug) {
            return Ok(false);
        }
        tables.categories.push(category);
        Ok(true)
    }
}

#[async_trait]
impl ThreadStore for MemoryStore {
    async fn find_thread(&self, id: Uuid) -> StoreResult<Option<Thread>> {
        let tables = self.tables.lock().await;
        Ok(tables.threads.iter().find(|t| t.id == id).cloned())
    }

    async fn list_threads(&self, category_id: Option<Uuid>) -> StoreResult<Vec<Thread>> {
        let tables = self.tables.lock().await;
        let mut threads: Vec<Thread> = tables
            .threads
            .iter()
            .filter(|t| category_id.map_or(true, |c| t.category_id == c))
            .cloned()
            .collect();
        // Newest first; later inserts win ties
        threads.reverse();
        threads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(threads)
    }

    async fn create_thread(&self, thread: Thread) -> StoreResult<Thread> {
        let mut tables = self.tables.lock().await;
        if tables.threads.iter().any(|t| t.id == thread.id) {
            return Err(StoreError::Conflict(format!("thread {} already exists", thread.id)));
        }
        tables.threads.push(thread.clone());
        Ok(thread)
    }

    async fn increment_view_count(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;
        if let Some(thread) = tables.threads.iter_mut().find(|t| t.id == id) {
            thread.view_count += 1;
        }
        Ok(())
    }

    async fn apply_thread_vote(
        &self,
        id: Uuid,
        voter: Uuid,
        vote: VoteType,
    ) -> StoreResult<Option<Votes>> {
        // The lock is held across read, ledger update and write
        let mut tables = self.tables.lock().await;
        Ok(tables.threads.iter_mut().find(|t| t.id == id).map(|thread| {
            thread.votes.apply(voter, vote);
            thread.votes.clone()
        }))
    }
}

#[async_trait]
impl ReplyStore for MemoryStore {
    async fn find_reply(&self, id: Uuid) -> StoreResult<Option<Reply>> {
        let tables = self.tables.lock().await;
        Ok(tables.replies.iter().find(|r| r.id == id).cloned())
    }

    async fn list_replies(&self, thread_id: Uuid) -> StoreResult<Vec<Reply>> {
        let tables = self.tables.lock().await;
        let mut replies: Vec<Reply> = tables
            .replies
            .iter()
            .filter(|r| r.thread_id == thread_id)
            .cloned()
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(replies)
    }

    async fn create_reply(&self, reply: Reply) -> StoreResult<Reply> {
        let mut tables = self.tables.lock().await;
        if tables.replies.iter().any(|r| r.id == reply.id) {
            return Err(StoreError::Conflict(format!("reply {} already exists", reply.id)));
        }
        tables.replies.push(reply.clone());
        Ok(reply)
    }

    async fn apply_reply_vote(
        &self,
        id: Uuid,
        voter: Uuid,
        vote: VoteType,
    ) -> StoreResult<Option<Votes>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.replies.iter_mut().find(|r| r.id == id).map(|reply| {
            reply.votes.apply(voter, vote);
            reply.votes.clone()
        }))
    }

    async fn count_replies_by_thread(&self, thread_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, i64>> {
        let tables = self.tables.lock().await;
        let mut counts = HashMap::new();
        for reply in tables.replies.iter().filter(|r| thread_ids.contains(&r.thread_id)) {
            *counts.entry(reply.thread_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profiles(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        let tables = self.tables.lock().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.profiles.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
