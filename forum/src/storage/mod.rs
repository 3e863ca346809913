//! Storage collaborators for the forum engine.
//!
//! The engine only talks to these traits. Records are loaded as snapshots and
//! mutations go back one entity at a time; vote updates are atomic per entity.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Category, Profile, Reply, Thread, VoteType, Votes};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error types for storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored record could not be mapped back into the model
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, sorted by name
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>>;

    /// Insert unless a category with the same slug exists.
    /// Returns `true` if a row was inserted.
    async fn insert_category_if_absent(&self, category: Category) -> StoreResult<bool>;
}

#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn find_thread(&self, id: Uuid) -> StoreResult<Option<Thread>>;

    /// Threads, newest first, optionally restricted to one category
    async fn list_threads(&self, category_id: Option<Uuid>) -> StoreResult<Vec<Thread>>;

    async fn create_thread(&self, thread: Thread) -> StoreResult<Thread>;

    async fn increment_view_count(&self, id: Uuid) -> StoreResult<()>;

    /// Apply one vote to a thread as a single read-modify-write.
    /// Returns the resulting vote sets, or `None` if the thread does not exist.
    async fn apply_thread_vote(
        &self,
        id: Uuid,
        voter: Uuid,
        vote: VoteType,
    ) -> StoreResult<Option<Votes>>;
}

#[async_trait]
pub trait ReplyStore: Send + Sync {
    async fn find_reply(&self, id: Uuid) -> StoreResult<Option<Reply>>;

    /// All replies of a thread, oldest first
    async fn list_replies(&self, thread_id: Uuid) -> StoreResult<Vec<Reply>>;

    async fn create_reply(&self, reply: Reply) -> StoreResult<Reply>;

    /// Same contract as [`ThreadStore::apply_thread_vote`]
    async fn apply_reply_vote(
        &self,
        id: Uuid,
        voter: Uuid,
        vote: VoteType,
    ) -> StoreResult<Option<Votes>>;

    /// Reply counts grouped by thread id. Threads without replies are absent.
    async fn count_replies_by_thread(&self, thread_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, i64>>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Bulk fetch of profiles for the given users; unknown ids are skipped
    async fn find_profiles(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>>;
}

/// Everything the forum service needs from persistence
#[async_trait]
pub trait ForumStore: CategoryStore + ThreadStore + ReplyStore + ProfileStore {
    /// Cheap liveness probe used by the health endpoint
    async fn ping(&self) -> StoreResult<()>;

    /// Release connections on shutdown
    async fn close(&self) {}
}

/// Store handle shared by the service and the HTTP layer
pub type SharedStore = Arc<dyn ForumStore>;
