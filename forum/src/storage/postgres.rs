use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use super::{
    CategoryStore, ForumStore, ProfileStore, ReplyStore, StoreError, StoreResult, ThreadStore,
};
use crate::models::{Category, Profile, Reply, ResearcherProfile, Role, Thread, VoteType, Votes};

const THREAD_COLUMNS: &str = "id, category_id, author_user_id, author_role, title, body, \
     created_at, view_count, upvotes, downvotes";

const REPLY_COLUMNS: &str = "id, thread_id, parent_reply_id, author_user_id, author_role, body, \
     created_at, upvotes, downvotes";

/// PostgreSQL-backed forum store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Run the embedded migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Lock the row, run the vote ledger on it and write both sets back in
    /// one transaction.
    async fn apply_vote(
        &self,
        table: VoteTable,
        id: Uuid,
        voter: Uuid,
        vote: VoteType,
    ) -> StoreResult<Option<Votes>> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT upvotes, downvotes FROM {} WHERE id = $1 FOR UPDATE",
            table.name()
        );
        let row: Option<(Vec<Uuid>, Vec<Uuid>)> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some((upvotes, downvotes)) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut votes = Votes::new(upvotes, downvotes);
        votes.apply(voter, vote);

        let update = format!(
            "UPDATE {} SET upvotes = $2, downvotes = $3 WHERE id = $1",
            table.name()
        );
        sqlx::query(&update)
            .bind(id)
            .bind(votes.upvotes.clone())
            .bind(votes.downvotes.clone())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(votes))
    }
}

#[derive(Debug, Clone, Copy)]
enum VoteTable {
    Threads,
    Replies,
}

impl VoteTable {
    fn name(&self) -> &'static str {
        match self {
            VoteTable::Threads => "threads",
            VoteTable::Replies => "replies",
        }
    }
}

fn parse_role(raw: &str) -> StoreResult<Role> {
    raw.parse()
        .map_err(|e| StoreError::Corrupt(format!("author_role: {}", e)))
}

#[derive(Debug, FromRow)]
struct ThreadRow {
    id: Uuid,
    category_id: Uuid,
    author_user_id: Uuid,
    author_role: String,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
    view_count: i64,
    upvotes: Vec<Uuid>,
    downvotes: Vec<Uuid>,
}

impl TryFrom<ThreadRow> for Thread {
    type Error = StoreError;

    fn try_from(row: ThreadRow) -> StoreResult<Self> {
        Ok(Thread {
            id: row.id,
            category_id: row.category_id,
            author_user_id: row.author_user_id,
            author_role: parse_role(&row.author_role)?,
            title: row.title,
            body: row.body,
            created_at: row.created_at,
            view_count: row.view_count,
            votes: Votes::new(row.upvotes, row.downvotes),
        })
    }
}

#[derive(Debug, FromRow)]
struct ReplyRow {
    id: Uuid,
    thread_id: Uuid,
    parent_reply_id: Option<Uuid>,
    author_user_id: Uuid,
    author_role: String,
    body: String,
    created_at: DateTime<Utc>,
    upvotes: Vec<Uuid>,
    downvotes: Vec<Uuid>,
}

impl TryFrom<ReplyRow> for Reply {
    type Error = StoreError;

    fn try_from(row: ReplyRow) -> StoreResult<Self> {
        Ok(Reply {
            id: row.id,
            thread_id: row.thread_id,
            parent_reply_id: row.parent_reply_id,
            author_user_id: row.author_user_id,
            author_role: parse_role(&row.author_role)?,
            body: row.body,
            created_at: row.created_at,
            votes: Votes::new(row.upvotes, row.downvotes),
        })
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    user_id: Uuid,
    researcher: Option<Json<ResearcherProfile>>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            user_id: row.user_id,
            researcher: row.researcher.map(|Json(r)| r),
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    slug: String,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            slug: row.slug,
            name: row.name,
        }
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, slug, name FROM forum_categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, slug, name FROM forum_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Category::from))
    }

    async fn insert_category_if_absent(&self, category: Category) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO forum_categories (id, slug, name) VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(category.id)
        .bind(&category.slug)
        .bind(&category.name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl ThreadStore for PgStore {
    async fn find_thread(&self, id: Uuid) -> StoreResult<Option<Thread>> {
        let sql = format!("SELECT {} FROM threads WHERE id = $1", THREAD_COLUMNS);
        sqlx::query_as::<_, ThreadRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Thread::try_from)
            .transpose()
    }

    async fn list_threads(&self, category_id: Option<Uuid>) -> StoreResult<Vec<Thread>> {
        let sql = format!(
            "SELECT {} FROM threads WHERE ($1::uuid IS NULL OR category_id = $1) \
             ORDER BY created_at DESC",
            THREAD_COLUMNS
        );
        let rows = sqlx::query_as::<_, ThreadRow>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Thread::try_from).collect()
    }

    async fn create_thread(&self, thread: Thread) -> StoreResult<Thread> {
        let sql = format!(
            "INSERT INTO threads ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {cols}",
            cols = THREAD_COLUMNS
        );
        let row = sqlx::query_as::<_, ThreadRow>(&sql)
            .bind(thread.id)
            .bind(thread.category_id)
            .bind(thread.author_user_id)
            .bind(thread.author_role.as_str())
            .bind(&thread.title)
            .bind(&thread.body)
            .bind(thread.created_at)
            .bind(thread.view_count)
            .bind(thread.votes.upvotes.clone())
            .bind(thread.votes.downvotes.clone())
            .fetch_one(&self.pool)
            .await?;
        Thread::try_from(row)
    }

    async fn increment_view_count(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE threads SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn apply_thread_vote(
        &self,
        id: Uuid,
        voter: Uuid,
        vote: VoteType,
    ) -> StoreResult<Option<Votes>> {
        self.apply_vote(VoteTable::Threads, id, voter, vote).await
    }
}

#[async_trait]
impl ReplyStore for PgStore {
    async fn find_reply(&self, id: Uuid) -> StoreResult<Option<Reply>> {
        let sql = format!("SELECT {} FROM replies WHERE id = $1", REPLY_COLUMNS);
        sqlx::query_as::<_, ReplyRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Reply::try_from)
            .transpose()
    }

    async fn list_replies(&self, thread_id: Uuid) -> StoreResult<Vec<Reply>> {
        let sql = format!(
            "SELECT {} FROM replies WHERE thread_id = $1 ORDER BY created_at ASC, seq ASC",
            REPLY_COLUMNS
        );
        let rows = sqlx::query_as::<_, ReplyRow>(&sql)
            .bind(thread_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Reply::try_from).collect()
    }

    async fn create_reply(&self, reply: Reply) -> StoreResult<Reply> {
        let sql = format!(
            "INSERT INTO replies ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {cols}",
            cols = REPLY_COLUMNS
        );
        let row = sqlx::query_as::<_, ReplyRow>(&sql)
            .bind(reply.id)
            .bind(reply.thread_id)
            .bind(reply.parent_reply_id)
            .bind(reply.author_user_id)
            .bind(reply.author_role.as_str())
            .bind(&reply.body)
            .bind(reply.created_at)
            .bind(reply.votes.upvotes.clone())
            .bind(reply.votes.downvotes.clone())
            .fetch_one(&self.pool)
            .await?;
        Reply::try_from(row)
    }

    async fn apply_reply_vote(
        &self,
        id: Uuid,
        voter: Uuid,
        vote: VoteType,
    ) -> StoreResult<Option<Votes>> {
        self.apply_vote(VoteTable::Replies, id, voter, vote).await
    }

    async fn count_replies_by_thread(&self, thread_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, i64>> {
        if thread_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            "SELECT thread_id, COUNT(*) AS count FROM replies \
             WHERE thread_id = ANY($1) GROUP BY thread_id",
        )
        .bind(thread_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_profiles(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, researcher FROM profiles WHERE user_id = ANY($1)",
        )
        .bind(user_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }
}

#[async_trait]
impl ForumStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
