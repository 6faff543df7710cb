use {async_trait::async_trait, sqlx::SqlitePool, uuid::Uuid};

use crate::{
    error::{Error, Result},
    store::{Directory, InsertOutcome},
    types::{CannedResponse, Conversation, NewConversation, Trigger},
};

/// SQLite-backed session directory.
pub struct SqliteDirectory {
    pool: SqlitePool,
}

type ConversationRow = (String, String, String, String, String, Option<String>);

fn row_to_conversation(row: ConversationRow) -> Conversation {
    Conversation {
        id: row.0,
        sender: row.1,
        receiver: row.2,
        channel_id: row.3,
        display_name: row.4,
        avatar_url: row.5,
    }
}

impl SqliteDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `path` and initialize the
    /// schema.
    pub async fn connect(path: &str) -> Result<Self> {
        let url = format!("sqlite:{path}?mode=rwc");
        let pool = SqlitePool::connect(&url)
            .await
            .map_err(|e| Error::unavailable("open database", e))?;
        Self::init(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Initialize the directory table schema.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS conversations (
                id           TEXT PRIMARY KEY,
                sender       TEXT NOT NULL,
                receiver     TEXT NOT NULL,
                channel_id   TEXT NOT NULL,
                display_name TEXT NOT NULL,
                avatar_url   TEXT,
                UNIQUE (sender, receiver)
            )",
        )
        .execute(pool)
        .await
        .map_err(|e| Error::unavailable("init conversations table", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversations_channel
             ON conversations (channel_id)",
        )
        .execute(pool)
        .await
        .map_err(|e| Error::unavailable("init conversations index", e))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS triggers (
                id       TEXT    PRIMARY KEY,
                active   INTEGER NOT NULL DEFAULT 0,
                sender   TEXT    NOT NULL,
                receiver TEXT    NOT NULL,
                message  TEXT    NOT NULL
            )",
        )
        .execute(pool)
        .await
        .map_err(|e| Error::unavailable("init triggers table", e))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS responses (
                id      TEXT PRIMARY KEY,
                message TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await
        .map_err(|e| Error::unavailable("init responses table", e))?;

        Ok(())
    }

    /// Insert a trigger record. Triggers are authored by operational tooling,
    /// not by the relay core, so this lives outside the [`Directory`] trait.
    pub async fn create_trigger(&self, trigger: &Trigger) -> Result<()> {
        sqlx::query(
            "INSERT INTO triggers (id, active, sender, receiver, message)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&trigger.id)
        .bind(trigger.active)
        .bind(&trigger.sender)
        .bind(&trigger.receiver)
        .bind(&trigger.message)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::unavailable("insert trigger", e))?;
        Ok(())
    }
}

#[async_trait]
impl Directory for SqliteDirectory {
    async fn conversation_by_pair(
        &self,
        sender: &str,
        receiver: &str,
    ) -> Result<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            "SELECT id, sender, receiver, channel_id, display_name, avatar_url
             FROM conversations
             WHERE sender = ? AND receiver = ?",
        )
        .bind(sender)
        .bind(receiver)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::unavailable("query conversation by pair", e))?;

        Ok(row.map(row_to_conversation))
    }

    async fn conversations_by_channel(&self, channel_id: &str) -> Result<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, ConversationRow>(
            "SELECT id, sender, receiver, channel_id, display_name, avatar_url
             FROM conversations
             WHERE channel_id = ?",
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::unavailable("query conversations by channel", e))?;

        Ok(rows.into_iter().map(row_to_conversation).collect())
    }

    async fn insert_conversation(&self, new: NewConversation) -> Result<InsertOutcome> {
        let id = Uuid::new_v4().to_string();

        // Single conditional write: the loser of a concurrent first-contact
        // race affects zero rows and re-reads the winner's record.
        let result = sqlx::query(
            "INSERT INTO conversations (id, sender, receiver, channel_id, display_name)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (sender, receiver) DO NOTHING",
        )
        .bind(&id)
        .bind(&new.sender)
        .bind(&new.receiver)
        .bind(&new.channel_id)
        .bind(&new.display_name)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::unavailable("insert conversation", e))?;

        let existing = self
            .conversation_by_pair(&new.sender, &new.receiver)
            .await?
            .ok_or_else(|| {
                Error::not_found("conversation", format!("{}/{}", new.sender, new.receiver))
            })?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::Existing(existing))
        } else {
            Ok(InsertOutcome::Created(existing))
        }
    }

    async fn update_display_name(&self, id: &str, display_name: &str) -> Result<()> {
        let result = sqlx::query("UPDATE conversations SET display_name = ? WHERE id = ?")
            .bind(display_name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::unavailable("update display name", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("conversation", id));
        }
        Ok(())
    }

    async fn update_avatar_url(&self, id: &str, avatar_url: &str) -> Result<()> {
        let result = sqlx::query("UPDATE conversations SET avatar_url = ? WHERE id = ?")
            .bind(avatar_url)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::unavailable("update avatar url", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("conversation", id));
        }
        Ok(())
    }

    async fn trigger(&self, id: &str) -> Result<Option<Trigger>> {
        let row = sqlx::query_as::<_, (String, bool, String, String, String)>(
            "SELECT id, active, sender, receiver, message FROM triggers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::unavailable("query trigger", e))?;

        Ok(row.map(|(id, active, sender, receiver, message)| Trigger {
            id,
            active,
            sender,
            receiver,
            message,
        }))
    }

    async fn canned_response(&self, id: &str) -> Result<Option<CannedResponse>> {
        let row =
            sqlx::query_as::<_, (String, String)>("SELECT id, message FROM responses WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| Error::unavailable("query response", e))?;

        Ok(row.map(|(id, message)| CannedResponse { id, message }))
    }

    async fn list_canned_responses(&self) -> Result<Vec<CannedResponse>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT id, message FROM responses ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::unavailable("list responses", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, message)| CannedResponse { id, message })
            .collect())
    }

    async fn add_canned_response(&self, message: &str) -> Result<CannedResponse> {
        let response = CannedResponse {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
        };

        sqlx::query("INSERT INTO responses (id, message) VALUES (?, ?)")
            .bind(&response.id)
            .bind(&response.message)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::unavailable("insert response", e))?;

        Ok(response)
    }
}
