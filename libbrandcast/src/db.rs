//! Database operations for Brandcast

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;

use crate::error::{DbError, Result};
use crate::types::{
    ContentItem, ContentStatus, ContentType, Platform, PlatformAccount, ScheduleEntry,
    ScheduleStatus,
};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection and run migrations.
    ///
    /// `":memory:"` opens an in-memory database on a single connection,
    /// which tests rely on.
    pub async fn new(db_path: &str) -> Result<Self> {
        let pool = if db_path == ":memory:" {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .map_err(DbError::SqlxError)?
        } else {
            // Expand path and create parent directories
            let expanded_path = shellexpand::tilde(db_path).to_string();
            let path = Path::new(&expanded_path);

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(DbError::IoError)?;
            }

            // Forward slashes work in SQLite URLs on every platform;
            // mode=rwc creates the file when missing.
            let db_url = format!("sqlite://{}?mode=rwc", expanded_path.replace('\\', "/"));
            SqlitePool::connect(&db_url)
                .await
                .map_err(DbError::SqlxError)?
        };

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DbError::MigrationError)?;

        Ok(Self { pool })
    }

    // ========================================================================
    // Content items
    // ========================================================================

    /// Insert a new content item.
    pub async fn create_content(&self, item: &ContentItem) -> Result<()> {
        let target_platforms = serde_json::to_string(&item.target_platforms).unwrap_or_default();
        let media_urls = serde_json::to_string(&item.media_urls).unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO content_items (
                id, client_id, status, caption, caption_short, hashtags,
                call_to_action, content_type, target_platforms, primary_media_url,
                media_urls, rejection_reason, approved_at, approved_by,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.client_id)
        .bind(item.status.as_str())
        .bind(&item.caption)
        .bind(&item.caption_short)
        .bind(&item.hashtags)
        .bind(&item.call_to_action)
        .bind(item.content_type.as_str())
        .bind(target_platforms)
        .bind(&item.primary_media_url)
        .bind(media_urls)
        .bind(&item.rejection_reason)
        .bind(item.approved_at)
        .bind(&item.approved_by)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(())
    }

    /// Get a client's content item by id.
    pub async fn get_content(&self, content_id: &str, client_id: &str) -> Result<Option<ContentItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, client_id, status, caption, caption_short, hashtags,
                   call_to_action, content_type, target_platforms, primary_media_url,
                   media_urls, rejection_reason, approved_at, approved_by,
                   created_at, updated_at
            FROM content_items WHERE id = ? AND client_id = ?
            "#,
        )
        .bind(content_id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(row.map(content_item_from_row))
    }

    /// Persist the mutable fields of a content item.
    pub async fn update_content(&self, item: &ContentItem) -> Result<()> {
        let target_platforms = serde_json::to_string(&item.target_platforms).unwrap_or_default();
        let media_urls = serde_json::to_string(&item.media_urls).unwrap_or_default();

        sqlx::query(
            r#"
            UPDATE content_items SET
                status = ?, caption = ?, caption_short = ?, hashtags = ?,
                call_to_action = ?, content_type = ?, target_platforms = ?,
                primary_media_url = ?, media_urls = ?, rejection_reason = ?,
                approved_at = ?, approved_by = ?, updated_at = ?
            WHERE id = ? AND client_id = ?
            "#,
        )
        .bind(item.status.as_str())
        .bind(&item.caption)
        .bind(&item.caption_short)
        .bind(&item.hashtags)
        .bind(&item.call_to_action)
        .bind(item.content_type.as_str())
        .bind(target_platforms)
        .bind(&item.primary_media_url)
        .bind(media_urls)
        .bind(&item.rejection_reason)
        .bind(item.approved_at)
        .bind(&item.approved_by)
        .bind(item.updated_at)
        .bind(&item.id)
        .bind(&item.client_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(())
    }

    /// Update a content item's lifecycle status.
    pub async fn update_content_status(&self, content_id: &str, status: ContentStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE content_items SET status = ?, updated_at = ? WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(chrono::Utc::now().timestamp())
        .bind(content_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(())
    }

    /// List a client's content items awaiting review, oldest first.
    pub async fn list_pending_review(&self, client_id: &str) -> Result<Vec<ContentItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, client_id, status, caption, caption_short, hashtags,
                   call_to_action, content_type, target_platforms, primary_media_url,
                   media_urls, rejection_reason, approved_at, approved_by,
                   created_at, updated_at
            FROM content_items
            WHERE client_id = ? AND status = 'pending_approval'
            ORDER BY created_at ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(rows.into_iter().map(content_item_from_row).collect())
    }

    // ========================================================================
    // Platform accounts
    // ========================================================================

    /// Record a connected account, superseding any previous active account
    /// for the same (client, platform) pair.
    pub async fn upsert_account(
        &self,
        client_id: &str,
        platform: Platform,
        provider_account_id: &str,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(DbError::SqlxError)?;

        sqlx::query(
            r#"
            UPDATE platform_accounts SET is_active = 0
            WHERE client_id = ? AND platform = ? AND is_active = 1
            "#,
        )
        .bind(client_id)
        .bind(platform.as_str())
        .execute(&mut *tx)
        .await
        .map_err(DbError::SqlxError)?;

        sqlx::query(
            r#"
            INSERT INTO platform_accounts (client_id, platform, provider_account_id, is_active, connected_at)
            VALUES (?, ?, ?, 1, ?)
            "#,
        )
        .bind(client_id)
        .bind(platform.as_str())
        .bind(provider_account_id)
        .bind(chrono::Utc::now().timestamp())
        .execute(&mut *tx)
        .await
        .map_err(DbError::SqlxError)?;

        tx.commit().await.map_err(DbError::SqlxError)?;
        Ok(())
    }

    /// Deactivate a client's account for a platform (disconnect action).
    pub async fn deactivate_account(&self, client_id: &str, platform: Platform) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE platform_accounts SET is_active = 0
            WHERE client_id = ? AND platform = ? AND is_active = 1
            "#,
        )
        .bind(client_id)
        .bind(platform.as_str())
        .execute(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(())
    }

    /// List a client's active connected accounts.
    pub async fn get_active_accounts(&self, client_id: &str) -> Result<Vec<PlatformAccount>> {
        let rows = sqlx::query(
            r#"
            SELECT id, client_id, platform, provider_account_id, is_active, connected_at
            FROM platform_accounts
            WHERE client_id = ? AND is_active = 1
            ORDER BY platform ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let platform: String = r.get("platform");
                Some(PlatformAccount {
                    id: Some(r.get("id")),
                    client_id: r.get("client_id"),
                    platform: platform.parse().ok()?,
                    provider_account_id: r.get("provider_account_id"),
                    is_active: r.get::<i64, _>("is_active") != 0,
                    connected_at: r.get("connected_at"),
                })
            })
            .collect())
    }

    // ========================================================================
    // Schedule entries
    // ========================================================================

    /// Insert a batch of schedule entries from one orchestration call.
    ///
    /// The batch is written in a single transaction: either every
    /// requested platform gets its row or none do.
    pub async fn create_schedule_entries(&self, entries: &[ScheduleEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(DbError::SqlxError)?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO schedule_entries (
                    content_id, client_id, platform, scheduled_at, status,
                    provider_post_id, created_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&entry.content_id)
            .bind(&entry.client_id)
            .bind(entry.platform.as_str())
            .bind(entry.scheduled_at)
            .bind(entry.status.as_str())
            .bind(&entry.provider_post_id)
            .bind(entry.created_at)
            .execute(&mut *tx)
            .await
            .map_err(DbError::SqlxError)?;
        }

        tx.commit().await.map_err(DbError::SqlxError)?;
        Ok(())
    }

    /// List schedule entries for a content item, oldest first.
    pub async fn list_schedule_entries(&self, content_id: &str) -> Result<Vec<ScheduleEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, content_id, client_id, platform, scheduled_at, status,
                   provider_post_id, created_at
            FROM schedule_entries
            WHERE content_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(rows.into_iter().filter_map(schedule_entry_from_row).collect())
    }

    /// List a client's schedule entries, newest first.
    pub async fn list_client_schedule_entries(
        &self,
        client_id: &str,
        limit: i64,
    ) -> Result<Vec<ScheduleEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, content_id, client_id, platform, scheduled_at, status,
                   provider_post_id, created_at
            FROM schedule_entries
            WHERE client_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(client_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(rows.into_iter().filter_map(schedule_entry_from_row).collect())
    }

    /// Record a provider-reported per-platform delivery outcome.
    pub async fn update_delivery_status(
        &self,
        provider_post_id: &str,
        platform: Platform,
        status: ScheduleStatus,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE schedule_entries SET status = ?
            WHERE provider_post_id = ? AND platform = ?
            "#,
        )
        .bind(status.as_str())
        .bind(provider_post_id)
        .bind(platform.as_str())
        .execute(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(())
    }
}

fn content_item_from_row(row: sqlx::sqlite::SqliteRow) -> ContentItem {
    let status: String = row.get("status");
    let content_type: String = row.get("content_type");
    let target_platforms: String = row.get("target_platforms");
    let media_urls: String = row.get("media_urls");

    ContentItem {
        id: row.get("id"),
        client_id: row.get("client_id"),
        status: match status.as_str() {
            "pending_approval" => ContentStatus::PendingApproval,
            "approved" => ContentStatus::Approved,
            "rejected" => ContentStatus::Rejected,
            "scheduled" => ContentStatus::Scheduled,
            "posted" => ContentStatus::Posted,
            "failed" => ContentStatus::Failed,
            _ => ContentStatus::Draft,
        },
        caption: row.get("caption"),
        caption_short: row.get("caption_short"),
        hashtags: row.get("hashtags"),
        call_to_action: row.get("call_to_action"),
        content_type: content_type.parse().unwrap_or(ContentType::Text),
        target_platforms: serde_json::from_str(&target_platforms).unwrap_or_default(),
        primary_media_url: row.get("primary_media_url"),
        media_urls: serde_json::from_str(&media_urls).unwrap_or_default(),
        rejection_reason: row.get("rejection_reason"),
        approved_at: row.get("approved_at"),
        approved_by: row.get("approved_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn schedule_entry_from_row(row: sqlx::sqlite::SqliteRow) -> Option<ScheduleEntry> {
    let platform: String = row.get("platform");
    let status: String = row.get("status");

    Some(ScheduleEntry {
        id: Some(row.get("id")),
        content_id: row.get("content_id"),
        client_id: row.get("client_id"),
        platform: platform.parse().ok()?,
        scheduled_at: row.get("scheduled_at"),
        status: match status.as_str() {
            "queued" => ScheduleStatus::Queued,
            "posted" => ScheduleStatus::Posted,
            "failed" => ScheduleStatus::Failed,
            _ => ScheduleStatus::Posting,
        },
        provider_post_id: row.get("provider_post_id"),
        created_at: row.get("created_at"),
    })
}
