// =============================================================================
// Atelier Backend - Database Layer
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

/// Format version of the serialized `scene_objects` payload.
pub const PAYLOAD_VERSION: i64 = 1;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

/// Scene model.
///
/// `scene_objects` is an opaque serialized blob owned by the editor client;
/// the store never interprets its structure.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Scene {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub scene_objects: String,
    pub payload_version: i64,
    pub camera_x: f64,
    pub camera_y: f64,
    pub camera_z: f64,
    pub view_mode: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Scene listing entry (heavy fields omitted).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SceneSummary {
    pub id: String,
    pub name: String,
    pub last_modified: DateTime<Utc>,
}

/// Mutable scene fields carried by a save.
#[derive(Debug, Clone)]
pub struct SceneDraft {
    /// `None` keeps the stored name on update, or generates a placeholder on
    /// creation.
    pub name: Option<String>,
    pub scene_objects: String,
    pub camera_x: f64,
    pub camera_y: f64,
    pub camera_z: f64,
    pub view_mode: String,
}

impl Database {
    /// Create a new database connection pool.
    pub async fn new(url: &str) -> Result<Self, sqlx::Error> {
        // Add create_if_missing option for SQLite
        let url_with_options = if url.starts_with("sqlite:") && !url.contains("?") {
            format!("{}?mode=rwc", url)
        } else if url.starts_with("sqlite:") && !url.contains("mode=") {
            format!("{}&mode=rwc", url)
        } else {
            url.to_string()
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url_with_options)
            .await?;

        Ok(Self { pool })
    }

    /// In-memory database for tests. Single connection: every pooled
    /// connection to `sqlite::memory:` gets its own database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run database migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scenes (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                scene_objects TEXT NOT NULL DEFAULT '[]',
                payload_version INTEGER NOT NULL DEFAULT 1,
                camera_x REAL NOT NULL DEFAULT 0,
                camera_y REAL NOT NULL DEFAULT 5,
                camera_z REAL NOT NULL DEFAULT 10,
                view_mode TEXT NOT NULL DEFAULT 'solid',
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                last_modified TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Listing is always owner-scoped and ordered by recency
        let _ = sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_scenes_owner_modified ON scenes(owner_id, last_modified)",
        )
        .execute(&self.pool)
        .await;

        tracing::info!("Database migrations complete");
        Ok(())
    }

    // =========================================================================
    // Scene Methods
    // =========================================================================

    /// Create a new scene with a fresh identifier.
    pub async fn create_scene(
        &self,
        owner_id: &str,
        draft: SceneDraft,
    ) -> Result<Scene, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let name = draft
            .name
            .unwrap_or_else(|| format!("Scene {}", now.format("%Y-%m-%d %H:%M")));

        sqlx::query(
            r#"
            INSERT INTO scenes (id, owner_id, name, scene_objects, payload_version, camera_x, camera_y, camera_z, view_mode, created_at, last_modified)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&name)
        .bind(&draft.scene_objects)
        .bind(PAYLOAD_VERSION)
        .bind(draft.camera_x)
        .bind(draft.camera_y)
        .bind(draft.camera_z)
        .bind(&draft.view_mode)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.find_scene_by_id(&id, owner_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update a scene owned by the caller, or create a new one on miss.
    ///
    /// The update is a single statement, so concurrent saves to the same id
    /// are last-write-wins with no interleaved fields. A miss (unknown id, or
    /// an id owned by someone else) falls through to `create_scene` with a
    /// fresh identifier; the supplied id is never reused.
    pub async fn upsert_scene(
        &self,
        id: &str,
        owner_id: &str,
        draft: SceneDraft,
    ) -> Result<Scene, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE scenes
            SET name = COALESCE(?, name),
                scene_objects = ?,
                payload_version = ?,
                camera_x = ?,
                camera_y = ?,
                camera_z = ?,
                view_mode = ?,
                last_modified = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.scene_objects)
        .bind(PAYLOAD_VERSION)
        .bind(draft.camera_x)
        .bind(draft.camera_y)
        .bind(draft.camera_z)
        .bind(&draft.view_mode)
        .bind(now.to_rfc3339())
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return self.create_scene(owner_id, draft).await;
        }

        self.find_scene_by_id(id, owner_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a scene by id, scoped to its owner.
    pub async fn find_scene_by_id(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<Scene>, sqlx::Error> {
        sqlx::query_as::<_, Scene>("SELECT * FROM scenes WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List the caller's scenes, most recently modified first.
    pub async fn list_scenes_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<SceneSummary>, sqlx::Error> {
        sqlx::query_as::<_, SceneSummary>(
            "SELECT id, name, last_modified FROM scenes WHERE owner_id = ? ORDER BY last_modified DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete a scene if owned by the caller. Deleting an unknown or foreign
    /// id is a successful no-op.
    pub async fn delete_scene(&self, id: &str, owner_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM scenes WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
