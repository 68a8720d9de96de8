use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// DbConnection manages the SQLite pool shared by every repository
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and make sure the schema exists
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::setup_schema(&pool).await?;

        info!("Connected to database {}", url);
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Private in-memory database for a single test. One connection that is
    /// never recycled, so the database lives as long as the pool.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Breeding stock
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS grumble_members (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                gender TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                birth_date TEXT NOT NULL,
                profile_image TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // A parent is either a member reference or an external name
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS litters (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                mother_id TEXT REFERENCES grumble_members (id),
                external_mother_name TEXT,
                father_id TEXT REFERENCES grumble_members (id),
                external_father_name TEXT,
                birth_date TEXT NOT NULL,
                available_date TEXT NOT NULL,
                profile_image TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_litters_created_at
            ON litters(created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS puppies (
                id TEXT PRIMARY KEY,
                litter_id TEXT NOT NULL,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                gender TEXT NOT NULL,
                status TEXT NOT NULL,
                price REAL,
                description TEXT,
                profile_image TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (litter_id) REFERENCES litters (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_puppies_litter_id
            ON puppies(litter_id);
            "#,
        )
        .execute(pool)
        .await?;

        // seq gives a stable insertion order for entries submitted in the same millisecond
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS waitlist_entries (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                phone_digits TEXT NOT NULL,
                gender_preference TEXT NOT NULL,
                color_preference TEXT NOT NULL,
                status TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                submitted_at TEXT NOT NULL,
                UNIQUE (gender_preference, phone_digits, color_preference)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_waitlist_phone
            ON waitlist_entries(phone_digits);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Image keys whose owning rows are gone but whose blobs are not yet released
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS image_release_queue (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                image_key TEXT NOT NULL,
                source TEXT NOT NULL,
                queued_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
