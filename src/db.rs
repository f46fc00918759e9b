use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("connection pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Admin accounts. Also issued by the bootstrap routine, so it must stay idempotent.
pub const ADMINS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS admins (
        id INTEGER PRIMARY KEY,
        username TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
";

pub fn init_pool(path: &Path, max_size: u32) -> DbResult<DbPool> {
    let manager = SqliteConnectionManager::file(path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys=ON;"));
    let pool = Pool::builder().max_size(max_size.max(1)).build(manager)?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> DbResult<()> {
    let conn = pool.get()?;

    conn.execute_batch(ADMINS_TABLE)?;
    conn.execute_batch(
        "
        -- News articles
        CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            summary TEXT NOT NULL,
            body TEXT NOT NULL,
            category TEXT NOT NULL,
            image TEXT,
            created_at DATETIME NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_articles_category ON articles(category);
        CREATE INDEX IF NOT EXISTS idx_articles_created ON articles(created_at);

        -- Advertisements, selected per slot
        CREATE TABLE IF NOT EXISTS ads (
            id INTEGER PRIMARY KEY,
            slot TEXT NOT NULL,
            title TEXT,
            text TEXT,
            href TEXT,
            image TEXT,
            category TEXT,
            kind TEXT NOT NULL DEFAULT 'patrocinador',
            weight INTEGER NOT NULL DEFAULT 100,
            adsense_slot TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            created_at DATETIME NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ads_slot ON ads(slot, active);

        -- Admin sessions
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            admin_id INTEGER NOT NULL,
            username TEXT NOT NULL,
            created_at DATETIME NOT NULL,
            expires_at DATETIME NOT NULL,
            FOREIGN KEY (admin_id) REFERENCES admins(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_expiry ON sessions(expires_at);
        ",
    )?;

    Ok(())
}
