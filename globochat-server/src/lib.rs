use anyhow::Context;
use axum::http::StatusCode;
use dashmap::DashMap;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

pub mod controllers;
pub mod routes;

/// Shared application state.
pub struct AppState {
    pub pool: SqlitePool,
    /// Map of connection id -> sender used to queue outbound frames for that
    /// websocket session. Every broadcast walks this map.
    pub sessions: DashMap<Uuid, UnboundedSender<String>>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, sessions: DashMap::new() }
    }
}

/// Given a file path, returns a valid SQLite URL. Creates parent directories
/// and the file itself if missing.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite:///{}", s))
}

/// Builds the SQLite URL from the DATABASE_URL env var, defaulting to
/// "globochat.db" in the current directory. "sqlite::memory:" passes through.
pub fn build_sqlite_url() -> anyhow::Result<String> {
    let raw = std::env::var("DATABASE_URL").unwrap_or_else(|_| "globochat.db".to_string());
    if raw == "sqlite::memory:" {
        return Ok(raw);
    }
    let path_part = if raw.starts_with("sqlite://") {
        raw.trim_start_matches("sqlite:///")
            .trim_start_matches("sqlite://")
            .to_string()
    } else {
        raw
    };
    sqlite_url_for_path(&PathBuf::from(path_part))
}

/// Connects to the database and returns a connection pool.
pub async fn connect_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

/// Applies the schema. Idempotent; runs at every boot.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let stmts = [r#"
        CREATE TABLE IF NOT EXISTS messages (
            id        TEXT PRIMARY KEY,
            username  TEXT NOT NULL,
            message   TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );"#];
    for s in &stmts {
        sqlx::query(s)
            .execute(pool)
            .await
            .with_context(|| format!("apply migration: {}", &s[..s.len().min(40)].replace('\n', " ")))?;
    }
    Ok(())
}

/// Liveness probe: healthy when a connection can be acquired from the pool.
pub async fn health_with_pool(pool: &SqlitePool) -> StatusCode {
    match pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
