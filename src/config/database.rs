//! Database configuration and connection pool initialization.
//!
//! The pool is the only piece of shared mutable state between request
//! workers; its concurrency discipline (connection caps, idle and lifetime
//! limits) is delegated entirely to SQLx and tuned from the environment.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DB_MAX_CONNS`: maximum pool size (default 5)
//! - `DB_MIN_CONNS`: connections kept warm (default 1)
//! - `DB_MAX_CONN_IDLE_TIME`: idle timeout in seconds (default 300)
//! - `DB_MAX_CONN_LIFETIME`: per-connection lifetime in seconds (default 1800)
//!
//! # Panics
//!
//! [`init_db_pool`] panics if `DATABASE_URL` is unset or the initial
//! connection fails; the process cannot do anything useful without it.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;

/// Initializes the PostgreSQL connection pool.
///
/// Called once during startup; the returned pool is cheaply cloneable and is
/// handed to the application state for use in stores.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPoolOptions::new()
        .max_connections(env_u32("DB_MAX_CONNS", 5))
        .min_connections(env_u32("DB_MIN_CONNS", 1))
        .idle_timeout(Duration::from_secs(env_u64("DB_MAX_CONN_IDLE_TIME", 300)))
        .max_lifetime(Duration::from_secs(env_u64("DB_MAX_CONN_LIFETIME", 1800)))
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
