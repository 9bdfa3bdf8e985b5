//! Database initialization
//!
//! Creates the schema on first run and opens the shared connection pool.
//! All CREATE statements are idempotent so startup is safe to repeat.

use crate::auth::{generate_salt, hash_password};
use crate::config::{ADMIN_PASSWORD_ENV, ADMIN_USER_ENV};
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while a moderation write is in flight
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_submissions_table(&pool).await?;
    create_quantum_computers_table(&pool).await?;
    create_admin_users_table(&pool).await?;

    seed_bootstrap_admin(&pool).await?;

    Ok(pool)
}

/// Create the submissions table
///
/// One row per proposed data point. `status` governs visibility: the
/// moderation queue shows PENDING and UPDATE_REQUESTED, the public views
/// show APPROVED only. Rejection is physical deletion.
pub async fn create_submissions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reference TEXT NOT NULL,
            date TEXT,
            computation TEXT NOT NULL DEFAULT '[]',
            num_qubits INTEGER,
            num_2q_gates INTEGER,
            num_1q_gates INTEGER,
            total_gates INTEGER,
            circuit_depth INTEGER,
            circuit_depth_measure TEXT,
            institution TEXT,
            computer TEXT,
            error_mitigation TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (status IN ('PENDING', 'UPDATE_REQUESTED', 'APPROVED')),
            feedback TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (num_qubits IS NULL OR num_qubits > 0),
            CHECK (num_2q_gates IS NULL OR num_2q_gates >= 0),
            CHECK (num_1q_gates IS NULL OR num_1q_gates >= 0),
            CHECK (total_gates IS NULL OR total_gates >= 0),
            CHECK (circuit_depth IS NULL OR circuit_depth >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_submissions_status ON submissions(status)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_submissions_reference ON submissions(reference)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the quantum_computers reference table
///
/// Static metadata describing known machines. Not lifecycle-managed here;
/// rows are seeded out of band and only browsed/exported.
pub async fn create_quantum_computers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quantum_computers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            institution TEXT NOT NULL,
            name TEXT NOT NULL UNIQUE,
            vendor TEXT,
            technology TEXT,
            num_qubits INTEGER,
            notes TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (num_qubits IS NULL OR num_qubits > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_quantum_computers_institution ON quantum_computers(institution)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the admin_users credential table
pub async fn create_admin_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_users (
            username TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the bootstrap admin user from the environment when the credential
/// table is empty (single-shared-login deployment).
async fn seed_bootstrap_admin(pool: &SqlitePool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let (username, password) = match (
        std::env::var(ADMIN_USER_ENV),
        std::env::var(ADMIN_PASSWORD_ENV),
    ) {
        (Ok(u), Ok(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            warn!(
                "No admin users and {}/{} not set; admin login unavailable",
                ADMIN_USER_ENV, ADMIN_PASSWORD_ENV
            );
            return Ok(());
        }
    };

    let salt = generate_salt();
    let hash = hash_password(&password, &salt);

    sqlx::query(
        "INSERT OR IGNORE INTO admin_users (username, password_hash, password_salt) VALUES (?, ?, ?)",
    )
    .bind(&username)
    .bind(&hash)
    .bind(&salt)
    .execute(pool)
    .await?;

    info!("Seeded bootstrap admin user '{}'", username);
    Ok(())
}
