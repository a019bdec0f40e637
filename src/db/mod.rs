//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            password_hash TEXT,
            avatar_url TEXT,
            role TEXT NOT NULL DEFAULT 'user',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token_hash TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shelters (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            contact_email TEXT NOT NULL,
            contact_phone TEXT,
            city TEXT,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'pending_review',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS shelter_members (
            shelter_id TEXT NOT NULL REFERENCES shelters(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            role TEXT NOT NULL,
            joined_at TEXT NOT NULL,
            PRIMARY KEY (shelter_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shelter_invites (
            id TEXT PRIMARY KEY,
            shelter_id TEXT NOT NULL REFERENCES shelters(id) ON DELETE CASCADE,
            email TEXT NOT NULL,
            role TEXT NOT NULL,
            token_hash TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'pending',
            invited_by TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- At most one pending invite per (shelter, email).
        CREATE UNIQUE INDEX IF NOT EXISTS idx_invites_pending_unique
            ON shelter_invites(shelter_id, email) WHERE status = 'pending';
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pets (
            id TEXT PRIMARY KEY,
            shelter_id TEXT NOT NULL REFERENCES shelters(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            species TEXT NOT NULL,
            breed TEXT,
            age_months INTEGER,
            size TEXT,
            vaccinated INTEGER NOT NULL DEFAULT 0,
            spayed INTEGER NOT NULL DEFAULT 0,
            photo_urls TEXT,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'available',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS adoption_requests (
            id TEXT PRIMARY KEY,
            pet_id TEXT NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
            shelter_id TEXT NOT NULL,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            household TEXT,
            message TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            decision_notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS campaigns (
            id TEXT PRIMARY KEY,
            pet_id TEXT NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            goal_cents INTEGER NOT NULL,
            raised_cents INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS campaign_participants (
            id TEXT PRIMARY KEY,
            campaign_id TEXT NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            donated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vet_bookings (
            id TEXT PRIMARY KEY,
            vet_name TEXT NOT NULL,
            slot_at TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            pet_id TEXT,
            status TEXT NOT NULL DEFAULT 'booked',
            created_at TEXT NOT NULL
        );

        -- One active booking per (vet, slot); cancelled rows free the slot.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_slot_unique
            ON vet_bookings(vet_name, slot_at) WHERE status = 'booked';
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_members_user ON shelter_members(user_id);
        CREATE INDEX IF NOT EXISTS idx_invites_shelter ON shelter_invites(shelter_id);
        CREATE INDEX IF NOT EXISTS idx_pets_shelter ON pets(shelter_id);
        CREATE INDEX IF NOT EXISTS idx_pets_status ON pets(status);
        CREATE INDEX IF NOT EXISTS idx_requests_shelter ON adoption_requests(shelter_id);
        CREATE INDEX IF NOT EXISTS idx_requests_pet ON adoption_requests(pet_id);
        CREATE INDEX IF NOT EXISTS idx_requests_status ON adoption_requests(status);
        CREATE INDEX IF NOT EXISTS idx_participants_campaign ON campaign_participants(campaign_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
