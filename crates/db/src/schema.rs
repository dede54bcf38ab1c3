use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Indexes backing the owner and status lookups; every list query in the
/// repositories is served by one of these.
const INDEXES: [&str; 9] = [
    "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_uid ON sessions(uid)",
    "CREATE INDEX IF NOT EXISTS idx_schedules_programmer_date ON schedules(programmer_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_advisories_programmer_date ON advisories(programmer_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_advisories_programmer_status ON advisories(programmer_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_advisories_user_id ON advisories(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_projects_programmer_id ON projects(programmer_id)",
    "CREATE INDEX IF NOT EXISTS idx_notifications_user_read ON notifications(user_id, read)",
    "CREATE INDEX IF NOT EXISTS idx_notifications_created_at ON notifications(created_at)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            uid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            display_name VARCHAR(255) NULL,
            photo_url TEXT NULL,
            role VARCHAR(20) NOT NULL DEFAULT 'user',
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_role CHECK (role IN ('admin', 'programmer', 'user'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(128) PRIMARY KEY,
            uid UUID NOT NULL REFERENCES users(uid) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Owner columns below carry no foreign keys: deleting a user leaves
    // their schedules, advisories, projects and notifications in place.

    // Create schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            programmer_id UUID NOT NULL,
            programmer_name VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create advisories table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS advisories (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            user_name VARCHAR(255) NOT NULL,
            user_email VARCHAR(255) NOT NULL,
            programmer_id UUID NOT NULL,
            programmer_name VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            time VARCHAR(5) NOT NULL,
            comment TEXT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            response_message TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (
                status IN ('pending', 'approved', 'rejected', 'cancelled', 'completed')
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create projects table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            programmer_id UUID NOT NULL,
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            category VARCHAR(20) NOT NULL,
            participation JSONB NOT NULL DEFAULT '[]'::jsonb,
            technologies TEXT[] NOT NULL DEFAULT '{}',
            repository_url TEXT NOT NULL,
            demo_url TEXT NOT NULL,
            image_url TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_category CHECK (category IN ('academic', 'professional'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create notifications table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            kind VARCHAR(32) NOT NULL,
            title VARCHAR(255) NOT NULL,
            message TEXT NOT NULL,
            read BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            advisory_id UUID NULL,
            related_user_id UUID NULL,
            related_user_name VARCHAR(255) NULL,
            related_user_email VARCHAR(255) NULL,
            advisory_date DATE NULL,
            advisory_time VARCHAR(5) NULL,
            sent_by_email BOOLEAN NOT NULL DEFAULT FALSE
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create external_notifications table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS external_notifications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            recipient VARCHAR(255) NOT NULL,
            subject VARCHAR(255) NOT NULL,
            message TEXT NOT NULL,
            channel VARCHAR(20) NOT NULL,
            status VARCHAR(20) NOT NULL,
            sent_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
