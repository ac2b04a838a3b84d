//! Versioned SurrealDB schema for users, settings, complaints, responses
//! and comments.
//!
//! Every table is SCHEMAFULL. Ids are UUID strings; label fields carry the
//! wire label and an ASSERT on the allowed set.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users (identity store)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD full_name ON TABLE user TYPE string;
DEFINE FIELD nik ON TABLE user TYPE string \
    ASSERT string::len($value) = 16;
DEFINE FIELD address ON TABLE user TYPE string;
DEFINE FIELD phone ON TABLE user TYPE option<string>;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['user', 'admin'];
DEFINE FIELD avatar_url ON TABLE user TYPE option<string>;
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_nik ON TABLE user COLUMNS nik UNIQUE;
DEFINE INDEX idx_user_role ON TABLE user COLUMNS role;

-- =======================================================================
-- User settings (one row per user, record id = user id)
-- =======================================================================
DEFINE TABLE user_settings SCHEMAFULL;
DEFINE FIELD user_id ON TABLE user_settings TYPE string;
DEFINE FIELD theme ON TABLE user_settings TYPE string \
    DEFAULT 'light' ASSERT $value IN ['light', 'dark'];
DEFINE FIELD email_notifications ON TABLE user_settings TYPE bool \
    DEFAULT true;
DEFINE FIELD sms_notifications ON TABLE user_settings TYPE bool \
    DEFAULT false;
DEFINE FIELD language ON TABLE user_settings TYPE string DEFAULT 'id';
DEFINE FIELD timezone ON TABLE user_settings TYPE string \
    DEFAULT 'Asia/Jakarta';
DEFINE FIELD updated_at ON TABLE user_settings TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_settings_user ON TABLE user_settings \
    COLUMNS user_id UNIQUE;

-- =======================================================================
-- Complaints
-- =======================================================================
DEFINE TABLE complaint SCHEMAFULL;
DEFINE FIELD user_id ON TABLE complaint TYPE string;
DEFINE FIELD title ON TABLE complaint TYPE string;
DEFINE FIELD description ON TABLE complaint TYPE string;
DEFINE FIELD category ON TABLE complaint TYPE string \
    ASSERT $value IN ['Infrastruktur', 'Sosial', 'Kebersihan', \
    'Keamanan', 'Pelayanan Publik'];
DEFINE FIELD priority ON TABLE complaint TYPE string \
    ASSERT $value IN ['Tinggi', 'Sedang', 'Rendah'];
DEFINE FIELD status ON TABLE complaint TYPE string \
    ASSERT $value IN ['Pending', 'In Progress', 'Solved'];
DEFINE FIELD location ON TABLE complaint TYPE option<string>;
DEFINE FIELD image_url ON TABLE complaint TYPE option<string>;
DEFINE FIELD created_at ON TABLE complaint TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE complaint TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_complaint_user ON TABLE complaint COLUMNS user_id;

-- =======================================================================
-- Admin responses
-- =======================================================================
DEFINE TABLE response SCHEMAFULL;
DEFINE FIELD complaint_id ON TABLE response TYPE string;
DEFINE FIELD admin_id ON TABLE response TYPE string;
DEFINE FIELD message ON TABLE response TYPE string;
DEFINE FIELD created_at ON TABLE response TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_response_complaint ON TABLE response \
    COLUMNS complaint_id;

-- =======================================================================
-- Discussion comments (append-only)
-- =======================================================================
DEFINE TABLE comment SCHEMAFULL;
DEFINE FIELD complaint_id ON TABLE comment TYPE string;
DEFINE FIELD user_id ON TABLE comment TYPE string;
DEFINE FIELD message ON TABLE comment TYPE string;
DEFINE FIELD created_at ON TABLE comment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_comment_complaint ON TABLE comment \
    COLUMNS complaint_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Apply every migration newer than the highest version recorded in
/// `_migration`, recording each one as it lands.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
