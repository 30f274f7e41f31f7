//! SQL schema for the Tract SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Dates are stored as `YYYY-MM-DD`, so text comparison is date order and the
/// `check_start_end_date` constraint holds for every row regardless of how it
/// was written.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS projects (
    project_id       TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    description      TEXT,
    start_date       TEXT NOT NULL,   -- YYYY-MM-DD
    end_date         TEXT NOT NULL,   -- YYYY-MM-DD
    area_of_interest TEXT NOT NULL,   -- JSON feature blob
    CONSTRAINT check_name_length    CHECK (length(name) BETWEEN 1 AND 32),
    CONSTRAINT check_start_end_date CHECK (start_date <= end_date)
);

PRAGMA user_version = 1;
";

/// Applied when name uniqueness is enabled.
pub const UNIQUE_NAMES_ON: &str =
  "CREATE UNIQUE INDEX IF NOT EXISTS projects_name_unique ON projects(name);";

/// Applied when name uniqueness is disabled, so reopening an existing file
/// with the option turned off lifts the constraint.
pub const UNIQUE_NAMES_OFF: &str = "DROP INDEX IF EXISTS projects_name_unique;";
