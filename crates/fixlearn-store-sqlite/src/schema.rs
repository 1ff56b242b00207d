//! SQL schema for the Fix&Learn SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Messages are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS messages (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC, fixed-width micros
    session_id  TEXT NOT NULL,
    message     TEXT NOT NULL    -- JSON: {role, content, data?}
);

CREATE INDEX IF NOT EXISTS messages_session_created_idx
    ON messages(session_id, created_at);

PRAGMA user_version = 1;
";
