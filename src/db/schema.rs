//! Database schema and migrations for Files Manager.
//!
//! Migrations are applied in order; the schema_version table tracks which
//! ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    id          TEXT NOT NULL UNIQUE,
    email       TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,           -- Argon2 hash
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: file nodes
    r#"
CREATE TABLE files (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,  -- creation order
    id           TEXT NOT NULL UNIQUE,
    owner_id     TEXT NOT NULL REFERENCES users(id),
    name         TEXT NOT NULL,
    node_type    TEXT NOT NULL CHECK (node_type IN ('folder', 'file', 'image')),
    parent_id    TEXT,                               -- NULL = root
    is_public    INTEGER NOT NULL DEFAULT 0,
    content_ref  TEXT,
    created_at   TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK ((node_type = 'folder') = (content_ref IS NULL))
);

CREATE INDEX idx_files_owner_parent ON files(owner_id, parent_id, seq);
"#,
];
