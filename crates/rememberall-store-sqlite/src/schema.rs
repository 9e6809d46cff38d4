//! SQL schema for the RememberAll SQLite store.
//!
//! Executed at connection startup and by `setup()`: [`SCHEMA`] first, then the
//! legacy upgrade in [`crate::legacy`], then [`INDEXES`]. `PRAGMA user_version`
//! only marks whether that upgrade has run.

/// Pragmas and tables; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS groups (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS people (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL DEFAULT '',
    notes TEXT                       -- legacy inline note; never written
);

CREATE TABLE IF NOT EXISTS notes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id   INTEGER NOT NULL REFERENCES people(id) ON DELETE CASCADE,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- Person <-> group association, keyed by id so renames never touch it.
CREATE TABLE IF NOT EXISTS memberships (
    person_id  INTEGER NOT NULL REFERENCES people(id) ON DELETE CASCADE,
    group_id   INTEGER NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
    PRIMARY KEY (person_id, group_id)
);
";

/// Indexes, created once older files have been brought in line with them.
pub const INDEXES: &str = "
-- Backstop for the case-insensitive uniqueness check done on insert/rename.
CREATE UNIQUE INDEX IF NOT EXISTS groups_name_idx ON groups(name COLLATE NOCASE);

CREATE INDEX IF NOT EXISTS notes_person_idx       ON notes(person_id, created_at);
CREATE INDEX IF NOT EXISTS memberships_group_idx  ON memberships(group_id);

PRAGMA user_version = 1;
";
