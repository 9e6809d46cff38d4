//! Encoding and decoding helpers between Rust domain types and the plain
//! values stored in SQLite columns.
//!
//! Ids are stored as `INTEGER`. Note timestamps are written by SQLite as
//! RFC 3339 strings with millisecond precision.

use chrono::{DateTime, NaiveDateTime, Utc};
use rememberall_core::{
  note::{Note, NoteId},
  person::{Person, PersonId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Accepts RFC 3339 and SQLite's bare `CURRENT_TIMESTAMP` form
/// (`YYYY-MM-DD HH:MM:SS`, implicitly UTC).
pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .or_else(|_| {
      NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
    })
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn affected(rows: usize) -> u64 { rows as u64 }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `people` row.
pub struct RawPerson {
  pub id:    i64,
  pub name:  String,
  pub notes: Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, name: row.get(1)?, notes: row.get(2)? })
  }

  pub fn into_person(self, groups: Vec<String>) -> Person {
    Person {
      id: PersonId(self.id),
      name: self.name,
      groups,
      notes: self.notes.filter(|n| !n.trim().is_empty()),
    }
  }
}

/// Raw values read directly from a `notes` row.
pub struct RawNote {
  pub id:         i64,
  pub person_id:  i64,
  pub content:    String,
  pub created_at: String,
}

impl RawNote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      person_id:  row.get(1)?,
      content:    row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:         NoteId(self.id),
      person_id:  PersonId(self.person_id),
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
