//! [`SqliteStore`], the SQLite implementation of [`ContactStore`].

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
  time::Duration,
};

use rememberall_core::{
  group::{Group, GroupId, normalize_group_name, same_group_name},
  note::{Note, NoteId},
  person::{Person, PersonEntry, PersonId, PersonInput},
  search::PersonFilter,
  store::ContactStore,
};
use rusqlite::{OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Result,
  encode::{RawNote, RawPerson, affected},
  legacy,
  schema::{INDEXES, SCHEMA},
};

type CoreError = rememberall_core::Error;

/// How long a statement waits on a locked database file before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Config ──────────────────────────────────────────────────────────────────

/// Where and how to open a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
  pub path:         PathBuf,
  pub busy_timeout: Duration,
}

impl StoreConfig {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), busy_timeout: DEFAULT_BUSY_TIMEOUT }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A RememberAll store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(StoreConfig::new(path.as_ref())).await
  }

  pub async fn open_with(config: StoreConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(&config.path).await?;
    let store = Self { conn };
    store.set_busy_timeout(config.busy_timeout).await?;
    store.init_schema().await?;
    tracing::debug!(path = %config.path.display(), "opened store");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(timeout)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        let tx = write_tx(conn)?;
        legacy::upgrade(&tx)?;
        tx.execute_batch(INDEXES)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────
//
// These take a plain `&Connection` so they run equally inside or outside a
// transaction.

/// Begins with the write lock held, so a locked file is waited on for the
/// busy timeout rather than failing on the first write after a read.
fn write_tx(
  conn: &mut rusqlite::Connection,
) -> rusqlite::Result<rusqlite::Transaction<'_>> {
  conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

pub(crate) fn all_groups(
  conn: &rusqlite::Connection,
) -> rusqlite::Result<Vec<Group>> {
  let mut stmt = conn.prepare("SELECT id, name FROM groups ORDER BY name, id")?;
  let rows = stmt
    .query_map([], |row| {
      Ok(Group { id: GroupId(row.get(0)?), name: row.get(1)? })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Map each requested name to the id of the group it names, ignoring case.
/// The inner `Err` carries the first name with no matching group.
fn resolve_groups(
  conn: &rusqlite::Connection,
  names: &[String],
) -> rusqlite::Result<std::result::Result<Vec<GroupId>, CoreError>> {
  let groups = all_groups(conn)?;
  let mut ids = Vec::with_capacity(names.len());
  for name in names {
    match groups.iter().find(|g| same_group_name(&g.name, name)) {
      Some(g) if !ids.contains(&g.id) => ids.push(g.id),
      Some(_) => {}
      None => return Ok(Err(CoreError::UnknownGroup(name.clone()))),
    }
  }
  Ok(Ok(ids))
}

fn replace_memberships(
  conn: &rusqlite::Connection,
  person_id: i64,
  group_ids: &[GroupId],
) -> rusqlite::Result<()> {
  conn.execute(
    "DELETE FROM memberships WHERE person_id = ?1",
    params![person_id],
  )?;
  let mut stmt = conn
    .prepare("INSERT INTO memberships (person_id, group_id) VALUES (?1, ?2)")?;
  for group_id in group_ids {
    stmt.execute(params![person_id, group_id.0])?;
  }
  Ok(())
}

/// Group names per person, each list ordered by name. Memberships whose group
/// row is missing are never reported.
fn memberships_by_person(
  conn: &rusqlite::Connection,
  person_id: Option<i64>,
) -> rusqlite::Result<HashMap<i64, Vec<String>>> {
  let mut stmt = conn.prepare(
    "SELECT m.person_id, g.name
     FROM memberships m
     JOIN groups g ON g.id = m.group_id
     WHERE (?1 IS NULL OR m.person_id = ?1)
     ORDER BY g.name, g.id",
  )?;
  let mut map: HashMap<i64, Vec<String>> = HashMap::new();
  let rows = stmt.query_map(params![person_id], |row| {
    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
  })?;
  for row in rows {
    let (person, group) = row?;
    map.entry(person).or_default().push(group);
  }
  Ok(map)
}

fn load_people(
  conn: &rusqlite::Connection,
  person_id: Option<i64>,
) -> rusqlite::Result<Vec<Person>> {
  let mut stmt = conn.prepare(
    "SELECT id, name, notes FROM people
     WHERE (?1 IS NULL OR id = ?1)
     ORDER BY name, id",
  )?;
  let raws = stmt
    .query_map(params![person_id], RawPerson::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut groups = memberships_by_person(conn, person_id)?;
  Ok(
    raws
      .into_iter()
      .map(|raw| {
        let names = groups.remove(&raw.id).unwrap_or_default();
        raw.into_person(names)
      })
      .collect(),
  )
}

/// Note contents per person, newest first.
fn note_texts_by_person(
  conn: &rusqlite::Connection,
) -> rusqlite::Result<HashMap<i64, Vec<String>>> {
  let mut stmt = conn.prepare(
    "SELECT person_id, content FROM notes
     WHERE person_id IS NOT NULL
     ORDER BY person_id, julianday(created_at) DESC, id DESC",
  )?;
  let mut map: HashMap<i64, Vec<String>> = HashMap::new();
  let rows = stmt.query_map([], |row| {
    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
  })?;
  for row in rows {
    let (person, content) = row?;
    map.entry(person).or_default().push(content);
  }
  Ok(map)
}

fn aggregate_notes(person: &Person, mut texts: Vec<String>) -> String {
  if let Some(legacy) = &person.notes {
    texts.push(legacy.clone());
  }
  texts.join(" ")
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  // ── Storage engine ────────────────────────────────────────────────────────

  async fn setup(&self) -> Result<()> { self.init_schema().await }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn list_groups(&self) -> Result<Vec<Group>> {
    let groups = self.conn.call(|conn| Ok(all_groups(conn)?)).await?;
    Ok(groups)
  }

  async fn add_group(&self, name: String) -> Result<GroupId> {
    let name = normalize_group_name(&name)?;

    let id = self
      .conn
      .call(move |conn| {
        let tx = write_tx(conn)?;
        if all_groups(&tx)?.iter().any(|g| same_group_name(&g.name, &name)) {
          return Ok(Err(CoreError::GroupNameTaken(name)));
        }
        tx.execute("INSERT INTO groups (name) VALUES (?1)", params![name])?;
        let id = GroupId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Ok(id))
      })
      .await??;

    tracing::debug!(%id, "added group");
    Ok(id)
  }

  async fn rename_group(&self, old_name: String, new_name: String) -> Result<u64> {
    let new_name = normalize_group_name(&new_name)?;

    let (id, members) = self
      .conn
      .call(move |conn| {
        let tx = write_tx(conn)?;
        let groups = all_groups(&tx)?;

        let Some(target) = groups.iter().find(|g| same_group_name(&g.name, &old_name))
        else {
          return Ok(Err(CoreError::GroupNotFound(old_name)));
        };
        if groups
          .iter()
          .any(|g| g.id != target.id && same_group_name(&g.name, &new_name))
        {
          return Ok(Err(CoreError::GroupNameTaken(new_name)));
        }

        tx.execute(
          "UPDATE groups SET name = ?1 WHERE id = ?2",
          params![new_name, target.id.0],
        )?;
        let members: i64 = tx.query_row(
          "SELECT COUNT(*) FROM memberships m
           JOIN people p ON p.id = m.person_id
           WHERE m.group_id = ?1",
          params![target.id.0],
          |row| row.get(0),
        )?;
        let id = target.id;
        tx.commit()?;
        Ok(Ok((id, members as u64)))
      })
      .await??;

    tracing::info!(%id, members, "renamed group");
    Ok(members)
  }

  async fn delete_group(&self, id: GroupId, name: String) -> Result<u64> {
    let members = self
      .conn
      .call(move |conn| {
        let tx = write_tx(conn)?;
        let current: Option<String> = tx
          .query_row(
            "SELECT name FROM groups WHERE id = ?1",
            params![id.0],
            |row| row.get(0),
          )
          .optional()?;

        match current {
          None => return Ok(Err(CoreError::GroupIdNotFound(id))),
          Some(current) if !same_group_name(&current, &name) => {
            return Ok(Err(CoreError::StaleGroup { id, name }));
          }
          Some(_) => {}
        }

        let members = tx.execute(
          "DELETE FROM memberships WHERE group_id = ?1",
          params![id.0],
        )?;
        tx.execute("DELETE FROM groups WHERE id = ?1", params![id.0])?;
        tx.commit()?;
        Ok(Ok(affected(members)))
      })
      .await??;

    tracing::info!(%id, members, "deleted group");
    Ok(members)
  }

  async fn clean_orphaned_memberships(&self) -> Result<u64> {
    let removed = self
      .conn
      .call(|conn| {
        let removed = conn.execute(
          "DELETE FROM memberships
           WHERE group_id  NOT IN (SELECT id FROM groups)
              OR person_id NOT IN (SELECT id FROM people)",
          [],
        )?;
        Ok(affected(removed))
      })
      .await?;

    if removed > 0 {
      tracing::info!(removed, "removed orphaned memberships");
    } else {
      tracing::debug!("no orphaned memberships");
    }
    Ok(removed)
  }

  // ── People ────────────────────────────────────────────────────────────────

  async fn list_people(&self) -> Result<Vec<Person>> {
    let people = self.conn.call(|conn| Ok(load_people(conn, None)?)).await?;
    Ok(people)
  }

  async fn list_people_with_notes(&self) -> Result<Vec<PersonEntry>> {
    let entries = self
      .conn
      .call(|conn| {
        let people = load_people(conn, None)?;
        let mut notes = note_texts_by_person(conn)?;
        let entries = people
          .into_iter()
          .map(|person| {
            let texts = notes.remove(&person.id.0).unwrap_or_default();
            PersonEntry { all_notes: aggregate_notes(&person, texts), person }
          })
          .collect::<Vec<_>>();
        Ok(entries)
      })
      .await?;
    Ok(entries)
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let mut people = self
      .conn
      .call(move |conn| Ok(load_people(conn, Some(id.0))?))
      .await?;
    Ok(people.pop())
  }

  async fn search_people(&self, filter: &PersonFilter) -> Result<Vec<PersonEntry>> {
    let entries = self.list_people_with_notes().await?;
    Ok(filter.apply(entries))
  }

  async fn add_person(&self, input: PersonInput) -> Result<PersonId> {
    let id = self
      .conn
      .call(move |conn| {
        let tx = write_tx(conn)?;
        let group_ids = match resolve_groups(&tx, &input.groups)? {
          Ok(ids) => ids,
          Err(e) => return Ok(Err(e)),
        };
        tx.execute(
          "INSERT INTO people (name) VALUES (?1)",
          params![input.name.trim()],
        )?;
        let id = tx.last_insert_rowid();
        replace_memberships(&tx, id, &group_ids)?;
        tx.commit()?;
        Ok(Ok(PersonId(id)))
      })
      .await??;

    tracing::debug!(%id, "added person");
    Ok(id)
  }

  async fn update_person(&self, id: PersonId, input: PersonInput) -> Result<u64> {
    let rows = self
      .conn
      .call(move |conn| {
        let tx = write_tx(conn)?;
        let group_ids = match resolve_groups(&tx, &input.groups)? {
          Ok(ids) => ids,
          Err(e) => return Ok(Err(e)),
        };
        let rows = tx.execute(
          "UPDATE people SET name = ?1 WHERE id = ?2",
          params![input.name.trim(), id.0],
        )?;
        if rows == 0 {
          return Ok(Ok(0));
        }
        replace_memberships(&tx, id.0, &group_ids)?;
        tx.commit()?;
        Ok(Ok(affected(rows)))
      })
      .await??;

    tracing::debug!(%id, rows, "updated person");
    Ok(rows)
  }

  async fn delete_person(&self, id: PersonId) -> Result<u64> {
    let (rows, notes) = self
      .conn
      .call(move |conn| {
        let tx = write_tx(conn)?;
        let notes =
          tx.execute("DELETE FROM notes WHERE person_id = ?1", params![id.0])?;
        tx.execute(
          "DELETE FROM memberships WHERE person_id = ?1",
          params![id.0],
        )?;
        let rows = tx.execute("DELETE FROM people WHERE id = ?1", params![id.0])?;
        tx.commit()?;
        Ok((affected(rows), affected(notes)))
      })
      .await?;

    tracing::debug!(%id, rows, notes, "deleted person");
    Ok(rows)
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn add_note(&self, person_id: PersonId, content: String) -> Result<NoteId> {
    let id = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM people WHERE id = ?1",
            params![person_id.0],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(Err(CoreError::PersonNotFound(person_id)));
        }
        conn.execute(
          "INSERT INTO notes (person_id, content) VALUES (?1, ?2)",
          params![person_id.0, content],
        )?;
        Ok(Ok(NoteId(conn.last_insert_rowid())))
      })
      .await??;
    Ok(id)
  }

  async fn list_notes_by_person(&self, person_id: PersonId) -> Result<Vec<Note>> {
    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, person_id, content, created_at FROM notes
           WHERE person_id = ?1
           ORDER BY julianday(created_at) DESC, id DESC",
        )?;
        let rows = stmt
          .query_map(params![person_id.0], RawNote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  async fn latest_note(&self, person_id: PersonId) -> Result<Option<Note>> {
    let raw: Option<RawNote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, person_id, content, created_at FROM notes
               WHERE person_id = ?1
               ORDER BY julianday(created_at) DESC, id DESC
               LIMIT 1",
              params![person_id.0],
              RawNote::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawNote::into_note).transpose()
  }
}
