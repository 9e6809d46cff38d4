//! One-time upgrade of store files written by the earlier app.
//!
//! Those files kept each person's groups as a comma-joined `people.groups`
//! column and allowed group names that differ only in case. Both have to be
//! sorted out before [`crate::schema::INDEXES`] can add the unique name index.

use rememberall_core::{group::same_group_name, membership::parse_csv};
use rusqlite::{Connection, params};

use crate::store::all_groups;

/// What [`upgrade`] changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Upgrade {
  /// Groups folded into an earlier group of the same name.
  pub merged_groups: usize,
  /// Memberships created from `people.groups`.
  pub imported:      usize,
  /// Names in `people.groups` with no matching group.
  pub unresolved:    usize,
}

/// No-op once `user_version` is set, so memberships edited after the import
/// are never overwritten by the stale column.
pub fn upgrade(conn: &Connection) -> rusqlite::Result<Upgrade> {
  let version: i64 =
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
  if version >= 1 {
    return Ok(Upgrade::default());
  }

  let mut report = Upgrade {
    merged_groups: merge_case_duplicates(conn)?,
    ..Upgrade::default()
  };
  if has_column(conn, "people", "groups")? {
    let (imported, unresolved) = import_group_lists(conn)?;
    report.imported = imported;
    report.unresolved = unresolved;
  }

  if report != Upgrade::default() {
    tracing::info!(
      merged_groups = report.merged_groups,
      imported = report.imported,
      unresolved = report.unresolved,
      "upgraded legacy store file"
    );
  }
  Ok(report)
}

fn has_column(
  conn: &Connection,
  table: &str,
  column: &str,
) -> rusqlite::Result<bool> {
  conn
    .prepare("SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2")?
    .exists(params![table, column])
}

/// Keeps the oldest group of each case-insensitive name and moves the
/// memberships of the others onto it.
fn merge_case_duplicates(conn: &Connection) -> rusqlite::Result<usize> {
  let mut groups = all_groups(conn)?;
  groups.sort_by_key(|g| g.id);

  let mut kept: Vec<(i64, String)> = Vec::new();
  let mut merged = 0;
  for group in groups {
    let survivor = kept
      .iter()
      .find(|(_, name)| same_group_name(name, &group.name))
      .cloned();
    let Some((keep_id, keep_name)) = survivor else {
      kept.push((group.id.0, group.name));
      continue;
    };

    conn.execute(
      "INSERT OR IGNORE INTO memberships (person_id, group_id)
       SELECT person_id, ?1 FROM memberships WHERE group_id = ?2",
      params![keep_id, group.id.0],
    )?;
    conn.execute(
      "DELETE FROM memberships WHERE group_id = ?1",
      params![group.id.0],
    )?;
    conn.execute("DELETE FROM groups WHERE id = ?1", params![group.id.0])?;
    tracing::warn!(
      kept = %keep_name,
      dropped = %group.name,
      "merged duplicate group"
    );
    merged += 1;
  }
  Ok(merged)
}

/// Returns `(imported, unresolved)`.
fn import_group_lists(conn: &Connection) -> rusqlite::Result<(usize, usize)> {
  let groups = all_groups(conn)?;
  let lists = conn
    .prepare(r#"SELECT id, "groups" FROM people"#)?
    .query_map([], |row| {
      Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut insert = conn.prepare(
    "INSERT OR IGNORE INTO memberships (person_id, group_id) VALUES (?1, ?2)",
  )?;
  let (mut imported, mut unresolved) = (0, 0);
  for (person, csv) in lists {
    for name in parse_csv(csv.as_deref().unwrap_or_default()) {
      match groups.iter().find(|g| same_group_name(&g.name, &name)) {
        Some(group) => imported += insert.execute(params![person, group.id.0])?,
        None => {
          tracing::debug!(person, group = %name, "legacy group not found");
          unresolved += 1;
        }
      }
    }
  }
  Ok((imported, unresolved))
}
