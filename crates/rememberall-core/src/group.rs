//! Group: a named tag a person can belong to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-generated identifier of a group row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub id:   GroupId,
  pub name: String,
}

/// Validate a user-supplied group name and return its stored form.
///
/// Names are trimmed. Empty names are rejected, and so are names containing a
/// comma, since membership lists cross the API boundary comma-joined.
pub fn normalize_group_name(raw: &str) -> Result<String> {
  let name = raw.trim();
  if name.is_empty() {
    return Err(Error::EmptyGroupName);
  }
  if name.contains(',') {
    return Err(Error::InvalidGroupName(name.to_owned()));
  }
  Ok(name.to_owned())
}

/// Case-insensitive group-name equality, the single matching policy used for
/// lookups, uniqueness and filtering.
pub fn same_group_name(a: &str, b: &str) -> bool {
  a.trim().to_lowercase() == b.trim().to_lowercase()
}
