//! Person: a contact record with a name, group memberships and notes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::membership::{join_csv, parse_csv};

/// Store-generated identifier of a person row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:     PersonId,
  /// May be empty for a person created ahead of the first save.
  pub name:   String,
  /// Names of the groups this person belongs to, ordered by name.
  pub groups: Vec<String>,
  /// Inline note column written by earlier versions of the app. Superseded by
  /// [`crate::note::Note`]; read and searched, never written.
  pub notes:  Option<String>,
}

impl Person {
  /// The memberships in their comma-joined contract form.
  pub fn groups_csv(&self) -> String { join_csv(&self.groups) }
}

/// A person together with the text of all of their notes.
///
/// `all_notes` is derived on read for search matching and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonEntry {
  #[serde(flatten)]
  pub person:    Person,
  pub all_notes: String,
}

/// Input to [`crate::store::ContactStore::add_person`] and
/// [`crate::store::ContactStore::update_person`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonInput {
  pub name:   String,
  pub groups: Vec<String>,
}

impl PersonInput {
  /// Build an input from a name and a comma-joined membership list.
  pub fn new(name: impl Into<String>, groups_csv: &str) -> Self {
    Self { name: name.into(), groups: parse_csv(groups_csv) }
  }
}
