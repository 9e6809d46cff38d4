//! Free-text and group filtering over people.

use crate::{membership::contains_group, person::PersonEntry};

/// Parameters for [`crate::store::ContactStore::search_people`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
  /// Case-insensitive substring matched against the name and all notes.
  /// Blank text matches everyone.
  pub text:  Option<String>,
  /// Restrict to members of this group (case-insensitive).
  pub group: Option<String>,
}

impl PersonFilter {
  pub fn text(text: impl Into<String>) -> Self {
    Self { text: Some(text.into()), group: None }
  }

  pub fn with_group(mut self, group: impl Into<String>) -> Self {
    self.group = Some(group.into());
    self
  }

  pub fn matches(&self, entry: &PersonEntry) -> bool {
    let in_group = match self.group.as_deref().map(str::trim) {
      Some(g) if !g.is_empty() => contains_group(&entry.person.groups, g),
      _ => true,
    };
    if !in_group {
      return false;
    }

    match self.text.as_deref().map(str::trim) {
      Some(t) if !t.is_empty() => {
        let needle = t.to_lowercase();
        entry.person.name.to_lowercase().contains(&needle)
          || entry.all_notes.to_lowercase().contains(&needle)
      }
      _ => true,
    }
  }

  /// Keep the matching entries, preserving their order.
  pub fn apply(&self, entries: Vec<PersonEntry>) -> Vec<PersonEntry> {
    entries.into_iter().filter(|e| self.matches(e)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::{Person, PersonId};

  fn entry(id: i64, name: &str, groups: &[&str], notes: &str) -> PersonEntry {
    PersonEntry {
      person:    Person {
        id:     PersonId(id),
        name:   name.into(),
        groups: groups.iter().map(|g| g.to_string()).collect(),
        notes:  None,
      },
      all_notes: notes.into(),
    }
  }

  fn people() -> Vec<PersonEntry> {
    vec![
      entry(1, "Alice", &["Family"], "loves cats"),
      entry(2, "Bob", &["Work", "Extended Family"], "plays guitar"),
    ]
  }

  fn names(entries: &[PersonEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.person.name.as_str()).collect()
  }

  #[test]
  fn text_matches_notes() {
    let hits = PersonFilter::text("cat").apply(people());
    assert_eq!(names(&hits), ["Alice"]);
  }

  #[test]
  fn text_matches_name_ignoring_case() {
    let hits = PersonFilter::text("BOB").apply(people());
    assert_eq!(names(&hits), ["Bob"]);
  }

  #[test]
  fn empty_filter_keeps_everyone_in_order() {
    let hits = PersonFilter::default().apply(people());
    assert_eq!(names(&hits), ["Alice", "Bob"]);

    let hits = PersonFilter::text("  ").apply(people());
    assert_eq!(hits.len(), 2);
  }

  #[test]
  fn group_filter_is_token_aware() {
    let hits = PersonFilter::default().with_group("family").apply(people());
    assert_eq!(names(&hits), ["Alice"]);
  }

  #[test]
  fn group_and_text_must_both_match() {
    let hits = PersonFilter::text("guitar").with_group("Family").apply(people());
    assert!(hits.is_empty());

    let hits = PersonFilter::text("guitar").with_group("work").apply(people());
    assert_eq!(names(&hits), ["Bob"]);
  }
}
