//! The `ContactStore` trait, the persistence contract the UI calls into.
//!
//! The trait is implemented by storage backends (e.g.
//! `rememberall-store-sqlite`). Higher layers (`rememberall-api`) depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  group::{Group, GroupId},
  note::{Note, NoteId},
  person::{Person, PersonEntry, PersonId, PersonInput},
  search::PersonFilter,
};

/// Abstraction over a RememberAll store backend.
///
/// Every operation runs in its own transaction and resolves to a `Result`;
/// an empty list always means "no data", never "the store failed".
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Storage engine ────────────────────────────────────────────────────

  /// Create any missing tables. Idempotent; existing rows are untouched.
  fn setup(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Groups ────────────────────────────────────────────────────────────

  /// All groups, sorted by name.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  /// Create a group. Fails if the name is blank, contains a comma, or is
  /// already used by another group (ignoring case).
  fn add_group(
    &self,
    name: String,
  ) -> impl Future<Output = Result<GroupId, Self::Error>> + Send + '_;

  /// Rename the group called `old_name`. Returns the number of people whose
  /// memberships now show `new_name`.
  fn rename_group(
    &self,
    old_name: String,
    new_name: String,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Delete a group and every membership in it. `name` must still be the
  /// group's current name. Returns the number of people who were members.
  fn delete_group(
    &self,
    id: GroupId,
    name: String,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Remove memberships whose group or person no longer exists. Returns the
  /// number of memberships removed.
  fn clean_orphaned_memberships(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── People ────────────────────────────────────────────────────────────

  /// All people, sorted by name.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// All people with their note content aggregated, sorted by name.
  fn list_people_with_notes(
    &self,
  ) -> impl Future<Output = Result<Vec<PersonEntry>, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// People matching `filter`, sorted by name.
  fn search_people<'a>(
    &'a self,
    filter: &'a PersonFilter,
  ) -> impl Future<Output = Result<Vec<PersonEntry>, Self::Error>> + Send + 'a;

  /// Create a person. Every group named in `input` must exist.
  fn add_person(
    &self,
    input: PersonInput,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + '_;

  /// Replace a person's name and memberships. Returns rows affected (0 if
  /// the person does not exist).
  fn update_person(
    &self,
    id: PersonId,
    input: PersonInput,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Delete a person along with their notes and memberships. Returns rows
  /// affected.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Notes ─────────────────────────────────────────────────────────────

  /// Append a note to a person. `created_at` is set by the store.
  fn add_note(
    &self,
    person_id: PersonId,
    content: String,
  ) -> impl Future<Output = Result<NoteId, Self::Error>> + Send + '_;

  /// A person's notes, newest first.
  fn list_notes_by_person(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  /// A person's newest note, if any.
  fn latest_note(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;
}
