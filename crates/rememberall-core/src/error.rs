//! Error types for `rememberall-core`.

use thiserror::Error;

use crate::{group::GroupId, person::PersonId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("group name must not be empty")]
  EmptyGroupName,

  #[error("group name {0:?} must not contain a comma")]
  InvalidGroupName(String),

  #[error("group not found: {0:?}")]
  GroupNotFound(String),

  #[error("group not found: {0}")]
  GroupIdNotFound(GroupId),

  #[error("a group named {0:?} already exists")]
  GroupNameTaken(String),

  /// The caller named a group that no longer matches the row with that id.
  #[error("group {id} is not named {name:?}")]
  StaleGroup { id: GroupId, name: String },

  #[error("unknown group in membership list: {0:?}")]
  UnknownGroup(String),

  #[error("person not found: {0}")]
  PersonNotFound(PersonId),
}

impl Error {
  /// `true` for errors caused by a missing row.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::GroupNotFound(_) | Self::GroupIdNotFound(_) | Self::PersonNotFound(_)
    )
  }

  /// `true` for errors caused by the current state of the store rather than
  /// by malformed input.
  pub fn is_conflict(&self) -> bool {
    matches!(self, Self::GroupNameTaken(_) | Self::StaleGroup { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
