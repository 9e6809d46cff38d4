//! The comma-joined membership list used at the contract boundary.
//!
//! Inside the store memberships are id-keyed rows; callers still exchange
//! them as `"Family,Work"` strings, so this module owns the one encoding.

use crate::group::same_group_name;

/// Split a comma-joined membership list into group names.
///
/// Tokens are trimmed, empty tokens dropped, and later case-insensitive
/// duplicates of an earlier token discarded. Input order is kept.
pub fn parse_csv(csv: &str) -> Vec<String> {
  let mut names: Vec<String> = Vec::new();
  for token in csv.split(',').map(str::trim).filter(|t| !t.is_empty()) {
    if !names.iter().any(|n| same_group_name(n, token)) {
      names.push(token.to_owned());
    }
  }
  names
}

/// Join group names back into the comma-joined form.
pub fn join_csv<S: AsRef<str>>(names: &[S]) -> String {
  names
    .iter()
    .map(|n| n.as_ref().trim())
    .filter(|n| !n.is_empty())
    .collect::<Vec<_>>()
    .join(",")
}

/// Whether `names` contains `group`, ignoring case.
pub fn contains_group<S: AsRef<str>>(names: &[S], group: &str) -> bool {
  names.iter().any(|n| same_group_name(n.as_ref(), group))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_trims_and_drops_empty_tokens() {
    assert_eq!(parse_csv(" Family , ,Work,"), vec!["Family", "Work"]);
  }

  #[test]
  fn parse_empty_string_is_empty_list() {
    assert!(parse_csv("").is_empty());
    assert!(parse_csv(" , ").is_empty());
  }

  #[test]
  fn parse_drops_case_insensitive_duplicates() {
    assert_eq!(parse_csv("Work,work,WORK,Family"), vec!["Work", "Family"]);
  }

  #[test]
  fn join_uses_bare_commas() {
    assert_eq!(join_csv(&["Family", " Work "]), "Family,Work");
    assert_eq!(join_csv::<&str>(&[]), "");
  }

  #[test]
  fn contains_is_token_aware() {
    let names = ["Extended Family", "Work"];
    assert!(!contains_group(&names, "Family"));
    assert!(contains_group(&names, "extended family"));
  }
}
