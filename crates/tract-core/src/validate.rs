//! Field-level checks shared by create and update validation.

use chrono::NaiveDate;

use crate::error::ValidationError;

pub const NAME_MIN_CHARS: usize = 1;
pub const NAME_MAX_CHARS: usize = 32;

/// Names are counted in characters, not bytes.
pub fn check_name(name: &str) -> Result<(), ValidationError> {
  let len = name.chars().count();
  if (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
    Ok(())
  } else {
    Err(ValidationError::NameLength)
  }
}

/// Reject an end date strictly earlier than the start date.
///
/// Only applies when both bounds are supplied. A partial update carrying a
/// single bound is not compared against the stored value here; the storage
/// constraint catches that case.
pub fn check_date_range(
  start: Option<NaiveDate>,
  end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
  match (start, end) {
    (Some(start), Some(end)) if end < start => {
      Err(ValidationError::EndBeforeStart)
    }
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn end_before_start_is_rejected() {
    assert_eq!(
      check_date_range(Some(ymd(2024, 1, 10)), Some(ymd(2024, 1, 1))),
      Err(ValidationError::EndBeforeStart)
    );
  }

  #[test]
  fn equal_and_later_ends_are_accepted() {
    let start = ymd(2024, 1, 10);
    assert_eq!(check_date_range(Some(start), Some(start)), Ok(()));
    assert_eq!(check_date_range(Some(start), Some(ymd(2025, 1, 1))), Ok(()));
  }

  #[test]
  fn single_bound_is_not_checked() {
    assert_eq!(check_date_range(Some(ymd(2030, 1, 1)), None), Ok(()));
    assert_eq!(check_date_range(None, Some(ymd(1990, 1, 1))), Ok(()));
    assert_eq!(check_date_range(None, None), Ok(()));
  }

  #[test]
  fn name_length_counts_characters() {
    assert_eq!(check_name("P"), Ok(()));
    assert_eq!(check_name(&"x".repeat(32)), Ok(()));
    assert_eq!(check_name(&"é".repeat(32)), Ok(()));
    assert_eq!(check_name(""), Err(ValidationError::NameLength));
    assert_eq!(check_name(&"x".repeat(33)), Err(ValidationError::NameLength));
  }
}
