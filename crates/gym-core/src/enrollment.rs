//! Class-group enrollment.
//!
//! A client holds at most one registration per group, and a group never has
//! more registrations than its `max_capacity`. [`check_seat`] is the rule;
//! the storage backend evaluates it and inserts inside one transaction.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, catalog::Group};

/// A client's reserved seat in a recurring class group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
  pub id:        i64,
  pub group_id:  i64,
  pub client_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationFilter {
  pub group_id:  Option<i64>,
  pub client_id: Option<i64>,
}

/// Decide whether `client_id` may take a seat in `group`.
///
/// `already_registered` and `taken` must be read in the same transaction as
/// the subsequent insert.
pub fn check_seat(
  group: &Group,
  client_id: i64,
  already_registered: bool,
  taken: u64,
) -> Result<()> {
  if already_registered {
    return Err(Error::AlreadyEnrolled {
      client_id,
      group_id: group.id,
    });
  }
  if taken >= u64::from(group.max_capacity) {
    return Err(Error::CapacityFull(group.id));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::NaiveTime;

  use super::*;
  use crate::catalog::WeekDay;

  fn group(max_capacity: u32) -> Group {
    Group {
      id: 7,
      trainer_id: 1,
      gym_id: 1,
      max_capacity,
      week_day: WeekDay::Wednesday,
      time_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
      time_finish: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    }
  }

  #[test]
  fn free_seat_is_granted() {
    assert!(check_seat(&group(2), 1, false, 1).is_ok());
  }

  #[test]
  fn full_group_is_rejected() {
    assert!(matches!(
      check_seat(&group(1), 1, false, 1),
      Err(Error::CapacityFull(7))
    ));
  }

  #[test]
  fn duplicate_wins_over_capacity() {
    let err = check_seat(&group(1), 3, true, 1).unwrap_err();
    assert!(matches!(err, Error::AlreadyEnrolled { client_id: 3, group_id: 7 }));
    assert_eq!(err.reason(), "already_registered");
  }
}
