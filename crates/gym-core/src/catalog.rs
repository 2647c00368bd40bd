//! Catalog reference data: gyms, membership types, trainers and class groups.
//!
//! Rows are created and edited by admins (or seeded at first start) and only
//! read by the membership and enrollment flows.

use chrono::{NaiveDate, NaiveTime, Timelike as _};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  client::{Contact, Sex},
  money::Money,
};

// ─── Gyms ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gym {
  pub id:       i64,
  pub country:  String,
  pub city:     String,
  pub postcode: String,
  pub street:   String,
  pub building: String,
}

/// Field values for creating or editing a gym.
#[derive(Debug, Clone, Deserialize)]
pub struct GymInput {
  pub country:  String,
  pub city:     String,
  pub postcode: String,
  pub street:   String,
  pub building: String,
}

// ─── Membership types ────────────────────────────────────────────────────────

/// A purchasable membership plan.
///
/// Duration is always a whole number of days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipType {
  pub id:            i64,
  pub title:         String,
  pub price:         Money,
  pub duration_days: u32,
  pub description:   String,
}

#[derive(Debug, Clone)]
pub struct MembershipTypeInput {
  pub title:         String,
  pub price:         Money,
  pub duration_days: u32,
  pub description:   String,
}

impl MembershipTypeInput {
  /// Build from loosely-typed form values (`price` may carry a currency
  /// symbol, `currency` is a code such as `CZK`).
  pub fn from_form(
    title: String,
    price: &str,
    currency: &str,
    duration_days: i64,
    description: String,
  ) -> Result<Self> {
    let currency = crate::money::Currency::parse(currency)?;
    let price = Money::parse(price, currency)?;
    let duration_days = u32::try_from(duration_days)
      .ok()
      .filter(|d| *d > 0)
      .ok_or(Error::InvalidDuration(duration_days))?;
    Ok(Self { title, price, duration_days, description })
  }
}

// ─── Trainers ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
  pub id:       i64,
  pub name:     String,
  pub surname:  String,
  pub birthday: NaiveDate,
  pub sex:      Sex,
  pub contact:  Contact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainerInput {
  pub name:     String,
  pub surname:  String,
  pub birthday: NaiveDate,
  pub sex:      Sex,
  pub contact:  Contact,
}

// ─── Groups ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
pub enum WeekDay {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl WeekDay {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownVariant {
      kind:  "week day",
      value: s.to_owned(),
    })
  }
}

/// A recurring class session led by one trainer in one gym.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
  pub id:           i64,
  pub trainer_id:   i64,
  pub gym_id:       i64,
  pub max_capacity: u32,
  pub week_day:     WeekDay,
  pub time_start:   NaiveTime,
  pub time_finish:  NaiveTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupInput {
  pub trainer_id:   i64,
  pub gym_id:       i64,
  pub max_capacity: i64,
  pub week_day:     WeekDay,
  pub time_start:   NaiveTime,
  pub time_finish:  NaiveTime,
}

impl GroupInput {
  /// Drop sub-second precision, then check the capacity and the time
  /// window; returns the capacity as stored.
  pub fn validate(&mut self) -> Result<u32> {
    self.time_start = whole_seconds(self.time_start);
    self.time_finish = whole_seconds(self.time_finish);
    if self.time_start >= self.time_finish {
      return Err(Error::InvalidSchedule);
    }
    u32::try_from(self.max_capacity)
      .ok()
      .filter(|c| *c > 0)
      .ok_or(Error::InvalidCapacity(self.max_capacity))
  }
}

/// Times are stored as `HH:MM:SS`.
fn whole_seconds(t: NaiveTime) -> NaiveTime { t.with_nanosecond(0).unwrap_or(t) }

#[cfg(test)]
mod tests {
  use super::*;
  use crate::money::Currency;

  #[test]
  fn membership_type_from_form() {
    let input = MembershipTypeInput::from_form(
      "Standard".into(),
      "500 Kč",
      "CZK",
      30,
      "desc".into(),
    )
    .unwrap();
    assert_eq!(input.price, Money::from_minor(50_000, Currency::Czk));
    assert_eq!(input.duration_days, 30);

    assert!(matches!(
      MembershipTypeInput::from_form("x".into(), "10", "CZK", 0, "d".into()),
      Err(Error::InvalidDuration(0))
    ));
    assert!(matches!(
      MembershipTypeInput::from_form("x".into(), "10", "USD", 30, "d".into()),
      Err(Error::UnknownVariant { .. })
    ));
  }

  #[test]
  fn group_validation() {
    let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
    let mut g = GroupInput {
      trainer_id:   1,
      gym_id:       1,
      max_capacity: 12,
      week_day:     WeekDay::Monday,
      time_start:   t(18),
      time_finish:  t(19),
    };
    assert_eq!(g.validate().unwrap(), 12);

    g.max_capacity = 0;
    assert!(matches!(g.validate(), Err(Error::InvalidCapacity(0))));

    g.max_capacity = 5;
    g.time_finish = t(17);
    assert!(matches!(g.validate(), Err(Error::InvalidSchedule)));
  }

  #[test]
  fn group_times_lose_fractional_seconds() {
    let t = |ms| NaiveTime::from_hms_milli_opt(10, 0, 0, ms).unwrap();
    let mut g = GroupInput {
      trainer_id:   1,
      gym_id:       1,
      max_capacity: 12,
      week_day:     WeekDay::Monday,
      time_start:   t(200),
      time_finish:  t(800),
    };
    assert!(matches!(g.validate(), Err(Error::InvalidSchedule)));

    g.time_finish = NaiveTime::from_hms_milli_opt(11, 30, 0, 500).unwrap();
    assert_eq!(g.validate().unwrap(), 12);
    assert_eq!(g.time_start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    assert_eq!(g.time_finish, NaiveTime::from_hms_opt(11, 30, 0).unwrap());
  }
}
