//! Memberships, their payments, and purchase pricing.
//!
//! A client holds at most one [`MembershipStatus::Active`] membership. A
//! purchase writes the membership and its payment together; the storage
//! backend does that inside one transaction using the [`Quote`] computed
//! here.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  catalog::MembershipType,
  money::{Discount, Money},
};

// ─── Status ──────────────────────────────────────────────────────────────────

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
pub enum MembershipStatus {
  Active,
  Suspended,
  Cancelled,
}

impl MembershipStatus {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownVariant {
      kind:  "membership status",
      value: s.to_owned(),
    })
  }
}

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
pub enum PaymentStatus {
  Pending,
  Successful,
  Failed,
}

impl PaymentStatus {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownVariant {
      kind:  "payment status",
      value: s.to_owned(),
    })
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
  pub id:                 i64,
  pub client_id:          i64,
  pub membership_type_id: i64,
  pub gym_id:             i64,
  pub status:             MembershipStatus,
  pub start:              NaiveDate,
  pub stop:               NaiveDate,
}

impl Membership {
  pub fn is_active(&self) -> bool { self.status == MembershipStatus::Active }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
  pub id:            i64,
  pub membership_id: i64,
  pub status:        PaymentStatus,
  pub amount:        Money,
  pub created_at:    DateTime<Utc>,
  pub paid_at:       DateTime<Utc>,
  pub due_at:        DateTime<Utc>,
}

/// Input for [`GymStore::purchase`](crate::store::GymStore::purchase).
#[derive(Debug, Clone, Copy)]
pub struct PurchaseRequest {
  pub client_id:          i64,
  pub membership_type_id: i64,
  pub gym_id:             i64,
  /// The purchase instant; the membership starts on its calendar date.
  pub at:                 DateTime<Utc>,
}

/// The rows written by a successful purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
  pub membership: Membership,
  pub payment:    Payment,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MembershipFilter {
  pub client_id: Option<i64>,
  pub status:    Option<MembershipStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
  pub membership_id: Option<i64>,
}

// ─── Pricing ─────────────────────────────────────────────────────────────────

/// What a client pays for a membership type, and the period it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
  pub amount: Money,
  pub start:  NaiveDate,
  pub stop:   NaiveDate,
}

impl Quote {
  pub fn new(
    membership_type: &MembershipType,
    discount: Discount,
    at: DateTime<Utc>,
  ) -> Self {
    let start = at.date_naive();
    let stop = start
      .checked_add_days(Days::new(u64::from(membership_type.duration_days)))
      .unwrap_or(NaiveDate::MAX);
    Self {
      amount: membership_type.price.discounted(discount),
      start,
      stop,
    }
  }
}

// ─── History helpers ─────────────────────────────────────────────────────────

/// Number of memberships shown in dashboard histories.
pub const HISTORY_LEN: usize = 5;

/// The most recent `len` memberships by start date, oldest first.
pub fn recent_history(mut memberships: Vec<Membership>, len: usize) -> Vec<Membership> {
  memberships.sort_by_key(|m| (m.start, m.id));
  let skip = memberships.len().saturating_sub(len);
  memberships.split_off(skip)
}

/// The latest payment by payment time.
pub fn latest_payment(payments: &[Payment]) -> Option<&Payment> {
  payments.iter().max_by_key(|p| (p.paid_at, p.id))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::money::Currency;

  fn standard() -> MembershipType {
    MembershipType {
      id:            1,
      title:         "Standard 1 month".into(),
      price:         Money::from_minor(50_000, Currency::Czk),
      duration_days: 30,
      description:   String::new(),
    }
  }

  #[test]
  fn quote_applies_discount_and_duration() {
    let at = Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap();
    let q = Quote::new(&standard(), Discount::from_percent(10.0).unwrap(), at);
    assert_eq!(q.amount, Money::from_minor(45_000, Currency::Czk));
    assert_eq!(q.start, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    assert_eq!(q.stop, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
  }

  #[test]
  fn quote_without_discount_keeps_price() {
    let at = Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap();
    let q = Quote::new(&standard(), Discount::NONE, at);
    assert_eq!(q.amount.minor(), 50_000);
    assert_eq!(q.stop, NaiveDate::from_ymd_opt(2025, 1, 19).unwrap());
  }

  fn membership(id: i64, day: u32) -> Membership {
    Membership {
      id,
      client_id: 1,
      membership_type_id: 1,
      gym_id: 1,
      status: MembershipStatus::Cancelled,
      start: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
      stop: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
    }
  }

  #[test]
  fn history_keeps_latest_in_order() {
    let ms = (1..=7).rev().map(|d| membership(i64::from(d), d)).collect();
    let hist = recent_history(ms, HISTORY_LEN);
    let days: Vec<_> = hist.iter().map(|m| m.id).collect();
    assert_eq!(days, vec![3, 4, 5, 6, 7]);
  }

  #[test]
  fn status_text_round_trips_through_strum() {
    assert_eq!(MembershipStatus::Cancelled.as_ref(), "Cancelled");
    assert_eq!(MembershipStatus::parse("Active").unwrap(), MembershipStatus::Active);
    assert!(PaymentStatus::parse("Refunded").is_err());
  }
}
