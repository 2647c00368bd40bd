//! Error types for `gym-core`.
//!
//! Every variant is a business-rule rejection: the operation was refused and
//! nothing was written. [`Error::reason`] gives the stable code the web layer
//! attaches to its redirects.

use thiserror::Error;

/// The kind of row an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Entity {
  Client,
  Gym,
  MembershipType,
  Membership,
  Payment,
  Trainer,
  Group,
  Registration,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} {1} not found")]
  NotFound(Entity, i64),

  #[error("client {0} already holds an active membership")]
  ActiveMembershipExists(i64),

  #[error("client {client_id} is already registered in group {group_id}")]
  AlreadyEnrolled { client_id: i64, group_id: i64 },

  #[error("group {0} is at full capacity")]
  CapacityFull(i64),

  #[error("an admin cannot change their own admin flag")]
  SelfDemotion,

  #[error("discount must be between 0 and 100, got {0}")]
  InvalidDiscount(f64),

  #[error("invalid signup: {0}")]
  Validation(#[from] ValidationError),

  #[error("phone number or email is already registered")]
  ContactExists,

  #[error("{0} {1} is still referenced and cannot be deleted")]
  InUse(Entity, i64),

  #[error("invalid money amount: {0:?}")]
  InvalidMoney(String),

  #[error("unknown {kind}: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },

  #[error("membership duration must be at least one day, got {0}")]
  InvalidDuration(i64),

  #[error("group capacity must be at least one, got {0}")]
  InvalidCapacity(i64),

  #[error("group must start before it finishes")]
  InvalidSchedule,

  #[error("group {group_id} has {enrolled} registrations, above capacity {capacity}")]
  CapacityBelowEnrolled {
    group_id: i64,
    capacity: u32,
    enrolled: u32,
  },
}

/// Broad class of a rejection; HTTP layers map it onto a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The referenced row does not exist.
  NotFound,
  /// The request is well-formed but collides with stored state.
  Conflict,
  /// The input itself is unacceptable.
  Invalid,
}

impl Error {
  /// Machine-readable code for this rejection, used as a redirect query flag
  /// (e.g. `?has_active=1`).
  pub fn reason(&self) -> &'static str {
    match self {
      Self::NotFound(..) => "not_found",
      Self::ActiveMembershipExists(_) => "has_active",
      Self::AlreadyEnrolled { .. } => "already_registered",
      Self::CapacityFull(_) => "group_full",
      Self::SelfDemotion => "self_demotion",
      Self::InvalidDiscount(_) => "discount_invalid",
      Self::Validation(v) => v.reason(),
      Self::ContactExists => "exists",
      Self::InUse(..) => "in_use",
      Self::InvalidMoney(_) => "price_invalid",
      Self::UnknownVariant { .. } => "invalid",
      Self::InvalidDuration(_) => "duration_invalid",
      Self::InvalidCapacity(_) => "capacity_invalid",
      Self::InvalidSchedule => "schedule_invalid",
      Self::CapacityBelowEnrolled { .. } => "capacity_invalid",
    }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound(..) => ErrorKind::NotFound,
      Self::ActiveMembershipExists(_)
      | Self::AlreadyEnrolled { .. }
      | Self::CapacityFull(_)
      | Self::ContactExists
      | Self::InUse(..)
      | Self::CapacityBelowEnrolled { .. } => ErrorKind::Conflict,
      Self::SelfDemotion
      | Self::InvalidDiscount(_)
      | Self::Validation(_)
      | Self::InvalidMoney(_)
      | Self::UnknownVariant { .. }
      | Self::InvalidDuration(_)
      | Self::InvalidCapacity(_)
      | Self::InvalidSchedule => ErrorKind::Invalid,
    }
  }
}

/// Field-level failures of the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("phone number must contain only digits after an optional '+'")]
  PhoneInvalid,
  #[error("phone number must have between 9 and 15 digits")]
  PhoneLength,
  #[error("birth date must be YYYY-MM-DD between 1900 and 2025")]
  DateInvalid,
  #[error("passwords do not match")]
  PasswordMismatch,
  #[error("sex must be one of male, female, other")]
  SexInvalid,
  #[error("name and surname must be 1 to 20 characters")]
  NameInvalid,
  #[error("email address is malformed")]
  EmailInvalid,
}

impl ValidationError {
  pub fn reason(&self) -> &'static str {
    match self {
      Self::PhoneInvalid => "phone_invalid",
      Self::PhoneLength => "phone_length",
      Self::DateInvalid => "date_invalid",
      Self::PasswordMismatch => "pwd_mismatch",
      Self::SexInvalid => "sex_invalid",
      Self::NameInvalid => "name_invalid",
      Self::EmailInvalid => "email_invalid",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds() {
    assert_eq!(Error::NotFound(Entity::Gym, 1).kind(), ErrorKind::NotFound);
    assert_eq!(Error::InUse(Entity::Group, 1).kind(), ErrorKind::Conflict);
    assert_eq!(Error::ContactExists.kind(), ErrorKind::Conflict);
    assert_eq!(Error::SelfDemotion.kind(), ErrorKind::Invalid);
    assert_eq!(
      Error::Validation(ValidationError::PhoneLength).kind(),
      ErrorKind::Invalid
    );
  }
}
