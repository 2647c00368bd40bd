//! Clients, the principals of the system, and the admin search query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, money::Discount};

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
pub enum Sex {
  M,
  F,
  O,
}

impl Sex {
  /// Map the signup form's wording (`male` / `female` / `other`).
  pub fn from_form(word: &str) -> Option<Self> {
    match word.trim() {
      "male" => Some(Self::M),
      "female" => Some(Self::F),
      "other" => Some(Self::O),
      _ => None,
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownVariant {
      kind:  "sex",
      value: s.to_owned(),
    })
  }
}

/// Phone and email; both are unique across the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub phone_number: String,
  pub email:        String,
}

/// A registered person. Admins are clients with `is_admin` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
  pub id:       i64,
  pub name:     String,
  pub surname:  String,
  pub birthday: NaiveDate,
  pub sex:      Sex,
  pub discount: Discount,
  pub is_admin: bool,
  pub contact:  Contact,
}

/// Input for [`GymStore::register_client`](crate::store::GymStore::register_client).
/// New clients always start with no discount.
#[derive(Debug, Clone)]
pub struct NewClient {
  pub name:     String,
  pub surname:  String,
  pub birthday: NaiveDate,
  pub sex:      Sex,
  pub contact:  Contact,
  pub is_admin: bool,
}

/// What the login flow needs to authenticate a client by email.
#[derive(Debug, Clone)]
pub struct LoginRecord {
  pub client:        Client,
  /// `None` when the client has no stored credential.
  pub password_hash: Option<String>,
}

/// Parameters for [`GymStore::search_clients`](crate::store::GymStore::search_clients).
///
/// Text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientQuery {
  pub name:        Option<String>,
  pub surname:     Option<String>,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  #[serde(default)]
  pub admins_only: bool,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

impl ClientQuery {
  pub const PAGE_SIZE: usize = 5;
  pub const MAX_LIMIT: usize = 100;

  /// `true` when no filter at all is set; the admin dashboard skips the
  /// search in that case.
  pub fn is_unfiltered(&self) -> bool {
    let blank = |f: &Option<String>| f.as_deref().is_none_or(|s| s.trim().is_empty());
    blank(&self.name)
      && blank(&self.surname)
      && blank(&self.phone)
      && blank(&self.email)
      && !self.admins_only
  }

  pub fn page_limit(&self) -> usize {
    self.limit.unwrap_or(Self::PAGE_SIZE).clamp(1, Self::MAX_LIMIT)
  }

  pub fn page_offset(&self) -> usize { self.offset.unwrap_or(0) }
}
