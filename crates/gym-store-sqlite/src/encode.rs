//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are `YYYY-MM-DD`, times of day `HH:MM:SS`, timestamps RFC 3339.
//! Closed enums are stored by their `strum` names. Money is an integer minor
//! amount next to a currency code column.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use gym_core::{
  catalog::{Group, Gym, MembershipType, Trainer, WeekDay},
  client::{Client, Contact, Sex},
  enrollment::Registration,
  membership::{Membership, MembershipStatus, Payment, PaymentStatus},
  money::{Currency, Discount, Money},
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::decode("date", s))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S").map_err(|_| Error::decode("time", s))
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|_| Error::decode("timestamp", s))
}

/// Decode any `strum`-named enum column.
pub fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::decode(column, s))
}

pub fn decode_money(minor: i64, currency: &str) -> Result<Money> {
  let currency: Currency = decode_enum("currency", currency)?;
  Ok(Money::from_minor(minor, currency))
}

/// `%` and `_` are literal in user filters; pair with `ESCAPE '\'`.
pub fn like_pattern(needle: &str) -> String {
  let mut escaped = String::with_capacity(needle.len() + 2);
  escaped.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawClient::from_row`].
pub const CLIENT_COLUMNS: &str = "cl.id_client, cl.name, cl.surname, cl.birthday, cl.sex,
   cl.discount_bp, cl.is_admin, ct.phone_number, ct.email";

/// Raw values read from a `clients` row joined with its contact.
pub struct RawClient {
  pub id:           i64,
  pub name:         String,
  pub surname:      String,
  pub birthday:     String,
  pub sex:          String,
  pub discount_bp:  i64,
  pub is_admin:     bool,
  pub phone_number: String,
  pub email:        String,
}

impl RawClient {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      name:         row.get(1)?,
      surname:      row.get(2)?,
      birthday:     row.get(3)?,
      sex:          row.get(4)?,
      discount_bp:  row.get(5)?,
      is_admin:     row.get(6)?,
      phone_number: row.get(7)?,
      email:        row.get(8)?,
    })
  }

  pub fn into_client(self) -> Result<Client> {
    Ok(Client {
      id:       self.id,
      name:     self.name,
      surname:  self.surname,
      birthday: decode_date(&self.birthday)?,
      sex:      decode_enum::<Sex>("sex", &self.sex)?,
      discount: Discount::from_basis_points(self.discount_bp)
        .map_err(|_| Error::decode("discount_bp", self.discount_bp.to_string()))?,
      is_admin: self.is_admin,
      contact:  Contact {
        phone_number: self.phone_number,
        email:        self.email,
      },
    })
  }
}

pub const TRAINER_COLUMNS: &str = "t.id_trainer, t.name, t.surname, t.birthday, t.sex,
   ct.phone_number, ct.email";

pub struct RawTrainer {
  pub id:           i64,
  pub name:         String,
  pub surname:      String,
  pub birthday:     String,
  pub sex:          String,
  pub phone_number: String,
  pub email:        String,
}

impl RawTrainer {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      name:         row.get(1)?,
      surname:      row.get(2)?,
      birthday:     row.get(3)?,
      sex:          row.get(4)?,
      phone_number: row.get(5)?,
      email:        row.get(6)?,
    })
  }

  pub fn into_trainer(self) -> Result<Trainer> {
    Ok(Trainer {
      id:       self.id,
      name:     self.name,
      surname:  self.surname,
      birthday: decode_date(&self.birthday)?,
      sex:      decode_enum::<Sex>("sex", &self.sex)?,
      contact:  Contact {
        phone_number: self.phone_number,
        email:        self.email,
      },
    })
  }
}

pub const GYM_COLUMNS: &str = "id_gym, country, city, postcode, street, building";

/// Gyms contain no encoded columns and decode straight from the row.
pub fn gym_from_row(row: &Row<'_>) -> rusqlite::Result<Gym> {
  Ok(Gym {
    id:       row.get(0)?,
    country:  row.get(1)?,
    city:     row.get(2)?,
    postcode: row.get(3)?,
    street:   row.get(4)?,
    building: row.get(5)?,
  })
}

pub const MEMBERSHIP_TYPE_COLUMNS: &str =
  "id_membership_type, title, price_minor, currency, duration_days, description";

pub struct RawMembershipType {
  pub id:            i64,
  pub title:         String,
  pub price_minor:   i64,
  pub currency:      String,
  pub duration_days: i64,
  pub description:   String,
}

impl RawMembershipType {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      title:         row.get(1)?,
      price_minor:   row.get(2)?,
      currency:      row.get(3)?,
      duration_days: row.get(4)?,
      description:   row.get(5)?,
    })
  }

  pub fn into_membership_type(self) -> Result<MembershipType> {
    Ok(MembershipType {
      id:            self.id,
      title:         self.title,
      price:         decode_money(self.price_minor, &self.currency)?,
      duration_days: u32::try_from(self.duration_days)
        .map_err(|_| Error::decode("duration_days", self.duration_days.to_string()))?,
      description:   self.description,
    })
  }
}

pub const GROUP_COLUMNS: &str =
  "id_group, id_trainer, id_gym, max_capacity, week_day, time_start, time_finish";

pub struct RawGroup {
  pub id:           i64,
  pub trainer_id:   i64,
  pub gym_id:       i64,
  pub max_capacity: i64,
  pub week_day:     String,
  pub time_start:   String,
  pub time_finish:  String,
}

impl RawGroup {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      trainer_id:   row.get(1)?,
      gym_id:       row.get(2)?,
      max_capacity: row.get(3)?,
      week_day:     row.get(4)?,
      time_start:   row.get(5)?,
      time_finish:  row.get(6)?,
    })
  }

  pub fn into_group(self) -> Result<Group> {
    Ok(Group {
      id:           self.id,
      trainer_id:   self.trainer_id,
      gym_id:       self.gym_id,
      max_capacity: u32::try_from(self.max_capacity)
        .map_err(|_| Error::decode("max_capacity", self.max_capacity.to_string()))?,
      week_day:     decode_enum::<WeekDay>("week_day", &self.week_day)?,
      time_start:   decode_time(&self.time_start)?,
      time_finish:  decode_time(&self.time_finish)?,
    })
  }
}

pub const MEMBERSHIP_COLUMNS: &str = "id_membership, id_client, id_membership_type, id_gym,
   membership_status, membership_start, membership_stop";

pub struct RawMembership {
  pub id:                 i64,
  pub client_id:          i64,
  pub membership_type_id: i64,
  pub gym_id:             i64,
  pub status:             String,
  pub start:              String,
  pub stop:               String,
}

impl RawMembership {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      client_id:          row.get(1)?,
      membership_type_id: row.get(2)?,
      gym_id:             row.get(3)?,
      status:             row.get(4)?,
      start:              row.get(5)?,
      stop:               row.get(6)?,
    })
  }

  pub fn into_membership(self) -> Result<Membership> {
    Ok(Membership {
      id:                 self.id,
      client_id:          self.client_id,
      membership_type_id: self.membership_type_id,
      gym_id:             self.gym_id,
      status:             decode_enum::<MembershipStatus>("membership_status", &self.status)?,
      start:              decode_date(&self.start)?,
      stop:               decode_date(&self.stop)?,
    })
  }
}

pub const PAYMENT_COLUMNS: &str = "id_payment, id_membership, payment_status, amount_minor,
   currency, date_creation, date_payment, date_due_date";

pub struct RawPayment {
  pub id:            i64,
  pub membership_id: i64,
  pub status:        String,
  pub amount_minor:  i64,
  pub currency:      String,
  pub created_at:    String,
  pub paid_at:       String,
  pub due_at:        String,
}

impl RawPayment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      membership_id: row.get(1)?,
      status:        row.get(2)?,
      amount_minor:  row.get(3)?,
      currency:      row.get(4)?,
      created_at:    row.get(5)?,
      paid_at:       row.get(6)?,
      due_at:        row.get(7)?,
    })
  }

  pub fn into_payment(self) -> Result<Payment> {
    Ok(Payment {
      id:            self.id,
      membership_id: self.membership_id,
      status:        decode_enum::<PaymentStatus>("payment_status", &self.status)?,
      amount:        decode_money(self.amount_minor, &self.currency)?,
      created_at:    decode_dt(&self.created_at)?,
      paid_at:       decode_dt(&self.paid_at)?,
      due_at:        decode_dt(&self.due_at)?,
    })
  }
}

pub const REGISTRATION_COLUMNS: &str = "id_registered, id_group, id_client";

pub fn registration_from_row(row: &Row<'_>) -> rusqlite::Result<Registration> {
  Ok(Registration {
    id:        row.get(0)?,
    group_id:  row.get(1)?,
    client_id: row.get(2)?,
  })
}
