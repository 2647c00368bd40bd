//! Signup form validation.
//!
//! Field checks happen here; contact uniqueness is checked by the store when
//! the client is inserted.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::{
  ValidationError,
  client::{Contact, NewClient, Sex},
};

const MIN_BIRTH_YEAR: i32 = 1900;
const MAX_BIRTH_YEAR: i32 = 2025;
const MIN_PHONE_DIGITS: usize = 9;
const MAX_PHONE_DIGITS: usize = 15;
const MAX_NAME_CHARS: usize = 20;

/// Raw signup form fields as posted by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
  pub name:             String,
  pub surname:          String,
  pub birth_date:       String,
  pub sex:              String,
  pub phone_number:     String,
  pub email:            String,
  pub password:         Option<String>,
  pub password_confirm: Option<String>,
}

/// A signup that passed every field check.
#[derive(Debug, Clone)]
pub struct ValidSignup {
  pub client:   NewClient,
  pub password: Option<String>,
}

impl SignupForm {
  pub fn validate(self) -> Result<ValidSignup, ValidationError> {
    let phone_number = self.phone_number.trim().to_owned();
    let digits = phone_number.strip_prefix('+').unwrap_or(&phone_number);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
      return Err(ValidationError::PhoneInvalid);
    }
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
      return Err(ValidationError::PhoneLength);
    }

    let birthday = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d")
      .ok()
      .filter(|d| (MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&d.year()))
      .ok_or(ValidationError::DateInvalid)?;

    if self.password != self.password_confirm {
      return Err(ValidationError::PasswordMismatch);
    }

    let sex = Sex::from_form(&self.sex).ok_or(ValidationError::SexInvalid)?;

    let name = self.name.trim().to_owned();
    let surname = self.surname.trim().to_owned();
    let name_ok = |s: &str| !s.is_empty() && s.chars().count() <= MAX_NAME_CHARS;
    if !name_ok(&name) || !name_ok(&surname) {
      return Err(ValidationError::NameInvalid);
    }

    let email = self.email.trim().to_owned();
    match email.split_once('@') {
      Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
      _ => return Err(ValidationError::EmailInvalid),
    }

    Ok(ValidSignup {
      client:   NewClient {
        name,
        surname,
        birthday,
        sex,
        contact: Contact { phone_number, email },
        is_admin: false,
      },
      password: self.password,
    })
  }
}
