//! Fixed-point money and personal discounts.
//!
//! Amounts are held as integer minor units (haléře, cents) tagged with a
//! closed [`Currency`]. Nothing in the system parses display strings except
//! [`Money::parse`], which accepts admin input such as `"1,200.50 Kč"`.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Currency ────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
  Czk,
  Eur,
}

impl Currency {
  /// Number of decimal places in one major unit.
  pub const fn minor_digits(self) -> u32 {
    match self {
      Self::Czk | Self::Eur => 2,
    }
  }

  const fn minor_per_major(self) -> i64 { 10_i64.pow(self.minor_digits()) }

  /// Parse a currency code, reporting failures as a core error.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s.trim()).map_err(|_| Error::UnknownVariant {
      kind:  "currency",
      value: s.to_owned(),
    })
  }
}

// ─── Money ───────────────────────────────────────────────────────────────────

/// Symbols and codes stripped from admin-entered prices before parsing.
const DECORATIONS: &[&str] = &["Kč", "CZK", "EUR", "€", "$", "£"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
  minor:    i64,
  currency: Currency,
}

impl Money {
  pub const fn from_minor(minor: i64, currency: Currency) -> Self {
    Self { minor, currency }
  }

  pub const fn minor(&self) -> i64 { self.minor }

  pub const fn currency(&self) -> Currency { self.currency }

  /// Parse a non-negative decimal amount.
  ///
  /// Currency symbols, whitespace and `,` thousands separators are removed
  /// first. At most [`Currency::minor_digits`] fractional digits are accepted.
  pub fn parse(raw: &str, currency: Currency) -> Result<Self> {
    let invalid = || Error::InvalidMoney(raw.to_owned());

    let mut cleaned = raw.to_owned();
    for deco in DECORATIONS {
      cleaned = cleaned.replace(deco, "");
    }
    cleaned.retain(|c| c != ',' && !c.is_whitespace());

    let (whole, frac) = match cleaned.split_once('.') {
      Some((w, f)) => (w, f),
      None => (cleaned.as_str(), ""),
    };

    let digits = currency.minor_digits() as usize;
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty())
      || !all_digits(whole)
      || !all_digits(frac)
      || frac.len() > digits
    {
      return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
      0
    } else {
      whole.parse().map_err(|_| invalid())?
    };
    let frac_padded = format!("{frac:0<digits$}");
    let frac: i64 = if digits == 0 {
      0
    } else {
      frac_padded.parse().map_err(|_| invalid())?
    };

    let minor = whole
      .checked_mul(currency.minor_per_major())
      .and_then(|m| m.checked_add(frac))
      .ok_or_else(invalid)?;

    Ok(Self { minor, currency })
  }

  /// The amount after applying `discount`, rounded half-to-even to the
  /// currency's minor unit.
  pub fn discounted(self, discount: Discount) -> Self {
    let scale = i128::from(Discount::SCALE);
    let keep = scale - i128::from(discount.basis_points());
    let minor = round_half_even(i128::from(self.minor) * keep, scale);
    Self {
      minor: minor as i64,
      currency: self.currency,
    }
  }
}

fn round_half_even(numerator: i128, denominator: i128) -> i128 {
  let q = numerator.div_euclid(denominator);
  let r = numerator.rem_euclid(denominator);
  match (2 * r).cmp(&denominator) {
    Ordering::Less => q,
    Ordering::Greater => q + 1,
    Ordering::Equal if q % 2 == 0 => q,
    Ordering::Equal => q + 1,
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let per = self.currency.minor_per_major();
    let sign = if self.minor < 0 { "-" } else { "" };
    let abs = self.minor.unsigned_abs();
    let digits = self.currency.minor_digits() as usize;
    write!(
      f,
      "{sign}{}.{:0digits$} {}",
      abs / per as u64,
      abs % per as u64,
      self.currency
    )
  }
}

// ─── Discount ────────────────────────────────────────────────────────────────

/// A personal discount between 0 % and 100 %, kept in basis points so that
/// fractional percentages such as 12.5 % survive storage exactly.
///
/// Serialised as a plain percentage number.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Discount(u16);

impl Discount {
  /// Basis points in 100 %.
  pub const SCALE: u16 = 10_000;

  pub const NONE: Self = Self(0);

  pub fn from_percent(percent: f64) -> Result<Self> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
      return Err(Error::InvalidDiscount(percent));
    }
    Ok(Self((percent * 100.0).round() as u16))
  }

  /// Rebuild from a stored basis-point value.
  pub fn from_basis_points(bp: i64) -> Result<Self> {
    u16::try_from(bp)
      .ok()
      .filter(|bp| *bp <= Self::SCALE)
      .map(Self)
      .ok_or(Error::InvalidDiscount(bp as f64 / 100.0))
  }

  pub const fn basis_points(self) -> u16 { self.0 }

  pub fn percent(self) -> f64 { f64::from(self.0) / 100.0 }
}

impl TryFrom<f64> for Discount {
  type Error = Error;

  fn try_from(percent: f64) -> Result<Self> { Self::from_percent(percent) }
}

impl From<Discount> for f64 {
  fn from(d: Discount) -> Self { d.percent() }
}

impl fmt::Display for Discount {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}%", self.percent())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn czk(minor: i64) -> Money { Money::from_minor(minor, Currency::Czk) }

  #[test]
  fn parse_plain_and_decorated_amounts() {
    assert_eq!(Money::parse("500", Currency::Czk).unwrap(), czk(50_000));
    assert_eq!(Money::parse("500.00 CZK", Currency::Czk).unwrap(), czk(50_000));
    assert_eq!(Money::parse("1,200.5 Kč", Currency::Czk).unwrap(), czk(120_050));
    assert_eq!(
      Money::parse("€ 19.99", Currency::Eur).unwrap(),
      Money::from_minor(1_999, Currency::Eur)
    );
    assert_eq!(Money::parse(".5", Currency::Czk).unwrap(), czk(50));
  }

  #[test]
  fn parse_rejects_garbage() {
    for raw in ["", "CZK", "abc", "1.234", "-5", "1.2.3", "12a"] {
      assert!(
        matches!(Money::parse(raw, Currency::Czk), Err(Error::InvalidMoney(_))),
        "{raw:?} should be rejected"
      );
    }
  }

  #[test]
  fn ten_percent_off_five_hundred() {
    let d = Discount::from_percent(10.0).unwrap();
    assert_eq!(czk(50_000).discounted(d), czk(45_000));
  }

  #[test]
  fn discount_rounds_half_to_even() {
    // 0.25 * 50% = 0.125 -> 0.12 ; 0.75 * 50% = 0.375 -> 0.38
    let half = Discount::from_percent(50.0).unwrap();
    assert_eq!(czk(25).discounted(half), czk(12));
    assert_eq!(czk(75).discounted(half), czk(38));
    // 3.33 * (1 - 0.333) = 2.22111 -> 2.22
    let third = Discount::from_percent(33.3).unwrap();
    assert_eq!(czk(333).discounted(third), czk(222));
  }

  #[test]
  fn full_and_zero_discount() {
    assert_eq!(czk(80_000).discounted(Discount::NONE), czk(80_000));
    let all = Discount::from_percent(100.0).unwrap();
    assert_eq!(czk(80_000).discounted(all), czk(0));
  }

  #[test]
  fn discount_range_is_enforced() {
    assert!(Discount::from_percent(-0.1).is_err());
    assert!(Discount::from_percent(100.01).is_err());
    assert!(Discount::from_percent(f64::NAN).is_err());
    assert_eq!(Discount::from_percent(12.5).unwrap().basis_points(), 1_250);
    assert!(Discount::from_basis_points(10_001).is_err());
  }

  #[test]
  fn discount_serialises_as_percent() {
    let d = Discount::from_percent(12.5).unwrap();
    assert_eq!(serde_json::to_string(&d).unwrap(), "12.5");
    let back: Discount = serde_json::from_str("40").unwrap();
    assert_eq!(back.basis_points(), 4_000);
    assert!(serde_json::from_str::<Discount>("140").is_err());
  }

  #[test]
  fn display_formats_minor_units() {
    assert_eq!(czk(45_000).to_string(), "450.00 CZK");
    assert_eq!(Money::from_minor(5, Currency::Eur).to_string(), "0.05 EUR");
  }

  #[test]
  fn currency_codes() {
    assert_eq!(Currency::parse("CZK").unwrap(), Currency::Czk);
    assert_eq!(Currency::Eur.as_ref(), "EUR");
    assert!(Currency::parse("USD").is_err());
  }
}
