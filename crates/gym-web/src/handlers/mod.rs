//! Route handlers.
//!
//! Form posts answer with `303 See Other`. A business rejection becomes a
//! redirect carrying its reason code as a query flag (`?has_active=1`);
//! anything else is a hard [`Error`].

pub mod account;
pub mod admin;
pub mod member;

use std::collections::BTreeMap;

use axum::{
  Json,
  response::{IntoResponse, Redirect, Response},
};
use gym_core::store::StoreError;
use serde::Serialize;

use crate::error::Error;

pub(crate) fn redirect(location: &str) -> Response {
  Redirect::to(location).into_response()
}

/// Redirect to `path` with `reason` set as a flag.
pub(crate) fn redirect_reason(path: &str, reason: &str) -> Response {
  redirect(&format!("{path}?{reason}=1"))
}

/// Redirect back to `path` if `err` is a business rejection.
pub(crate) fn reject<E: StoreError>(err: E, path: &str) -> Result<Response, Error> {
  match err.domain() {
    Some(domain) => {
      tracing::info!(reason = domain.reason(), "{path}: {domain}");
      Ok(redirect_reason(path, domain.reason()))
    }
    None => Err(Error::store(err)),
  }
}

/// JSON stand-in for a form page: which page it is and the reason flags it
/// was redirected with.
#[derive(Serialize)]
pub struct Notice {
  pub page:    &'static str,
  pub reasons: Vec<String>,
}

impl Notice {
  pub fn new(page: &'static str, params: BTreeMap<String, String>) -> Json<Self> {
    let reasons = params
      .into_iter()
      .filter(|(_, v)| v == "1")
      .map(|(k, _)| k)
      .collect();
    Json(Self { page, reasons })
  }
}
