//! Signup, login and logout.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/auth/register` | Notice with the reason flags |
//! | `POST` | `/auth/register` | → `/auth/login`, or back with `?<reason>=1` |
//! | `GET`  | `/auth/login` | Notice; `?invalid=1` after a failed attempt |
//! | `POST` | `/auth/login` | Sets the session cookie |
//! | `POST` | `/auth/logout` | Clears the session cookie |

use std::collections::BTreeMap;

use axum::{
  Form, Json,
  extract::{Query, State},
  http::header,
  response::{IntoResponse, Response},
};
use gym_core::{client::Client, signup::SignupForm, store::GymStore};
use serde::Deserialize;

use super::{Notice, redirect, redirect_reason, reject};
use crate::{
  AppState,
  auth::{cleared_cookie, session_cookie},
  credential,
  error::Error,
};

const REGISTER: &str = "/auth/register";
const LOGIN: &str = "/auth/login";

/// `GET /auth/register`
pub async fn register_page(Query(params): Query<BTreeMap<String, String>>) -> Json<Notice> {
  Notice::new("register", params)
}

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<SignupForm>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  let signup = match form.validate() {
    Ok(s) => s,
    Err(e) => {
      tracing::info!(reason = e.reason(), "signup rejected");
      return Ok(redirect_reason(REGISTER, e.reason()));
    }
  };

  let password_hash = credential::hash(signup.password.as_deref())?;
  match state.store.register_client(signup.client, password_hash).await {
    Ok(client) => {
      tracing::info!(client_id = client.id, "client registered");
      Ok(redirect(LOGIN))
    }
    Err(e) => reject(e, REGISTER),
  }
}

/// `GET /auth/login`
pub async fn login_page(Query(params): Query<BTreeMap<String, String>>) -> Json<Notice> {
  Notice::new("login", params)
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  #[serde(default)]
  pub email:    String,
  pub password: Option<String>,
}

/// `POST /auth/login`
///
/// Every failure redirects to `/auth/login?invalid=1`, whatever its cause.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<LoginForm>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  let record = state
    .store
    .find_login(form.email.trim().to_owned())
    .await
    .map_err(Error::store)?;
  let password = form.password.as_deref();

  let client = match record {
    Some(record) => {
      let ok = match &record.password_hash {
        Some(stored) => credential::verify(password, stored),
        None => state.credentials.verify_dummy(password),
      };
      ok.then_some(record.client)
    }
    None => {
      state.credentials.verify_dummy(password);
      None
    }
  };

  let Some(client) = client else {
    tracing::info!("login rejected");
    return Ok(redirect_reason(LOGIN, "invalid"));
  };

  tracing::info!(client_id = client.id, admin = client.is_admin, "login");
  let cookie = session_cookie(client.id, &state.config);
  Ok(([(header::SET_COOKIE, cookie)], redirect(home(&client))).into_response())
}

/// `POST /auth/logout`
pub async fn logout<S>(State(state): State<AppState<S>>) -> Response
where
  S: GymStore + Clone + 'static,
{
  let cookie = cleared_cookie(&state.config);
  ([(header::SET_COOKIE, cookie)], redirect(LOGIN)).into_response()
}

/// Where a client lands after logging in.
pub fn home(client: &Client) -> &'static str {
  if client.is_admin {
    "/admin/dashboard"
  } else {
    "/user/dashboard"
  }
}
