//! Cookie session extractors.
//!
//! The session is the `client_id` cookie set at login. [`CurrentClient`]
//! resolves it to a stored client; [`AdminClient`] additionally requires the
//! admin flag.

use axum::{
  extract::{FromRequestParts, Request},
  http::{HeaderMap, header, request::Parts},
  middleware::Next,
  response::Response,
};
use gym_core::{client::Client, store::GymStore};

use crate::{AppState, ServerConfig, error::Error};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "client_id";

/// The raw `client_id` cookie value, if the request carries one.
pub fn session_value(headers: &HeaderMap) -> Option<&str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .map(|(_, value)| value.trim())
}

/// Parse the session cookie into a client id.
pub fn session_id(headers: &HeaderMap) -> Result<i64, Error> {
  let value = session_value(headers).ok_or(Error::Unauthenticated)?;
  if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::Unauthenticated);
  }
  value.parse().map_err(|_| Error::Unauthenticated)
}

/// `Set-Cookie` value that starts a session for `client_id`.
pub fn session_cookie(client_id: i64, config: &ServerConfig) -> String {
  cookie(&client_id.to_string(), config.session_max_age, config.cookie_secure)
}

/// `Set-Cookie` value that ends the session.
pub fn cleared_cookie(config: &ServerConfig) -> String {
  cookie("", 0, config.cookie_secure)
}

fn cookie(value: &str, max_age: u64, secure: bool) -> String {
  let mut c =
    format!("{SESSION_COOKIE}={value}; HttpOnly; Path=/; Max-Age={max_age}; SameSite=Lax");
  if secure {
    c.push_str("; Secure");
  }
  c
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The logged-in client.
pub struct CurrentClient(pub Client);

impl<S> FromRequestParts<AppState<S>> for CurrentClient
where
  S: GymStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let id = session_id(&parts.headers)?;
    let client = state
      .store
      .get_client(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UnknownSession)?;
    Ok(CurrentClient(client))
  }
}

/// The logged-in client, known to be an admin.
pub struct AdminClient(pub Client);

impl<S> FromRequestParts<AppState<S>> for AdminClient
where
  S: GymStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let CurrentClient(client) = CurrentClient::from_request_parts(parts, state).await?;
    if !client.is_admin {
      tracing::warn!(client_id = client.id, "non-admin request to admin surface");
      return Err(Error::Forbidden);
    }
    Ok(AdminClient(client))
  }
}

/// Middleware gate for routers that carry no [`AppState`] of their own.
pub async fn require_admin(_admin: AdminClient, request: Request, next: Next) -> Response {
  next.run(request).await
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(cookies: &[&'static str]) -> HeaderMap {
    let mut h = HeaderMap::new();
    for &c in cookies {
      h.append(header::COOKIE, HeaderValue::from_static(c));
    }
    h
  }

  #[test]
  fn finds_cookie_among_others() {
    let h = headers(&["theme=dark; client_id=42; lang=cs"]);
    assert_eq!(session_id(&h).unwrap(), 42);

    let h = headers(&["theme=dark", "client_id=7"]);
    assert_eq!(session_id(&h).unwrap(), 7);
  }

  #[test]
  fn missing_or_malformed_cookie_is_unauthenticated() {
    let cases: [&[&'static str]; 5] = [
      &[],
      &["client_id="],
      &["client_id=abc"],
      &["client_id=-3"],
      &["xclient_id=1"],
    ];
    for cookies in cases {
      assert!(
        matches!(session_id(&headers(cookies)), Err(Error::Unauthenticated)),
        "{cookies:?}"
      );
    }
  }

  #[test]
  fn cookie_attributes() {
    let mut config = ServerConfig::default();
    assert_eq!(
      session_cookie(5, &config),
      "client_id=5; HttpOnly; Path=/; Max-Age=3600; SameSite=Lax"
    );
    config.cookie_secure = true;
    assert!(cleared_cookie(&config).starts_with("client_id=; HttpOnly; Path=/; Max-Age=0"));
    assert!(cleared_cookie(&config).ends_with("; Secure"));
  }
}
