//! HTTP layer for the gym backend.
//!
//! Exposes an axum [`Router`] with the member and admin form flows, the
//! cookie session gate, and the JSON CRUD API from `gym-api` mounted under
//! `/api` behind the admin gate. Backed by any [`GymStore`].

pub mod auth;
pub mod credential;
pub mod error;
pub mod handlers;
pub mod seed;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  middleware::from_fn_with_state,
  routing::{get, post},
};
use gym_core::store::GymStore;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use credential::Credentials;
use handlers::{account, admin, member};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `GYM_*`
/// environment variables. Every field has a default.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Session cookie lifetime in seconds.
  pub session_max_age:     u64,
  /// Add `Secure` to the session cookie; enable behind TLS.
  pub cookie_secure:       bool,
  /// Create the admin account and default catalog on startup.
  pub seed:                bool,
  pub admin_email:         String,
  pub admin_phone:         String,
  /// PHC string from `server --hash-password`.
  pub admin_password_hash: Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_owned(),
      port:                8000,
      store_path:          PathBuf::from("gym.sqlite3"),
      session_max_age:     3600,
      cookie_secure:       false,
      seed:                true,
      admin_email:         "admin@gym.local".to_owned(),
      admin_phone:         "+420000000000".to_owned(),
      admin_password_hash: None,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: GymStore> {
  pub store:       Arc<S>,
  pub config:      Arc<ServerConfig>,
  pub credentials: Arc<Credentials>,
}

impl<S: GymStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Result<Self, Error> {
    Ok(Self {
      store:       Arc::new(store),
      config:      Arc::new(config),
      credentials: Arc::new(Credentials::new()?),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the gym server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: GymStore + Clone + 'static,
{
  let api = gym_api::api_router(state.store.clone())
    .layer(from_fn_with_state(state.clone(), auth::require_admin));

  Router::new()
    .route("/", get(health))
    // Account
    .route(
      "/auth/register",
      get(account::register_page).post(account::register::<S>),
    )
    .route("/auth/login", get(account::login_page).post(account::login::<S>))
    .route("/auth/logout", post(account::logout::<S>))
    // Member
    .route("/user/dashboard", get(member::dashboard::<S>))
    .route("/user/membership/buy", post(member::buy::<S>))
    .route("/user/membership/cancel", post(member::cancel::<S>))
    .route("/user/groups/register", post(member::enroll::<S>))
    // Admin
    .route("/admin/dashboard", get(admin::dashboard::<S>))
    .route("/admin/toggle-admin/{id}", post(admin::toggle_admin::<S>))
    .route("/admin/clients/{id}", get(admin::client_detail::<S>))
    .route("/admin/clients/{id}/discount", post(admin::set_discount::<S>))
    .route(
      "/admin/membership-types",
      get(admin::membership_types::<S>).post(admin::create_membership_type::<S>),
    )
    .route(
      "/admin/membership-types/{id}/edit",
      get(admin::membership_type::<S>).post(admin::update_membership_type::<S>),
    )
    .route(
      "/admin/membership-types/{id}/delete",
      post(admin::delete_membership_type::<S>),
    )
    .route("/admin/gyms", get(admin::gyms::<S>).post(admin::create_gym::<S>))
    .route(
      "/admin/gyms/{id}/edit",
      get(admin::gym::<S>).post(admin::update_gym::<S>),
    )
    .route("/admin/gyms/{id}/delete", post(admin::delete_gym::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
