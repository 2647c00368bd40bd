//! JSON CRUD API for the gym backend.
//!
//! Exposes an axum [`Router`] backed by any [`gym_core::store::GymStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility; the
//! server mounts this behind its admin gate.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", gym_api::api_router(store.clone()))
//! ```

pub mod catalog;
pub mod clients;
pub mod error;
pub mod ledger;
pub mod registrations;

use std::sync::Arc;

use axum::{Router, routing::get};
use gym_core::store::GymStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GymStore + 'static,
{
  Router::new()
    // Catalog
    .route("/gyms", get(catalog::list_gyms::<S>).post(catalog::create_gym::<S>))
    .route(
      "/gyms/{id}",
      get(catalog::get_gym::<S>)
        .put(catalog::update_gym::<S>)
        .delete(catalog::delete_gym::<S>),
    )
    .route(
      "/membership-types",
      get(catalog::list_membership_types::<S>).post(catalog::create_membership_type::<S>),
    )
    .route(
      "/membership-types/{id}",
      get(catalog::get_membership_type::<S>)
        .put(catalog::update_membership_type::<S>)
        .delete(catalog::delete_membership_type::<S>),
    )
    .route(
      "/trainers",
      get(catalog::list_trainers::<S>).post(catalog::create_trainer::<S>),
    )
    .route(
      "/trainers/{id}",
      get(catalog::get_trainer::<S>)
        .put(catalog::update_trainer::<S>)
        .delete(catalog::delete_trainer::<S>),
    )
    .route("/groups", get(catalog::list_groups::<S>).post(catalog::create_group::<S>))
    .route(
      "/groups/{id}",
      get(catalog::get_group::<S>)
        .put(catalog::update_group::<S>)
        .delete(catalog::delete_group::<S>),
    )
    // People and ledger
    .route("/clients", get(clients::list::<S>))
    .route("/clients/{id}", get(clients::get_one::<S>))
    .route("/memberships", get(ledger::list_memberships::<S>))
    .route("/memberships/{id}", get(ledger::get_membership::<S>))
    .route("/payments", get(ledger::list_payments::<S>))
    .route("/payments/{id}", get(ledger::get_payment::<S>))
    .route("/registrations", get(registrations::list::<S>))
    .route("/registrations/{id}", get(registrations::get_one::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use gym_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        req = req.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn gym_body() -> Value {
    json!({
      "country": "Czech Republic",
      "city": "Brno",
      "postcode": "60200",
      "street": "Ceska",
      "building": "1"
    })
  }

  #[tokio::test]
  async fn create_and_fetch_gym() {
    let app = app().await;
    let (status, created) = send(&app, "POST", "/gyms", Some(gym_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/gyms/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["street"], "Ceska");

    let (status, list) = send(&app, "GET", "/gyms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn missing_rows_are_json_404() {
    let app = app().await;
    for uri in ["/gyms/9", "/clients/9", "/memberships/9", "/payments/9", "/registrations/9"] {
      let (status, body) = send(&app, "GET", uri, None).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
      assert!(body["error"].is_string());
    }
  }

  #[tokio::test]
  async fn membership_type_price_is_parsed() {
    let app = app().await;
    let body = json!({
      "title": "Standard",
      "price": "1,299.50 Kč",
      "currency": "CZK",
      "duration_days": 30
    });
    let (status, created) = send(&app, "POST", "/membership-types", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"]["minor"], 129_950);

    let bad = json!({ "title": "x", "price": "free", "currency": "CZK", "duration_days": 30 });
    let (status, _) = send(&app, "POST", "/membership-types", Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn trainer_contact_conflict_and_group_rules() {
    let app = app().await;
    let trainer = json!({
      "name": "Petr",
      "surname": "Svoboda",
      "birthday": "1985-01-01",
      "sex": "M",
      "contact": { "phone_number": "+420777000111", "email": "petr@gym.example" }
    });
    let (status, created) = send(&app, "POST", "/trainers", Some(trainer.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let trainer_id = created["id"].as_i64().unwrap();

    let (status, _) = send(&app, "POST", "/trainers", Some(trainer)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, gym) = send(&app, "POST", "/gyms", Some(gym_body())).await;
    let group = |start: &str| {
      json!({
        "trainer_id": trainer_id,
        "gym_id": gym["id"],
        "max_capacity": 12,
        "week_day": "Thursday",
        "time_start": start,
        "time_finish": "19:00:00"
      })
    };
    let (status, _) = send(&app, "POST", "/groups", Some(group("18:00:00"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/groups", Some(group("20:00:00"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn catalog_rows_can_be_edited_and_deleted() {
    let app = app().await;
    let (_, gym) = send(&app, "POST", "/gyms", Some(gym_body())).await;
    let gym_id = gym["id"].as_i64().unwrap();

    let mut edited = gym_body();
    edited["street"] = json!("Kolejni");
    let (status, body) = send(&app, "PUT", &format!("/gyms/{gym_id}"), Some(edited.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["street"], "Kolejni");
    let (status, _) = send(&app, "PUT", "/gyms/99", Some(edited)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let trainer = json!({
      "name": "Petr",
      "surname": "Svoboda",
      "birthday": "1985-01-01",
      "sex": "M",
      "contact": { "phone_number": "+420777000111", "email": "petr@gym.example" }
    });
    let (_, created) = send(&app, "POST", "/trainers", Some(trainer)).await;
    let trainer_id = created["id"].as_i64().unwrap();

    let group = |capacity: i64| {
      json!({
        "trainer_id": trainer_id,
        "gym_id": gym_id,
        "max_capacity": capacity,
        "week_day": "Monday",
        "time_start": "08:00:00",
        "time_finish": "09:00:00"
      })
    };
    let (_, created) = send(&app, "POST", "/groups", Some(group(10))).await;
    let group_uri = format!("/groups/{}", created["id"]);
    let (status, body) = send(&app, "PUT", &group_uri, Some(group(6))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_capacity"], 6);

    let trainer_uri = format!("/trainers/{trainer_id}");
    let gym_uri = format!("/gyms/{gym_id}");
    for uri in [&trainer_uri, &gym_uri] {
      let (status, body) = send(&app, "DELETE", uri, None).await;
      assert_eq!(status, StatusCode::CONFLICT, "{uri}");
      assert!(body["error"].is_string());
    }
    for uri in [&group_uri, &trainer_uri, &gym_uri] {
      let (status, _) = send(&app, "DELETE", uri, None).await;
      assert_eq!(status, StatusCode::NO_CONTENT, "{uri}");
    }
    let (status, _) = send(&app, "GET", &gym_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let body = json!({ "title": "Basic", "price": "300", "currency": "CZK", "duration_days": 30 });
    let (_, created) = send(&app, "POST", "/membership-types", Some(body)).await;
    let type_uri = format!("/membership-types/{}", created["id"]);
    let body = json!({ "title": "Basic", "price": "350", "currency": "CZK", "duration_days": 30 });
    let (status, updated) = send(&app, "PUT", &type_uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"]["minor"], 35_000);
    let (status, _) = send(&app, "DELETE", &type_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }
}
