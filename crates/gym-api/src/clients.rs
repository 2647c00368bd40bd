//! Handlers for `/clients` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/clients` | [`ClientQuery`] parameters; one page per request |
//! | `GET`  | `/clients/{id}` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use gym_core::{
  client::{Client, ClientQuery},
  store::GymStore,
};

use crate::error::ApiError;

/// `GET /clients[?name=..&surname=..&phone=..&email=..&admins_only=true&limit=..&offset=..]`
///
/// Unlike the admin dashboard, an unfiltered query returns the first page of
/// every client.
pub async fn list<S: GymStore>(
  State(store): State<Arc<S>>,
  Query(query): Query<ClientQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
  let clients = store
    .search_clients(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(clients))
}

/// `GET /clients/{id}`
pub async fn get_one<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Client>, ApiError> {
  let client = store
    .get_client(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("client {id} not found")))?;
  Ok(Json(client))
}
