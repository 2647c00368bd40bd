//! Read-only handlers for `/registrations`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use gym_core::{
  enrollment::{Registration, RegistrationFilter},
  store::GymStore,
};

use crate::error::ApiError;

/// `GET /registrations[?group_id=..&client_id=..]`
pub async fn list<S: GymStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<RegistrationFilter>,
) -> Result<Json<Vec<Registration>>, ApiError> {
  let registrations = store
    .list_registrations(filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(registrations))
}

/// `GET /registrations/{id}`
pub async fn get_one<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Registration>, ApiError> {
  let registration = store
    .get_registration(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("registration {id} not found")))?;
  Ok(Json(registration))
}
