//! Handlers for catalog endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/gyms` | Ordered by city, street, building |
//! | `POST` | `/gyms` | Body: [`GymInput`]; returns 201 |
//! | `GET`  | `/gyms/{id}` | 404 if not found |
//! | `PUT`  | `/gyms/{id}` | Body: [`GymInput`] |
//! | `DELETE` | `/gyms/{id}` | 409 while memberships or groups use it |
//! | `GET`  | `/membership-types` | Ordered by title |
//! | `POST` | `/membership-types` | Body: [`MembershipTypeBody`]; returns 201 |
//! | `GET`  | `/membership-types/{id}` | 404 if not found |
//! | `PUT`  | `/membership-types/{id}` | Body: [`MembershipTypeBody`] |
//! | `DELETE` | `/membership-types/{id}` | 409 while memberships use it |
//! | `GET`  | `/trainers` | |
//! | `POST` | `/trainers` | Body: [`TrainerInput`]; 409 if the contact exists |
//! | `GET`  | `/trainers/{id}` | |
//! | `PUT`  | `/trainers/{id}` | 409 if the contact belongs to someone else |
//! | `DELETE` | `/trainers/{id}` | 409 while groups use the trainer |
//! | `GET`  | `/groups` | |
//! | `POST` | `/groups` | Body: [`GroupInput`]; trainer and gym must exist |
//! | `GET`  | `/groups/{id}` | |
//! | `PUT`  | `/groups/{id}` | 409 if capacity drops below registrations |
//! | `DELETE` | `/groups/{id}` | 409 while clients are registered |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gym_core::{
  catalog::{
    Group, GroupInput, Gym, GymInput, MembershipType, MembershipTypeInput, Trainer,
    TrainerInput,
  },
  store::GymStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Gyms ─────────────────────────────────────────────────────────────────────

/// `GET /gyms`
pub async fn list_gyms<S: GymStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Gym>>, ApiError> {
  let gyms = store.list_gyms().await.map_err(ApiError::store)?;
  Ok(Json(gyms))
}

/// `GET /gyms/{id}`
pub async fn get_gym<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Gym>, ApiError> {
  let gym = store
    .get_gym(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("gym {id} not found")))?;
  Ok(Json(gym))
}

/// `POST /gyms`
pub async fn create_gym<S: GymStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<GymInput>,
) -> Result<impl IntoResponse, ApiError> {
  let gym = store.create_gym(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(gym)))
}

/// `PUT /gyms/{id}`
pub async fn update_gym<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<GymInput>,
) -> Result<Json<Gym>, ApiError> {
  let gym = store.update_gym(id, body).await.map_err(ApiError::store)?;
  Ok(Json(gym))
}

/// `DELETE /gyms/{id}`
pub async fn delete_gym<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store.delete_gym(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Membership types ─────────────────────────────────────────────────────────

/// Prices arrive as text in major units, e.g. `"500"` or `"1,299.50 Kč"`.
#[derive(Debug, Deserialize)]
pub struct MembershipTypeBody {
  pub title:         String,
  pub price:         String,
  pub currency:      String,
  pub duration_days: i64,
  #[serde(default)]
  pub description:   String,
}

impl MembershipTypeBody {
  fn into_input(self) -> gym_core::Result<MembershipTypeInput> {
    MembershipTypeInput::from_form(
      self.title,
      &self.price,
      &self.currency,
      self.duration_days,
      self.description,
    )
  }
}

/// `GET /membership-types`
pub async fn list_membership_types<S: GymStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<MembershipType>>, ApiError> {
  let types = store
    .list_membership_types()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(types))
}

/// `GET /membership-types/{id}`
pub async fn get_membership_type<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<MembershipType>, ApiError> {
  let membership_type = store
    .get_membership_type(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("membership type {id} not found")))?;
  Ok(Json(membership_type))
}

/// `POST /membership-types`
pub async fn create_membership_type<S: GymStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<MembershipTypeBody>,
) -> Result<impl IntoResponse, ApiError> {
  let membership_type = store
    .create_membership_type(body.into_input()?)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(membership_type)))
}

/// `PUT /membership-types/{id}`
pub async fn update_membership_type<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<MembershipTypeBody>,
) -> Result<Json<MembershipType>, ApiError> {
  let membership_type = store
    .update_membership_type(id, body.into_input()?)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(membership_type))
}

/// `DELETE /membership-types/{id}`
pub async fn delete_membership_type<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store
    .delete_membership_type(id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Trainers ─────────────────────────────────────────────────────────────────

/// `GET /trainers`
pub async fn list_trainers<S: GymStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Trainer>>, ApiError> {
  let trainers = store.list_trainers().await.map_err(ApiError::store)?;
  Ok(Json(trainers))
}

/// `GET /trainers/{id}`
pub async fn get_trainer<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Trainer>, ApiError> {
  let trainer = store
    .get_trainer(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("trainer {id} not found")))?;
  Ok(Json(trainer))
}

/// `POST /trainers`
pub async fn create_trainer<S: GymStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<TrainerInput>,
) -> Result<impl IntoResponse, ApiError> {
  let trainer = store.create_trainer(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(trainer)))
}

/// `PUT /trainers/{id}`
pub async fn update_trainer<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<TrainerInput>,
) -> Result<Json<Trainer>, ApiError> {
  let trainer = store
    .update_trainer(id, body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(trainer))
}

/// `DELETE /trainers/{id}`
pub async fn delete_trainer<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store.delete_trainer(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Groups ───────────────────────────────────────────────────────────────────

/// `GET /groups`
pub async fn list_groups<S: GymStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Group>>, ApiError> {
  let groups = store.list_groups().await.map_err(ApiError::store)?;
  Ok(Json(groups))
}

/// `GET /groups/{id}`
pub async fn get_group<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Group>, ApiError> {
  let group = store
    .get_group(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("group {id} not found")))?;
  Ok(Json(group))
}

/// `POST /groups`
pub async fn create_group<S: GymStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<GroupInput>,
) -> Result<impl IntoResponse, ApiError> {
  let group = store.create_group(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(group)))
}

/// `PUT /groups/{id}`
pub async fn update_group<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<GroupInput>,
) -> Result<Json<Group>, ApiError> {
  let group = store.update_group(id, body).await.map_err(ApiError::store)?;
  Ok(Json(group))
}

/// `DELETE /groups/{id}`
pub async fn delete_group<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store.delete_group(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
