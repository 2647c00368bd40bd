//! Read-only handlers for memberships and payments.
//!
//! Purchases and cancellations happen through the member-facing forms; the
//! API only exposes the resulting ledger.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use gym_core::{
  membership::{Membership, MembershipFilter, Payment, PaymentFilter},
  store::GymStore,
};

use crate::error::ApiError;

/// `GET /memberships[?client_id=..&status=Active|Suspended|Cancelled]`
pub async fn list_memberships<S: GymStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<MembershipFilter>,
) -> Result<Json<Vec<Membership>>, ApiError> {
  let memberships = store
    .list_memberships(filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(memberships))
}

/// `GET /memberships/{id}`
pub async fn get_membership<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Membership>, ApiError> {
  let membership = store
    .get_membership(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("membership {id} not found")))?;
  Ok(Json(membership))
}

/// `GET /payments[?membership_id=..]`
pub async fn list_payments<S: GymStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<PaymentFilter>,
) -> Result<Json<Vec<Payment>>, ApiError> {
  let payments = store
    .list_payments(filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(payments))
}

/// `GET /payments/{id}`
pub async fn get_payment<S: GymStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Payment>, ApiError> {
  let payment = store
    .get_payment(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("payment {id} not found")))?;
  Ok(Json(payment))
}
