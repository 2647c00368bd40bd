//! Member dashboard and member actions.
//!
//! | Method | Path | Form fields |
//! |--------|------|-------------|
//! | `GET`  | `/user/dashboard` | |
//! | `POST` | `/user/membership/buy` | `membership_type_id`, `gym_id` |
//! | `POST` | `/user/membership/cancel` | `membership_id` |
//! | `POST` | `/user/groups/register` | `group_id` |

use axum::{
  Form, Json,
  extract::State,
  response::Response,
};
use chrono::Utc;
use gym_core::{
  catalog::{Group, Gym, MembershipType},
  client::Client,
  enrollment::{Registration, RegistrationFilter},
  membership::{HISTORY_LEN, Membership, MembershipFilter, PurchaseRequest, recent_history},
  store::GymStore,
};
use serde::{Deserialize, Serialize};

use super::{redirect, reject};
use crate::{AppState, auth::CurrentClient, error::Error};

const DASHBOARD: &str = "/user/dashboard";

#[derive(Serialize)]
pub struct Dashboard {
  pub client:            Client,
  pub active_membership: Option<Membership>,
  /// Latest memberships by start date, oldest first.
  pub history:           Vec<Membership>,
  pub registrations:     Vec<Registration>,
  pub membership_types:  Vec<MembershipType>,
  pub gyms:              Vec<Gym>,
  pub groups:            Vec<Group>,
}

/// `GET /user/dashboard`
pub async fn dashboard<S>(
  State(state): State<AppState<S>>,
  CurrentClient(client): CurrentClient,
) -> Result<Json<Dashboard>, Error>
where
  S: GymStore + Clone + 'static,
{
  let store = &state.store;
  let memberships = store
    .list_memberships(MembershipFilter {
      client_id: Some(client.id),
      ..Default::default()
    })
    .await
    .map_err(Error::store)?;
  let active_membership = memberships.iter().find(|m| m.is_active()).cloned();

  let registrations = store
    .list_registrations(RegistrationFilter {
      client_id: Some(client.id),
      ..Default::default()
    })
    .await
    .map_err(Error::store)?;

  Ok(Json(Dashboard {
    client,
    active_membership,
    history: recent_history(memberships, HISTORY_LEN),
    registrations,
    membership_types: store.list_membership_types().await.map_err(Error::store)?,
    gyms: store.list_gyms().await.map_err(Error::store)?,
    groups: store.list_groups().await.map_err(Error::store)?,
  }))
}

#[derive(Debug, Deserialize)]
pub struct BuyForm {
  pub membership_type_id: i64,
  pub gym_id:             i64,
}

/// `POST /user/membership/buy`
pub async fn buy<S>(
  State(state): State<AppState<S>>,
  CurrentClient(client): CurrentClient,
  Form(form): Form<BuyForm>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  let request = PurchaseRequest {
    client_id:          client.id,
    membership_type_id: form.membership_type_id,
    gym_id:             form.gym_id,
    at:                 Utc::now(),
  };
  match state.store.purchase(request).await {
    Ok(purchase) => {
      tracing::info!(
        client_id = client.id,
        membership_id = purchase.membership.id,
        amount = %purchase.payment.amount,
        "membership purchased"
      );
      Ok(redirect(DASHBOARD))
    }
    Err(e) => reject(e, DASHBOARD),
  }
}

#[derive(Debug, Deserialize)]
pub struct CancelForm {
  pub membership_id: i64,
}

/// `POST /user/membership/cancel`
///
/// A membership that does not belong to the caller is treated as missing.
pub async fn cancel<S>(
  State(state): State<AppState<S>>,
  CurrentClient(client): CurrentClient,
  Form(form): Form<CancelForm>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  match state
    .store
    .cancel_membership(client.id, form.membership_id)
    .await
  {
    Ok(m) => {
      tracing::info!(client_id = client.id, membership_id = m.id, "membership cancelled");
      Ok(redirect(DASHBOARD))
    }
    Err(e) => reject(e, DASHBOARD),
  }
}

#[derive(Debug, Deserialize)]
pub struct EnrollForm {
  pub group_id: i64,
}

/// `POST /user/groups/register`
pub async fn enroll<S>(
  State(state): State<AppState<S>>,
  CurrentClient(client): CurrentClient,
  Form(form): Form<EnrollForm>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  match state.store.enroll(client.id, form.group_id).await {
    Ok(r) => {
      tracing::info!(client_id = client.id, group_id = r.group_id, "enrolled");
      Ok(redirect(DASHBOARD))
    }
    Err(e) => reject(e, DASHBOARD),
  }
}
