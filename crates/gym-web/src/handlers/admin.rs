//! Admin dashboard, client management and catalog editing.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/admin/dashboard` | Client search; no search without a filter |
//! | `POST` | `/admin/toggle-admin/{id}` | 400 on self, 404 on missing |
//! | `GET`  | `/admin/clients/{id}` | Detail, or back to the dashboard |
//! | `POST` | `/admin/clients/{id}/discount` | Percent in `[0, 100]` |
//! | `GET`/`POST` | `/admin/membership-types` | List / create |
//! | `GET`/`POST` | `/admin/membership-types/{id}/edit` | Show / update |
//! | `POST` | `/admin/membership-types/{id}/delete` | |
//! | `GET`/`POST` | `/admin/gyms` | List / create |
//! | `GET`/`POST` | `/admin/gyms/{id}/edit` | Show / update |
//! | `POST` | `/admin/gyms/{id}/delete` | |

use axum::{
  Form, Json,
  extract::{Path, Query, State},
  response::{IntoResponse, Response},
};
use gym_core::{
  catalog::{Gym, GymInput, MembershipType, MembershipTypeInput},
  client::{Client, ClientQuery},
  membership::{
    HISTORY_LEN, Membership, MembershipFilter, Payment, PaymentFilter, latest_payment,
    recent_history,
  },
  money::Discount,
  store::GymStore,
};
use serde::{Deserialize, Serialize};

use super::{redirect, redirect_reason, reject};
use crate::{AppState, auth::AdminClient, error::Error};

const DASHBOARD: &str = "/admin/dashboard";
const MEMBERSHIP_TYPES: &str = "/admin/membership-types";
const GYMS: &str = "/admin/gyms";

// ─── Dashboard ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
  pub name:        Option<String>,
  pub surname:     Option<String>,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  #[serde(default)]
  pub admins_only: bool,
  pub offset:      Option<usize>,
  pub selected:    Option<i64>,
}

impl DashboardParams {
  fn query(&self) -> ClientQuery {
    ClientQuery {
      name:        self.name.clone(),
      surname:     self.surname.clone(),
      phone:       self.phone.clone(),
      email:       self.email.clone(),
      admins_only: self.admins_only,
      limit:       None,
      offset:      self.offset,
    }
  }
}

#[derive(Serialize)]
pub struct AdminDashboard {
  pub admin:    Client,
  /// `None` when no filter was given.
  pub results:  Option<Vec<Client>>,
  pub offset:   usize,
  pub selected: Option<Client>,
}

/// `GET /admin/dashboard`
pub async fn dashboard<S>(
  State(state): State<AppState<S>>,
  AdminClient(admin): AdminClient,
  Query(params): Query<DashboardParams>,
) -> Result<Json<AdminDashboard>, Error>
where
  S: GymStore + Clone + 'static,
{
  let query = params.query();
  let results = if query.is_unfiltered() {
    None
  } else {
    Some(
      state
        .store
        .search_clients(&query)
        .await
        .map_err(Error::store)?,
    )
  };

  let selected = match params.selected {
    Some(id) => state.store.get_client(id).await.map_err(Error::store)?,
    None => None,
  };

  Ok(Json(AdminDashboard {
    admin,
    results,
    offset: query.page_offset(),
    selected,
  }))
}

/// `POST /admin/toggle-admin/{id}`
pub async fn toggle_admin<S>(
  State(state): State<AppState<S>>,
  AdminClient(admin): AdminClient,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  let target = state
    .store
    .toggle_admin(admin.id, id)
    .await
    .map_err(Error::store)?;
  tracing::info!(actor = admin.id, target = id, is_admin = target.is_admin, "admin flag toggled");
  Ok(redirect(&format!("{DASHBOARD}?selected={id}")))
}

// ─── Client detail ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MembershipLine {
  pub membership:     Membership,
  pub latest_payment: Option<Payment>,
}

#[derive(Serialize)]
pub struct ClientDetail {
  pub client:            Client,
  pub active_membership: Option<Membership>,
  pub history:           Vec<MembershipLine>,
}

/// `GET /admin/clients/{id}`
pub async fn client_detail<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  let Some(client) = state.store.get_client(id).await.map_err(Error::store)? else {
    return Ok(redirect(DASHBOARD));
  };

  let memberships = state
    .store
    .list_memberships(MembershipFilter {
      client_id: Some(id),
      ..Default::default()
    })
    .await
    .map_err(Error::store)?;
  let active_membership = memberships.iter().find(|m| m.is_active()).cloned();

  let mut history = Vec::new();
  for membership in recent_history(memberships, HISTORY_LEN) {
    let payments = state
      .store
      .list_payments(PaymentFilter {
        membership_id: Some(membership.id),
      })
      .await
      .map_err(Error::store)?;
    history.push(MembershipLine {
      latest_payment: latest_payment(&payments).cloned(),
      membership,
    });
  }

  Ok(
    Json(ClientDetail {
      client,
      active_membership,
      history,
    })
    .into_response(),
  )
}

#[derive(Debug, Deserialize)]
pub struct DiscountForm {
  pub discount: String,
}

/// `POST /admin/clients/{id}/discount`
pub async fn set_discount<S>(
  State(state): State<AppState<S>>,
  AdminClient(admin): AdminClient,
  Path(id): Path<i64>,
  Form(form): Form<DiscountForm>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  let percent: f64 = form
    .discount
    .trim()
    .parse()
    .map_err(|_| Error::BadRequest(format!("discount is not a number: {:?}", form.discount)))?;
  let discount = Discount::from_percent(percent)?;
  state
    .store
    .set_discount(id, discount)
    .await
    .map_err(Error::store)?;
  tracing::info!(actor = admin.id, target = id, %discount, "discount set");
  Ok(redirect(&format!("/admin/clients/{id}")))
}

// ─── Membership types ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MembershipTypeForm {
  pub title:       String,
  pub price:       String,
  #[serde(default = "default_currency")]
  pub currency:    String,
  pub duration:    i64,
  #[serde(default)]
  pub description: String,
}

fn default_currency() -> String { "CZK".into() }

impl MembershipTypeForm {
  fn into_input(self) -> gym_core::Result<MembershipTypeInput> {
    MembershipTypeInput::from_form(
      self.title.trim().to_owned(),
      &self.price,
      &self.currency,
      self.duration,
      self.description,
    )
  }
}

/// `GET /admin/membership-types`
pub async fn membership_types<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
) -> Result<Json<Vec<MembershipType>>, Error>
where
  S: GymStore + Clone + 'static,
{
  let types = state
    .store
    .list_membership_types()
    .await
    .map_err(Error::store)?;
  Ok(Json(types))
}

/// `POST /admin/membership-types`
pub async fn create_membership_type<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Form(form): Form<MembershipTypeForm>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  let input = match form.into_input() {
    Ok(input) => input,
    Err(e) => return Ok(redirect_reason(MEMBERSHIP_TYPES, e.reason())),
  };
  match state.store.create_membership_type(input).await {
    Ok(t) => {
      tracing::info!(membership_type_id = t.id, price = %t.price, "membership type created");
      Ok(redirect(MEMBERSHIP_TYPES))
    }
    Err(e) => reject(e, MEMBERSHIP_TYPES),
  }
}

/// `GET /admin/membership-types/{id}/edit`
pub async fn membership_type<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  match state
    .store
    .get_membership_type(id)
    .await
    .map_err(Error::store)?
  {
    Some(t) => Ok(Json(t).into_response()),
    None => Ok(redirect_reason(MEMBERSHIP_TYPES, "not_found")),
  }
}

/// `POST /admin/membership-types/{id}/edit`
pub async fn update_membership_type<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Path(id): Path<i64>,
  Form(form): Form<MembershipTypeForm>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  let edit = format!("{MEMBERSHIP_TYPES}/{id}/edit");
  let input = match form.into_input() {
    Ok(input) => input,
    Err(e) => return Ok(redirect_reason(&edit, e.reason())),
  };
  match state.store.update_membership_type(id, input).await {
    Ok(_) => Ok(redirect(MEMBERSHIP_TYPES)),
    Err(e) => reject(e, &edit),
  }
}

/// `POST /admin/membership-types/{id}/delete`
pub async fn delete_membership_type<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  match state.store.delete_membership_type(id).await {
    Ok(()) => {
      tracing::info!(membership_type_id = id, "membership type deleted");
      Ok(redirect(MEMBERSHIP_TYPES))
    }
    Err(e) => reject(e, MEMBERSHIP_TYPES),
  }
}

// ─── Gyms ────────────────────────────────────────────────────────────────────

/// `GET /admin/gyms`
pub async fn gyms<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
) -> Result<Json<Vec<Gym>>, Error>
where
  S: GymStore + Clone + 'static,
{
  let gyms = state.store.list_gyms().await.map_err(Error::store)?;
  Ok(Json(gyms))
}

/// `POST /admin/gyms`
pub async fn create_gym<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Form(input): Form<GymInput>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  match state.store.create_gym(input).await {
    Ok(gym) => {
      tracing::info!(gym_id = gym.id, city = %gym.city, "gym created");
      Ok(redirect(GYMS))
    }
    Err(e) => reject(e, GYMS),
  }
}

/// `GET /admin/gyms/{id}/edit`
pub async fn gym<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  match state.store.get_gym(id).await.map_err(Error::store)? {
    Some(gym) => Ok(Json(gym).into_response()),
    None => Ok(redirect_reason(GYMS, "not_found")),
  }
}

/// `POST /admin/gyms/{id}/edit`
pub async fn update_gym<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Path(id): Path<i64>,
  Form(input): Form<GymInput>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  match state.store.update_gym(id, input).await {
    Ok(_) => Ok(redirect(GYMS)),
    Err(e) => reject(e, &format!("{GYMS}/{id}/edit")),
  }
}

/// `POST /admin/gyms/{id}/delete`
pub async fn delete_gym<S>(
  State(state): State<AppState<S>>,
  AdminClient(_admin): AdminClient,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: GymStore + Clone + 'static,
{
  match state.store.delete_gym(id).await {
    Ok(()) => {
      tracing::info!(gym_id = id, "gym deleted");
      Ok(redirect(GYMS))
    }
    Err(e) => reject(e, GYMS),
  }
}
