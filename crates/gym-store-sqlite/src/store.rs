//! [`SqliteStore`], the SQLite implementation of [`GymStore`].

use std::path::Path;

use chrono::Utc;
use gym_core::{
  catalog::{
    Group, GroupInput, Gym, GymInput, MembershipType, MembershipTypeInput, Trainer,
    TrainerInput,
  },
  client::{Client, ClientQuery, LoginRecord, NewClient},
  enrollment::{Registration, RegistrationFilter},
  membership::{Membership, MembershipFilter, Payment, PaymentFilter, Purchase, PurchaseRequest},
  money::Discount,
  store::GymStore,
};

use crate::{
  Error, Result, catalog, clients, enrollment, ledger,
  schema::{SCHEMA, install_functions},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gym store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All access
/// goes through one connection thread, and every mutating operation runs in
/// its own `BEGIN IMMEDIATE` transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        install_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread, keeping domain rejections intact.
  async fn run<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── GymStore impl ───────────────────────────────────────────────────────────

impl GymStore for SqliteStore {
  type Error = Error;

  // ── Clients ───────────────────────────────────────────────────────────

  async fn register_client(&self, client: NewClient, password_hash: String) -> Result<Client> {
    let now = Utc::now();
    self
      .run(move |conn| clients::register(conn, client, password_hash, now))
      .await
  }

  async fn get_client(&self, id: i64) -> Result<Option<Client>> {
    self.run(move |conn| clients::get(conn, id)).await
  }

  async fn find_login(&self, email: String) -> Result<Option<LoginRecord>> {
    self.run(move |conn| clients::find_login(conn, &email)).await
  }

  async fn search_clients<'a>(&'a self, query: &'a ClientQuery) -> Result<Vec<Client>> {
    let query = query.clone();
    self.run(move |conn| clients::search(conn, &query)).await
  }

  async fn has_admin(&self) -> Result<bool> {
    self.run(|conn| clients::has_admin(conn)).await
  }

  async fn toggle_admin(&self, actor_id: i64, target_id: i64) -> Result<Client> {
    self
      .run(move |conn| clients::toggle_admin(conn, actor_id, target_id))
      .await
  }

  async fn set_discount(&self, target_id: i64, discount: Discount) -> Result<Client> {
    self
      .run(move |conn| clients::set_discount(conn, target_id, discount))
      .await
  }

  // ── Catalog: gyms ─────────────────────────────────────────────────────

  async fn list_gyms(&self) -> Result<Vec<Gym>> {
    self.run(|conn| catalog::list_gyms(conn)).await
  }

  async fn get_gym(&self, id: i64) -> Result<Option<Gym>> {
    self.run(move |conn| catalog::get_gym(conn, id)).await
  }

  async fn create_gym(&self, input: GymInput) -> Result<Gym> {
    self.run(move |conn| catalog::create_gym(conn, input)).await
  }

  async fn update_gym(&self, id: i64, input: GymInput) -> Result<Gym> {
    self.run(move |conn| catalog::update_gym(conn, id, input)).await
  }

  async fn delete_gym(&self, id: i64) -> Result<()> {
    self.run(move |conn| catalog::delete_gym(conn, id)).await
  }

  // ── Catalog: membership types ─────────────────────────────────────────

  async fn list_membership_types(&self) -> Result<Vec<MembershipType>> {
    self.run(|conn| catalog::list_membership_types(conn)).await
  }

  async fn get_membership_type(&self, id: i64) -> Result<Option<MembershipType>> {
    self
      .run(move |conn| catalog::get_membership_type(conn, id))
      .await
  }

  async fn create_membership_type(&self, input: MembershipTypeInput) -> Result<MembershipType> {
    self
      .run(move |conn| catalog::create_membership_type(conn, input))
      .await
  }

  async fn update_membership_type(
    &self,
    id: i64,
    input: MembershipTypeInput,
  ) -> Result<MembershipType> {
    self
      .run(move |conn| catalog::update_membership_type(conn, id, input))
      .await
  }

  async fn delete_membership_type(&self, id: i64) -> Result<()> {
    self
      .run(move |conn| catalog::delete_membership_type(conn, id))
      .await
  }

  // ── Catalog: trainers and groups ──────────────────────────────────────

  async fn list_trainers(&self) -> Result<Vec<Trainer>> {
    self.run(|conn| catalog::list_trainers(conn)).await
  }

  async fn get_trainer(&self, id: i64) -> Result<Option<Trainer>> {
    self.run(move |conn| catalog::get_trainer(conn, id)).await
  }

  async fn create_trainer(&self, input: TrainerInput) -> Result<Trainer> {
    self.run(move |conn| catalog::create_trainer(conn, input)).await
  }

  async fn update_trainer(&self, id: i64, input: TrainerInput) -> Result<Trainer> {
    self
      .run(move |conn| catalog::update_trainer(conn, id, input))
      .await
  }

  async fn delete_trainer(&self, id: i64) -> Result<()> {
    self.run(move |conn| catalog::delete_trainer(conn, id)).await
  }

  async fn list_groups(&self) -> Result<Vec<Group>> {
    self.run(|conn| catalog::list_groups(conn)).await
  }

  async fn get_group(&self, id: i64) -> Result<Option<Group>> {
    self.run(move |conn| catalog::get_group(conn, id)).await
  }

  async fn create_group(&self, input: GroupInput) -> Result<Group> {
    self.run(move |conn| catalog::create_group(conn, input)).await
  }

  async fn update_group(&self, id: i64, input: GroupInput) -> Result<Group> {
    self
      .run(move |conn| catalog::update_group(conn, id, input))
      .await
  }

  async fn delete_group(&self, id: i64) -> Result<()> {
    self.run(move |conn| catalog::delete_group(conn, id)).await
  }

  // ── Membership ledger ─────────────────────────────────────────────────

  async fn purchase(&self, request: PurchaseRequest) -> Result<Purchase> {
    self.run(move |conn| ledger::purchase(conn, request)).await
  }

  async fn cancel_membership(&self, client_id: i64, membership_id: i64) -> Result<Membership> {
    self
      .run(move |conn| ledger::cancel(conn, client_id, membership_id))
      .await
  }

  async fn get_membership(&self, id: i64) -> Result<Option<Membership>> {
    self.run(move |conn| ledger::get_membership(conn, id)).await
  }

  async fn list_memberships(&self, filter: MembershipFilter) -> Result<Vec<Membership>> {
    self
      .run(move |conn| ledger::list_memberships(conn, &filter))
      .await
  }

  async fn get_payment(&self, id: i64) -> Result<Option<Payment>> {
    self.run(move |conn| ledger::get_payment(conn, id)).await
  }

  async fn list_payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>> {
    self.run(move |conn| ledger::list_payments(conn, &filter)).await
  }

  // ── Enrollment ────────────────────────────────────────────────────────

  async fn enroll(&self, client_id: i64, group_id: i64) -> Result<Registration> {
    self
      .run(move |conn| enrollment::enroll(conn, client_id, group_id))
      .await
  }

  async fn get_registration(&self, id: i64) -> Result<Option<Registration>> {
    self.run(move |conn| enrollment::get(conn, id)).await
  }

  async fn list_registrations(&self, filter: RegistrationFilter) -> Result<Vec<Registration>> {
    self.run(move |conn| enrollment::list(conn, &filter)).await
  }
}
