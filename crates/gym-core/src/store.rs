//! The `GymStore` trait, the repository every higher layer talks to.
//!
//! Implemented by storage backends (e.g. `gym-store-sqlite`). The web and API
//! crates depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{
  Error,
  catalog::{
    Group, GroupInput, Gym, GymInput, MembershipType, MembershipTypeInput, Trainer,
    TrainerInput,
  },
  client::{Client, ClientQuery, LoginRecord, NewClient},
  enrollment::{Registration, RegistrationFilter},
  membership::{Membership, MembershipFilter, Payment, PaymentFilter, Purchase, PurchaseRequest},
  money::Discount,
};

/// Errors returned by a [`GymStore`] backend.
///
/// Business-rule rejections travel as a [`gym_core::Error`](Error) inside the
/// backend error; everything else is an infrastructure failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The business-rule rejection carried by this error, if any.
  fn domain(&self) -> Option<&Error>;
}

/// Abstraction over a gym datastore backend.
///
/// Every mutating method is atomic: it checks its invariants and writes its
/// rows in a single transaction, or writes nothing.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait GymStore: Send + Sync {
  type Error: StoreError;

  // ── Clients ───────────────────────────────────────────────────────────

  /// Insert a contact, client and credential together.
  ///
  /// Fails with [`Error::ContactExists`] if the phone number or email is
  /// already in use.
  fn register_client(
    &self,
    client: NewClient,
    password_hash: String,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  fn get_client(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + '_;

  /// Look up a client and its stored credential by contact email.
  fn find_login(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<LoginRecord>, Self::Error>> + Send + '_;

  /// Filtered client search ordered by `(surname, name)`, one page at a time.
  fn search_clients<'a>(
    &'a self,
    query: &'a ClientQuery,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + 'a;

  fn has_admin(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Flip `target_id`'s admin flag on behalf of `actor_id`.
  ///
  /// Fails with [`Error::SelfDemotion`] when `actor_id == target_id`.
  fn toggle_admin(
    &self,
    actor_id: i64,
    target_id: i64,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  fn set_discount(
    &self,
    target_id: i64,
    discount: Discount,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  // ── Catalog: gyms ─────────────────────────────────────────────────────

  /// All gyms ordered by city, street and building.
  fn list_gyms(&self) -> impl Future<Output = Result<Vec<Gym>, Self::Error>> + Send + '_;

  fn get_gym(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Gym>, Self::Error>> + Send + '_;

  fn create_gym(
    &self,
    input: GymInput,
  ) -> impl Future<Output = Result<Gym, Self::Error>> + Send + '_;

  fn update_gym(
    &self,
    id: i64,
    input: GymInput,
  ) -> impl Future<Output = Result<Gym, Self::Error>> + Send + '_;

  /// Fails with [`Error::InUse`] while memberships or groups reference it.
  fn delete_gym(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Catalog: membership types ─────────────────────────────────────────

  /// All membership types ordered by title.
  fn list_membership_types(
    &self,
  ) -> impl Future<Output = Result<Vec<MembershipType>, Self::Error>> + Send + '_;

  fn get_membership_type(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<MembershipType>, Self::Error>> + Send + '_;

  fn create_membership_type(
    &self,
    input: MembershipTypeInput,
  ) -> impl Future<Output = Result<MembershipType, Self::Error>> + Send + '_;

  fn update_membership_type(
    &self,
    id: i64,
    input: MembershipTypeInput,
  ) -> impl Future<Output = Result<MembershipType, Self::Error>> + Send + '_;

  fn delete_membership_type(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Catalog: trainers and groups ──────────────────────────────────────

  fn list_trainers(&self) -> impl Future<Output = Result<Vec<Trainer>, Self::Error>> + Send + '_;

  fn get_trainer(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Trainer>, Self::Error>> + Send + '_;

  fn create_trainer(
    &self,
    input: TrainerInput,
  ) -> impl Future<Output = Result<Trainer, Self::Error>> + Send + '_;

  /// Replace a trainer's details and contact.
  ///
  /// Fails with [`Error::ContactExists`] if the phone number or email belongs
  /// to someone else.
  fn update_trainer(
    &self,
    id: i64,
    input: TrainerInput,
  ) -> impl Future<Output = Result<Trainer, Self::Error>> + Send + '_;

  /// Remove a trainer and their contact. Fails with [`Error::InUse`] while
  /// groups reference the trainer.
  fn delete_trainer(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_groups(&self) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  fn get_group(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  fn create_group(
    &self,
    input: GroupInput,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  /// Fails with [`Error::CapacityBelowEnrolled`] if the new capacity is
  /// smaller than the current number of registrations.
  fn update_group(
    &self,
    id: i64,
    input: GroupInput,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  /// Fails with [`Error::InUse`] while clients are registered in the group.
  fn delete_group(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Membership ledger ─────────────────────────────────────────────────

  /// Open an active membership and record its successful payment.
  ///
  /// Fails with [`Error::NotFound`] if the membership type or gym is missing
  /// and with [`Error::ActiveMembershipExists`] if the client already holds
  /// an active membership; nothing is written in either case.
  fn purchase(
    &self,
    request: PurchaseRequest,
  ) -> impl Future<Output = Result<Purchase, Self::Error>> + Send + '_;

  /// Cancel a membership owned by `client_id`.
  ///
  /// A membership owned by someone else is reported as [`Error::NotFound`].
  fn cancel_membership(
    &self,
    client_id: i64,
    membership_id: i64,
  ) -> impl Future<Output = Result<Membership, Self::Error>> + Send + '_;

  fn get_membership(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Membership>, Self::Error>> + Send + '_;

  /// Memberships matching `filter`, ordered by start date.
  fn list_memberships(
    &self,
    filter: MembershipFilter,
  ) -> impl Future<Output = Result<Vec<Membership>, Self::Error>> + Send + '_;

  fn get_payment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Payment>, Self::Error>> + Send + '_;

  fn list_payments(
    &self,
    filter: PaymentFilter,
  ) -> impl Future<Output = Result<Vec<Payment>, Self::Error>> + Send + '_;

  // ── Enrollment ────────────────────────────────────────────────────────

  /// Reserve a seat for `client_id` in `group_id`.
  ///
  /// Fails with [`Error::NotFound`], [`Error::AlreadyEnrolled`] or
  /// [`Error::CapacityFull`]; the capacity check and insert are atomic.
  fn enroll(
    &self,
    client_id: i64,
    group_id: i64,
  ) -> impl Future<Output = Result<Registration, Self::Error>> + Send + '_;

  fn get_registration(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Registration>, Self::Error>> + Send + '_;

  fn list_registrations(
    &self,
    filter: RegistrationFilter,
  ) -> impl Future<Output = Result<Vec<Registration>, Self::Error>> + Send + '_;
}
