//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use gym_core::{
  Entity,
  catalog::{GroupInput, GymInput, MembershipTypeInput, TrainerInput, WeekDay},
  client::{ClientQuery, Contact, NewClient, Sex},
  enrollment::RegistrationFilter,
  membership::{MembershipFilter, MembershipStatus, PaymentFilter, PaymentStatus, PurchaseRequest},
  money::{Currency, Discount, Money},
  store::{GymStore, StoreError},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn domain(err: &Error) -> &gym_core::Error {
  err.domain().expect("business rejection")
}

fn new_client(name: &str, surname: &str, n: u32) -> NewClient {
  NewClient {
    name:     name.into(),
    surname:  surname.into(),
    birthday: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
    sex:      Sex::F,
    contact:  Contact {
      phone_number: format!("+42060000{n:04}"),
      email:        format!("{}.{}@example.com", name.to_lowercase(), n),
    },
    is_admin: false,
  }
}

async fn client(s: &SqliteStore, name: &str, surname: &str, n: u32) -> i64 {
  s.register_client(new_client(name, surname, n), "$argon2id$stub".into())
    .await
    .unwrap()
    .id
}

async fn gym(s: &SqliteStore) -> i64 {
  s.create_gym(GymInput {
    country:  "Czech Republic".into(),
    city:     "Brno".into(),
    postcode: "60200".into(),
    street:   "Ceska".into(),
    building: "1".into(),
  })
  .await
  .unwrap()
  .id
}

async fn standard_type(s: &SqliteStore) -> i64 {
  s.create_membership_type(MembershipTypeInput {
    title:         "Standard".into(),
    price:         Money::from_minor(50_000, Currency::Czk),
    duration_days: 30,
    description:   "Gym and classes".into(),
  })
  .await
  .unwrap()
  .id
}

async fn group(s: &SqliteStore, max_capacity: i64) -> i64 {
  let gym_id = gym(s).await;
  let trainer = s
    .create_trainer(TrainerInput {
      name:     "Petr".into(),
      surname:  "Svoboda".into(),
      birthday: NaiveDate::from_ymd_opt(1985, 1, 1).unwrap(),
      sex:      Sex::M,
      contact:  Contact {
        phone_number: "+420777000111".into(),
        email:        "petr@gym.example".into(),
      },
    })
    .await
    .unwrap();
  s.create_group(GroupInput {
    trainer_id: trainer.id,
    gym_id,
    max_capacity,
    week_day: WeekDay::Tuesday,
    time_start: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    time_finish: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
  })
  .await
  .unwrap()
  .id
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_find_login() {
  let s = store().await;
  let id = client(&s, "Jana", "Novakova", 1).await;

  let fetched = s.get_client(id).await.unwrap().unwrap();
  assert_eq!(fetched.surname, "Novakova");
  assert_eq!(fetched.discount, Discount::NONE);
  assert!(!fetched.is_admin);

  let login = s
    .find_login("JANA.1@example.com".into())
    .await
    .unwrap()
    .expect("email lookup ignores case");
  assert_eq!(login.client.id, id);
  assert_eq!(login.password_hash.as_deref(), Some("$argon2id$stub"));

  assert!(s.find_login("nobody@example.com".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_contact_is_rejected_and_writes_nothing() {
  let s = store().await;
  client(&s, "Jana", "Novakova", 1).await;

  let mut dup = new_client("Eva", "Dvorakova", 2);
  dup.contact.email = "jana.1@example.com".into();
  let err = s.register_client(dup, "h".into()).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::ContactExists));

  let all = s
    .search_clients(&ClientQuery {
      surname: Some("Dvorakova".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(all.is_empty());
}

#[tokio::test]
async fn search_filters_orders_and_pages() {
  let s = store().await;
  client(&s, "Jana", "Novakova", 1).await;
  client(&s, "Adam", "Novak", 2).await;
  client(&s, "Eva", "Dvorakova", 3).await;
  client(&s, "Anna", "Novak", 4).await;

  let q = ClientQuery {
    surname: Some("nov".into()),
    ..Default::default()
  };
  let hits = s.search_clients(&q).await.unwrap();
  let names: Vec<_> = hits.iter().map(|c| (c.surname.as_str(), c.name.as_str())).collect();
  assert_eq!(
    names,
    vec![("Novak", "Adam"), ("Novak", "Anna"), ("Novakova", "Jana")]
  );

  let page = s
    .search_clients(&ClientQuery {
      limit: Some(2),
      offset: Some(2),
      ..q
    })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].name, "Jana");
}

#[tokio::test]
async fn search_folds_accented_letters() {
  let s = store().await;
  let id = client(&s, "Šárka", "Čermáková", 1).await;
  client(&s, "Jana", "Novakova", 2).await;

  for (name, surname) in [(None, Some("čermák")), (None, Some("ČERMÁK")), (Some("šár"), None)] {
    let hits = s
      .search_clients(&ClientQuery {
        name: name.map(Into::into),
        surname: surname.map(Into::into),
        ..Default::default()
      })
      .await
      .unwrap();
    let ids: Vec<_> = hits.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![id], "{name:?} {surname:?}");
  }
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  client(&s, "Jana", "Novakova", 1).await;

  let hits = s
    .search_clients(&ClientQuery {
      name: Some("%".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(hits.is_empty());
}

#[tokio::test]
async fn search_admins_only() {
  let s = store().await;
  let mut admin = new_client("Admin", "Root", 9);
  admin.is_admin = true;
  s.register_client(admin, "h".into()).await.unwrap();
  client(&s, "Jana", "Novakova", 1).await;

  assert!(s.has_admin().await.unwrap());
  let admins = s
    .search_clients(&ClientQuery {
      admins_only: true,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(admins.len(), 1);
  assert_eq!(admins[0].name, "Admin");
}

#[tokio::test]
async fn toggle_admin_flips_target_but_never_self() {
  let s = store().await;
  let actor = client(&s, "Admin", "Root", 9).await;
  let target = client(&s, "Jana", "Novakova", 1).await;

  assert!(s.toggle_admin(actor, target).await.unwrap().is_admin);
  assert!(!s.toggle_admin(actor, target).await.unwrap().is_admin);

  let err = s.toggle_admin(actor, actor).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::SelfDemotion));
  assert!(!s.get_client(actor).await.unwrap().unwrap().is_admin);

  let err = s.toggle_admin(actor, 999).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(Entity::Client, 999)));
}

#[tokio::test]
async fn set_discount_persists() {
  let s = store().await;
  let id = client(&s, "Jana", "Novakova", 1).await;

  let d = Discount::from_percent(12.5).unwrap();
  assert_eq!(s.set_discount(id, d).await.unwrap().discount, d);
  assert_eq!(s.get_client(id).await.unwrap().unwrap().discount.percent(), 12.5);

  let err = s.set_discount(999, d).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(..)));
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn gym_crud_and_in_use_guard() {
  let s = store().await;
  let gym_id = gym(&s).await;

  let updated = s
    .update_gym(gym_id, GymInput {
      country:  "Czech Republic".into(),
      city:     "Brno".into(),
      postcode: "61200".into(),
      street:   "Kolejni".into(),
      building: "2".into(),
    })
    .await
    .unwrap();
  assert_eq!(updated.street, "Kolejni");
  assert_eq!(s.list_gyms().await.unwrap().len(), 1);

  let client_id = client(&s, "Jana", "Novakova", 1).await;
  let type_id = standard_type(&s).await;
  s.purchase(PurchaseRequest {
    client_id,
    membership_type_id: type_id,
    gym_id,
    at: Utc::now(),
  })
  .await
  .unwrap();

  let err = s.delete_gym(gym_id).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::InUse(Entity::Gym, _)));
  let err = s.delete_membership_type(type_id).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::InUse(Entity::MembershipType, _)));

  let spare = gym(&s).await;
  s.delete_gym(spare).await.unwrap();
  assert!(s.get_gym(spare).await.unwrap().is_none());
  let err = s.delete_gym(spare).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(Entity::Gym, _)));
}

#[tokio::test]
async fn membership_types_list_by_title() {
  let s = store().await;
  for (title, price) in [("Premium", 80_000), ("Basic", 30_000)] {
    s.create_membership_type(MembershipTypeInput {
      title:         title.into(),
      price:         Money::from_minor(price, Currency::Czk),
      duration_days: 30,
      description:   String::new(),
    })
    .await
    .unwrap();
  }
  let titles: Vec<_> = s
    .list_membership_types()
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.title)
    .collect();
  assert_eq!(titles, vec!["Basic", "Premium"]);
}

#[tokio::test]
async fn group_requires_existing_trainer_and_gym() {
  let s = store().await;
  let gym_id = gym(&s).await;
  let err = s
    .create_group(GroupInput {
      trainer_id: 42,
      gym_id,
      max_capacity: 10,
      week_day: WeekDay::Monday,
      time_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
      time_finish: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    })
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(Entity::Trainer, 42)));
}

fn petr() -> TrainerInput {
  TrainerInput {
    name:     "Petr".into(),
    surname:  "Svoboda".into(),
    birthday: NaiveDate::from_ymd_opt(1985, 1, 1).unwrap(),
    sex:      Sex::M,
    contact:  Contact {
      phone_number: "+420777000222".into(),
      email:        "petr.s@gym.example".into(),
    },
  }
}

#[tokio::test]
async fn trainer_edit_keeps_contacts_unique() {
  let s = store().await;
  client(&s, "Jana", "Novakova", 1).await;
  let trainer = s.create_trainer(petr()).await.unwrap();

  let mut input = petr();
  input.surname = "Novotny".into();
  input.contact.email = "petr.n@gym.example".into();
  let updated = s.update_trainer(trainer.id, input.clone()).await.unwrap();
  assert_eq!(updated.surname, "Novotny");
  let stored = s.get_trainer(trainer.id).await.unwrap().unwrap();
  assert_eq!(stored.contact.email, "petr.n@gym.example");

  input.contact.email = "jana.1@example.com".into();
  let err = s.update_trainer(trainer.id, input).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::ContactExists));

  s.delete_trainer(trainer.id).await.unwrap();
  assert!(s.get_trainer(trainer.id).await.unwrap().is_none());
  let err = s.delete_trainer(trainer.id).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(Entity::Trainer, _)));

  // The contact went with the trainer.
  let mut reuse = new_client("Eva", "Dvorakova", 2);
  reuse.contact.phone_number = "+420777000222".into();
  s.register_client(reuse, "h".into()).await.unwrap();
}

#[tokio::test]
async fn group_edit_and_delete_respect_registrations() {
  let s = store().await;
  let group_id = group(&s, 3).await;
  let current = s.get_group(group_id).await.unwrap().unwrap();
  for n in 1..=2 {
    let id = client(&s, "Member", "Regular", n).await;
    s.enroll(id, group_id).await.unwrap();
  }

  let edit = |max_capacity| GroupInput {
    trainer_id: current.trainer_id,
    gym_id: current.gym_id,
    max_capacity,
    week_day: WeekDay::Wednesday,
    time_start: current.time_start,
    time_finish: current.time_finish,
  };
  let err = s.update_group(group_id, edit(1)).await.unwrap_err();
  assert!(matches!(
    domain(&err),
    gym_core::Error::CapacityBelowEnrolled { enrolled: 2, .. }
  ));
  let updated = s.update_group(group_id, edit(2)).await.unwrap();
  assert_eq!(updated.week_day, WeekDay::Wednesday);
  assert_eq!(s.get_group(group_id).await.unwrap().unwrap().max_capacity, 2);

  let err = s.delete_group(group_id).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::InUse(Entity::Group, _)));
  let err = s.delete_trainer(current.trainer_id).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::InUse(Entity::Trainer, _)));

  let spare = s.create_group(edit(5)).await.unwrap();
  s.delete_group(spare.id).await.unwrap();
  assert!(s.get_group(spare.id).await.unwrap().is_none());
}

#[tokio::test]
async fn group_times_are_stored_to_the_second() {
  let s = store().await;
  let group_id = group(&s, 3).await;
  let current = s.get_group(group_id).await.unwrap().unwrap();
  let at = |ms| NaiveTime::from_hms_milli_opt(10, 0, 0, ms).unwrap();

  let err = s
    .create_group(GroupInput {
      trainer_id: current.trainer_id,
      gym_id: current.gym_id,
      max_capacity: 4,
      week_day: WeekDay::Friday,
      time_start: at(200),
      time_finish: at(800),
    })
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::InvalidSchedule));

  let created = s
    .create_group(GroupInput {
      trainer_id: current.trainer_id,
      gym_id: current.gym_id,
      max_capacity: 4,
      week_day: WeekDay::Friday,
      time_start: at(200),
      time_finish: NaiveTime::from_hms_milli_opt(11, 0, 0, 999).unwrap(),
    })
    .await
    .unwrap();
  let stored = s.get_group(created.id).await.unwrap().unwrap();
  assert_eq!(stored.time_start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
  assert_eq!(stored.time_start, created.time_start);
  assert_eq!(stored.time_finish, created.time_finish);
}

// ─── Membership ledger ───────────────────────────────────────────────────────

#[tokio::test]
async fn purchase_applies_discount_and_records_payment() {
  let s = store().await;
  let client_id = client(&s, "Jana", "Novakova", 1).await;
  s.set_discount(client_id, Discount::from_percent(10.0).unwrap())
    .await
    .unwrap();
  let gym_id = gym(&s).await;
  let type_id = standard_type(&s).await;
  let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

  let purchase = s
    .purchase(PurchaseRequest {
      client_id,
      membership_type_id: type_id,
      gym_id,
      at,
    })
    .await
    .unwrap();

  let m = &purchase.membership;
  assert_eq!(m.status, MembershipStatus::Active);
  assert_eq!(m.start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
  assert_eq!(m.stop, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());

  let p = &purchase.payment;
  assert_eq!(p.amount.to_string(), "450.00 CZK");
  assert_eq!(p.status, PaymentStatus::Successful);
  assert_eq!(p.paid_at, at);

  let stored = s
    .list_payments(PaymentFilter {
      membership_id: Some(m.id),
    })
    .await
    .unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].amount, p.amount);
  assert_eq!(s.get_membership(m.id).await.unwrap().unwrap().stop, m.stop);
}

#[tokio::test]
async fn second_active_membership_is_rejected_without_writes() {
  let s = store().await;
  let client_id = client(&s, "Jana", "Novakova", 1).await;
  let gym_id = gym(&s).await;
  let type_id = standard_type(&s).await;
  let req = PurchaseRequest {
    client_id,
    membership_type_id: type_id,
    gym_id,
    at: Utc::now(),
  };

  s.purchase(req).await.unwrap();
  let err = s.purchase(req).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::ActiveMembershipExists(id) if *id == client_id));
  assert_eq!(domain(&err).reason(), "has_active");

  let memberships = s
    .list_memberships(MembershipFilter {
      client_id: Some(client_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(memberships.len(), 1);
  assert_eq!(s.list_payments(PaymentFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn purchase_with_unknown_type_or_gym_fails() {
  let s = store().await;
  let client_id = client(&s, "Jana", "Novakova", 1).await;
  let gym_id = gym(&s).await;

  let err = s
    .purchase(PurchaseRequest {
      client_id,
      membership_type_id: 77,
      gym_id,
      at: Utc::now(),
    })
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(Entity::MembershipType, 77)));

  let type_id = standard_type(&s).await;
  let err = s
    .purchase(PurchaseRequest {
      client_id,
      membership_type_id: type_id,
      gym_id: 88,
      at: Utc::now(),
    })
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(Entity::Gym, 88)));
  assert!(s.list_memberships(MembershipFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn cancel_then_buy_again() {
  let s = store().await;
  let client_id = client(&s, "Jana", "Novakova", 1).await;
  let gym_id = gym(&s).await;
  let type_id = standard_type(&s).await;
  let req = PurchaseRequest {
    client_id,
    membership_type_id: type_id,
    gym_id,
    at: Utc::now(),
  };

  let first = s.purchase(req).await.unwrap().membership;
  let cancelled = s.cancel_membership(client_id, first.id).await.unwrap();
  assert_eq!(cancelled.status, MembershipStatus::Cancelled);

  s.purchase(req).await.unwrap();
  let active = s
    .list_memberships(MembershipFilter {
      client_id: Some(client_id),
      status:    Some(MembershipStatus::Active),
    })
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_ne!(active[0].id, first.id);
}

#[tokio::test]
async fn cancelling_someone_elses_membership_is_not_found() {
  let s = store().await;
  let owner = client(&s, "Jana", "Novakova", 1).await;
  let other = client(&s, "Eva", "Dvorakova", 2).await;
  let gym_id = gym(&s).await;
  let type_id = standard_type(&s).await;

  let m = s
    .purchase(PurchaseRequest {
      client_id: owner,
      membership_type_id: type_id,
      gym_id,
      at: Utc::now(),
    })
    .await
    .unwrap()
    .membership;

  let err = s.cancel_membership(other, m.id).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(Entity::Membership, _)));
  assert!(s.get_membership(m.id).await.unwrap().unwrap().is_active());
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn enroll_rejects_duplicate_and_full_group() {
  let s = store().await;
  let group_id = group(&s, 1).await;
  let first = client(&s, "Jana", "Novakova", 1).await;
  let second = client(&s, "Eva", "Dvorakova", 2).await;

  let reg = s.enroll(first, group_id).await.unwrap();
  assert_eq!(s.get_registration(reg.id).await.unwrap(), Some(reg));

  let err = s.enroll(first, group_id).await.unwrap_err();
  assert_eq!(domain(&err).reason(), "already_registered");

  let err = s.enroll(second, group_id).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::CapacityFull(id) if *id == group_id));

  let err = s.enroll(second, 999).await.unwrap_err();
  assert!(matches!(domain(&err), gym_core::Error::NotFound(Entity::Group, 999)));

  let regs = s
    .list_registrations(RegistrationFilter {
      group_id: Some(group_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(regs.len(), 1);
}

#[tokio::test]
async fn concurrent_enrollment_never_exceeds_capacity() {
  let s = store().await;
  let group_id = group(&s, 3).await;
  let mut ids = Vec::new();
  for n in 0..10 {
    ids.push(client(&s, "Member", "Racer", n).await);
  }

  let tasks: Vec<_> = ids
    .into_iter()
    .map(|id| {
      let s = s.clone();
      tokio::spawn(async move { s.enroll(id, group_id).await })
    })
    .collect();

  let mut granted = 0;
  for task in tasks {
    match task.await.unwrap() {
      Ok(_) => granted += 1,
      Err(e) => assert!(matches!(domain(&e), gym_core::Error::CapacityFull(_))),
    }
  }
  assert_eq!(granted, 3);

  let regs = s
    .list_registrations(RegistrationFilter {
      group_id: Some(group_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(regs.len(), 3);
}
