//! Membership purchases, cancellations and payments.

use gym_core::{
  Entity,
  membership::{
    Membership, MembershipFilter, MembershipStatus, Payment, PaymentFilter, PaymentStatus,
    Purchase, PurchaseRequest, Quote,
  },
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Result, catalog, clients,
  encode::{
    MEMBERSHIP_COLUMNS, PAYMENT_COLUMNS, RawMembership, RawPayment, encode_date, encode_dt,
  },
};

pub fn get_membership(conn: &Connection, id: i64) -> Result<Option<Membership>> {
  let raw = conn
    .query_row(
      &format!("SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE id_membership = ?1"),
      params![id],
      RawMembership::from_row,
    )
    .optional()?;
  raw.map(RawMembership::into_membership).transpose()
}

pub fn list_memberships(conn: &Connection, filter: &MembershipFilter) -> Result<Vec<Membership>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {MEMBERSHIP_COLUMNS} FROM memberships
     WHERE (?1 IS NULL OR id_client = ?1)
       AND (?2 IS NULL OR membership_status = ?2)
     ORDER BY membership_start, id_membership"
  ))?;
  let raws = stmt
    .query_map(
      params![filter.client_id, filter.status.map(|s| s.as_ref().to_owned())],
      RawMembership::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawMembership::into_membership).collect()
}

pub fn get_payment(conn: &Connection, id: i64) -> Result<Option<Payment>> {
  let raw = conn
    .query_row(
      &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id_payment = ?1"),
      params![id],
      RawPayment::from_row,
    )
    .optional()?;
  raw.map(RawPayment::into_payment).transpose()
}

pub fn list_payments(conn: &Connection, filter: &PaymentFilter) -> Result<Vec<Payment>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {PAYMENT_COLUMNS} FROM payments
     WHERE (?1 IS NULL OR id_membership = ?1)
     ORDER BY date_payment, id_payment"
  ))?;
  let raws = stmt
    .query_map(params![filter.membership_id], RawPayment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawPayment::into_payment).collect()
}

fn has_active(conn: &Connection, client_id: i64) -> Result<bool> {
  Ok(conn.query_row(
    "SELECT EXISTS(SELECT 1 FROM memberships
                   WHERE id_client = ?1 AND membership_status = ?2)",
    params![client_id, MembershipStatus::Active.as_ref()],
    |r| r.get(0),
  )?)
}

pub fn purchase(conn: &mut Connection, request: PurchaseRequest) -> Result<Purchase> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let client = clients::get(&tx, request.client_id)?
    .ok_or(gym_core::Error::NotFound(Entity::Client, request.client_id))?;
  let membership_type = catalog::get_membership_type(&tx, request.membership_type_id)?
    .ok_or(gym_core::Error::NotFound(
      Entity::MembershipType,
      request.membership_type_id,
    ))?;
  if catalog::get_gym(&tx, request.gym_id)?.is_none() {
    return Err(gym_core::Error::NotFound(Entity::Gym, request.gym_id).into());
  }
  if has_active(&tx, client.id)? {
    return Err(gym_core::Error::ActiveMembershipExists(client.id).into());
  }

  let quote = Quote::new(&membership_type, client.discount, request.at);

  tx.execute(
    "INSERT INTO memberships
       (id_client, id_membership_type, id_gym, membership_status,
        membership_start, membership_stop)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      client.id,
      membership_type.id,
      request.gym_id,
      MembershipStatus::Active.as_ref(),
      encode_date(quote.start),
      encode_date(quote.stop),
    ],
  )?;
  let membership_id = tx.last_insert_rowid();

  let at = encode_dt(request.at);
  tx.execute(
    "INSERT INTO payments
       (id_membership, payment_status, amount_minor, currency,
        date_creation, date_payment, date_due_date)
     VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?5)",
    params![
      membership_id,
      PaymentStatus::Successful.as_ref(),
      quote.amount.minor(),
      quote.amount.currency().as_ref(),
      at,
    ],
  )?;
  let payment_id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(Purchase {
    membership: Membership {
      id:                 membership_id,
      client_id:          client.id,
      membership_type_id: membership_type.id,
      gym_id:             request.gym_id,
      status:             MembershipStatus::Active,
      start:              quote.start,
      stop:               quote.stop,
    },
    payment:    Payment {
      id:            payment_id,
      membership_id,
      status:        PaymentStatus::Successful,
      amount:        quote.amount,
      created_at:    request.at,
      paid_at:       request.at,
      due_at:        request.at,
    },
  })
}

pub fn cancel(conn: &mut Connection, client_id: i64, membership_id: i64) -> Result<Membership> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let owned = get_membership(&tx, membership_id)?.filter(|m| m.client_id == client_id);
  let Some(mut membership) = owned else {
    return Err(gym_core::Error::NotFound(Entity::Membership, membership_id).into());
  };

  tx.execute(
    "UPDATE memberships SET membership_status = ?1 WHERE id_membership = ?2",
    params![MembershipStatus::Cancelled.as_ref(), membership_id],
  )?;
  tx.commit()?;

  membership.status = MembershipStatus::Cancelled;
  Ok(membership)
}
