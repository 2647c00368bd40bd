//! Client, contact and credential rows.

use chrono::{DateTime, Utc};
use gym_core::{
  Entity,
  client::{Client, ClientQuery, LoginRecord, NewClient},
  money::Discount,
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Result,
  encode::{CLIENT_COLUMNS, RawClient, encode_date, encode_dt, like_pattern},
};

// Patterns arrive folded; `fold` is registered by `schema::install_functions`.
const SEARCH_SQL: &str = r"
  WHERE (?1 IS NULL OR fold(cl.name)    LIKE ?1 ESCAPE '\')
    AND (?2 IS NULL OR fold(cl.surname) LIKE ?2 ESCAPE '\')
    AND (?3 IS NULL OR ct.phone_number  LIKE ?3 ESCAPE '\')
    AND (?4 IS NULL OR fold(ct.email)   LIKE ?4 ESCAPE '\')
    AND (?5 = 0 OR cl.is_admin = 1)
  ORDER BY cl.surname, cl.name, cl.id_client
  LIMIT ?6 OFFSET ?7";

pub fn get(conn: &Connection, id: i64) -> Result<Option<Client>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {CLIENT_COLUMNS}
         FROM clients cl JOIN contacts ct ON ct.id_contact = cl.id_contact
         WHERE cl.id_client = ?1"
      ),
      params![id],
      RawClient::from_row,
    )
    .optional()?;
  raw.map(RawClient::into_client).transpose()
}

fn require(conn: &Connection, id: i64) -> Result<Client> {
  get(conn, id)?.ok_or_else(|| gym_core::Error::NotFound(Entity::Client, id).into())
}

/// Whether a contact with this phone number or email already exists.
pub fn contact_taken(conn: &Connection, phone: &str, email: &str) -> Result<bool> {
  Ok(conn.query_row(
    "SELECT EXISTS(SELECT 1 FROM contacts WHERE phone_number = ?1 OR email = ?2)",
    params![phone, email],
    |r| r.get(0),
  )?)
}

pub fn register(
  conn: &mut Connection,
  client: NewClient,
  password_hash: String,
  now: DateTime<Utc>,
) -> Result<Client> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  if contact_taken(&tx, &client.contact.phone_number, &client.contact.email)? {
    return Err(gym_core::Error::ContactExists.into());
  }

  tx.execute(
    "INSERT INTO contacts (phone_number, email) VALUES (?1, ?2)",
    params![client.contact.phone_number, client.contact.email],
  )?;
  let contact_id = tx.last_insert_rowid();

  tx.execute(
    "INSERT INTO clients (name, surname, birthday, sex, discount_bp, id_contact, is_admin)
     VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
    params![
      client.name,
      client.surname,
      encode_date(client.birthday),
      client.sex.as_ref(),
      contact_id,
      client.is_admin,
    ],
  )?;
  let client_id = tx.last_insert_rowid();

  tx.execute(
    "INSERT INTO passwords (id_client, password_hash, created_at) VALUES (?1, ?2, ?3)",
    params![client_id, password_hash, encode_dt(now)],
  )?;

  let created = require(&tx, client_id)?;
  tx.commit()?;
  Ok(created)
}

pub fn find_login(conn: &Connection, email: &str) -> Result<Option<LoginRecord>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {CLIENT_COLUMNS}, p.password_hash
         FROM contacts ct
         JOIN clients cl ON cl.id_contact = ct.id_contact
         LEFT JOIN passwords p ON p.id_client = cl.id_client
         WHERE ct.email = ?1"
      ),
      params![email.trim()],
      |row| Ok((RawClient::from_row(row)?, row.get::<_, Option<String>>(9)?)),
    )
    .optional()?;

  raw
    .map(|(client, password_hash)| {
      Ok(LoginRecord {
        client: client.into_client()?,
        password_hash,
      })
    })
    .transpose()
}

pub fn search(conn: &Connection, query: &ClientQuery) -> Result<Vec<Client>> {
  let pattern = |f: &Option<String>| {
    f.as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|s| like_pattern(&s.to_lowercase()))
  };

  let mut stmt = conn.prepare(&format!(
    "SELECT {CLIENT_COLUMNS}
     FROM clients cl JOIN contacts ct ON ct.id_contact = cl.id_contact
     {SEARCH_SQL}"
  ))?;
  let raws = stmt
    .query_map(
      params![
        pattern(&query.name),
        pattern(&query.surname),
        pattern(&query.phone),
        pattern(&query.email),
        query.admins_only,
        query.page_limit() as i64,
        query.page_offset() as i64,
      ],
      RawClient::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawClient::into_client).collect()
}

pub fn has_admin(conn: &Connection) -> Result<bool> {
  Ok(conn.query_row(
    "SELECT EXISTS(SELECT 1 FROM clients WHERE is_admin = 1)",
    [],
    |r| r.get(0),
  )?)
}

pub fn toggle_admin(conn: &mut Connection, actor_id: i64, target_id: i64) -> Result<Client> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  require(&tx, target_id)?;
  if actor_id == target_id {
    return Err(gym_core::Error::SelfDemotion.into());
  }

  tx.execute(
    "UPDATE clients SET is_admin = NOT is_admin WHERE id_client = ?1",
    params![target_id],
  )?;

  let updated = require(&tx, target_id)?;
  tx.commit()?;
  Ok(updated)
}

pub fn set_discount(conn: &mut Connection, target_id: i64, discount: Discount) -> Result<Client> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  require(&tx, target_id)?;
  tx.execute(
    "UPDATE clients SET discount_bp = ?1 WHERE id_client = ?2",
    params![discount.basis_points(), target_id],
  )?;

  let updated = require(&tx, target_id)?;
  tx.commit()?;
  Ok(updated)
}
