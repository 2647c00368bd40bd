//! Class-group registrations.

use gym_core::{
  Entity,
  enrollment::{Registration, RegistrationFilter, check_seat},
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Result, catalog, clients,
  encode::{REGISTRATION_COLUMNS, registration_from_row},
};

pub fn get(conn: &Connection, id: i64) -> Result<Option<Registration>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {REGISTRATION_COLUMNS} FROM registered WHERE id_registered = ?1"),
        params![id],
        registration_from_row,
      )
      .optional()?,
  )
}

pub fn list(conn: &Connection, filter: &RegistrationFilter) -> Result<Vec<Registration>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {REGISTRATION_COLUMNS} FROM registered
     WHERE (?1 IS NULL OR id_group = ?1)
       AND (?2 IS NULL OR id_client = ?2)
     ORDER BY id_registered"
  ))?;
  let registrations = stmt
    .query_map(params![filter.group_id, filter.client_id], registration_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(registrations)
}

pub fn enroll(conn: &mut Connection, client_id: i64, group_id: i64) -> Result<Registration> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  if clients::get(&tx, client_id)?.is_none() {
    return Err(gym_core::Error::NotFound(Entity::Client, client_id).into());
  }
  let group = catalog::get_group(&tx, group_id)?
    .ok_or(gym_core::Error::NotFound(Entity::Group, group_id))?;

  let (already, taken): (bool, i64) = tx.query_row(
    "SELECT EXISTS(SELECT 1 FROM registered WHERE id_group = ?1 AND id_client = ?2),
            (SELECT COUNT(*) FROM registered WHERE id_group = ?1)",
    params![group_id, client_id],
    |r| Ok((r.get(0)?, r.get(1)?)),
  )?;
  check_seat(&group, client_id, already, u64::try_from(taken).unwrap_or(0))?;

  // Seat limit is re-checked by the insert itself.
  let inserted = tx.execute(
    "INSERT INTO registered (id_group, id_client)
     SELECT ?1, ?2
     WHERE (SELECT COUNT(*) FROM registered WHERE id_group = ?1) < ?3",
    params![group_id, client_id, group.max_capacity],
  )?;
  if inserted == 0 {
    return Err(gym_core::Error::CapacityFull(group_id).into());
  }
  let id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(Registration {
    id,
    group_id,
    client_id,
  })
}
