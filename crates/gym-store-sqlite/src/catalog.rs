//! Gyms, membership types, trainers and class groups.

use gym_core::{
  Entity,
  catalog::{
    Group, GroupInput, Gym, GymInput, MembershipType, MembershipTypeInput, Trainer,
    TrainerInput,
  },
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Result,
  clients::contact_taken,
  encode::{
    GROUP_COLUMNS, GYM_COLUMNS, MEMBERSHIP_TYPE_COLUMNS, RawGroup, RawMembershipType,
    RawTrainer, TRAINER_COLUMNS, encode_date, encode_time, gym_from_row,
  },
};

fn not_found(entity: Entity, id: i64) -> crate::Error {
  gym_core::Error::NotFound(entity, id).into()
}

fn exists(conn: &Connection, sql: &str, id: i64) -> Result<bool> {
  Ok(conn.query_row(sql, params![id], |r| r.get(0))?)
}

// ─── Gyms ────────────────────────────────────────────────────────────────────

pub fn list_gyms(conn: &Connection) -> Result<Vec<Gym>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {GYM_COLUMNS} FROM gyms ORDER BY city, street, building, id_gym"
  ))?;
  let gyms = stmt
    .query_map([], gym_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(gyms)
}

pub fn get_gym(conn: &Connection, id: i64) -> Result<Option<Gym>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {GYM_COLUMNS} FROM gyms WHERE id_gym = ?1"),
        params![id],
        gym_from_row,
      )
      .optional()?,
  )
}

pub fn create_gym(conn: &Connection, input: GymInput) -> Result<Gym> {
  conn.execute(
    "INSERT INTO gyms (country, city, postcode, street, building)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![input.country, input.city, input.postcode, input.street, input.building],
  )?;
  Ok(Gym {
    id:       conn.last_insert_rowid(),
    country:  input.country,
    city:     input.city,
    postcode: input.postcode,
    street:   input.street,
    building: input.building,
  })
}

pub fn update_gym(conn: &Connection, id: i64, input: GymInput) -> Result<Gym> {
  let changed = conn.execute(
    "UPDATE gyms SET country = ?1, city = ?2, postcode = ?3, street = ?4, building = ?5
     WHERE id_gym = ?6",
    params![input.country, input.city, input.postcode, input.street, input.building, id],
  )?;
  if changed == 0 {
    return Err(not_found(Entity::Gym, id));
  }
  Ok(Gym {
    id,
    country: input.country,
    city: input.city,
    postcode: input.postcode,
    street: input.street,
    building: input.building,
  })
}

pub fn delete_gym(conn: &mut Connection, id: i64) -> Result<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  if !exists(&tx, "SELECT EXISTS(SELECT 1 FROM gyms WHERE id_gym = ?1)", id)? {
    return Err(not_found(Entity::Gym, id));
  }
  let referenced = exists(
    &tx,
    "SELECT EXISTS(SELECT 1 FROM memberships WHERE id_gym = ?1)
         OR EXISTS(SELECT 1 FROM class_groups WHERE id_gym = ?1)",
    id,
  )?;
  if referenced {
    return Err(gym_core::Error::InUse(Entity::Gym, id).into());
  }

  tx.execute("DELETE FROM gyms WHERE id_gym = ?1", params![id])?;
  tx.commit()?;
  Ok(())
}

// ─── Membership types ────────────────────────────────────────────────────────

pub fn list_membership_types(conn: &Connection) -> Result<Vec<MembershipType>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {MEMBERSHIP_TYPE_COLUMNS} FROM membership_types ORDER BY title, id_membership_type"
  ))?;
  let raws = stmt
    .query_map([], RawMembershipType::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(RawMembershipType::into_membership_type)
    .collect()
}

pub fn get_membership_type(conn: &Connection, id: i64) -> Result<Option<MembershipType>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {MEMBERSHIP_TYPE_COLUMNS} FROM membership_types WHERE id_membership_type = ?1"
      ),
      params![id],
      RawMembershipType::from_row,
    )
    .optional()?;
  raw.map(RawMembershipType::into_membership_type).transpose()
}

pub fn create_membership_type(
  conn: &Connection,
  input: MembershipTypeInput,
) -> Result<MembershipType> {
  conn.execute(
    "INSERT INTO membership_types (title, price_minor, currency, duration_days, description)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      input.title,
      input.price.minor(),
      input.price.currency().as_ref(),
      input.duration_days,
      input.description,
    ],
  )?;
  Ok(MembershipType {
    id:            conn.last_insert_rowid(),
    title:         input.title,
    price:         input.price,
    duration_days: input.duration_days,
    description:   input.description,
  })
}

pub fn update_membership_type(
  conn: &Connection,
  id: i64,
  input: MembershipTypeInput,
) -> Result<MembershipType> {
  let changed = conn.execute(
    "UPDATE membership_types
     SET title = ?1, price_minor = ?2, currency = ?3, duration_days = ?4, description = ?5
     WHERE id_membership_type = ?6",
    params![
      input.title,
      input.price.minor(),
      input.price.currency().as_ref(),
      input.duration_days,
      input.description,
      id,
    ],
  )?;
  if changed == 0 {
    return Err(not_found(Entity::MembershipType, id));
  }
  Ok(MembershipType {
    id,
    title: input.title,
    price: input.price,
    duration_days: input.duration_days,
    description: input.description,
  })
}

pub fn delete_membership_type(conn: &mut Connection, id: i64) -> Result<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let sql = "SELECT EXISTS(SELECT 1 FROM membership_types WHERE id_membership_type = ?1)";
  if !exists(&tx, sql, id)? {
    return Err(not_found(Entity::MembershipType, id));
  }
  let sql = "SELECT EXISTS(SELECT 1 FROM memberships WHERE id_membership_type = ?1)";
  if exists(&tx, sql, id)? {
    return Err(gym_core::Error::InUse(Entity::MembershipType, id).into());
  }

  tx.execute(
    "DELETE FROM membership_types WHERE id_membership_type = ?1",
    params![id],
  )?;
  tx.commit()?;
  Ok(())
}

// ─── Trainers ────────────────────────────────────────────────────────────────

const TRAINER_FROM: &str = "FROM trainers t JOIN contacts ct ON ct.id_contact = t.id_contact";

pub fn list_trainers(conn: &Connection) -> Result<Vec<Trainer>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {TRAINER_COLUMNS} {TRAINER_FROM} ORDER BY t.surname, t.name, t.id_trainer"
  ))?;
  let raws = stmt
    .query_map([], RawTrainer::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawTrainer::into_trainer).collect()
}

pub fn get_trainer(conn: &Connection, id: i64) -> Result<Option<Trainer>> {
  let raw = conn
    .query_row(
      &format!("SELECT {TRAINER_COLUMNS} {TRAINER_FROM} WHERE t.id_trainer = ?1"),
      params![id],
      RawTrainer::from_row,
    )
    .optional()?;
  raw.map(RawTrainer::into_trainer).transpose()
}

pub fn create_trainer(conn: &mut Connection, input: TrainerInput) -> Result<Trainer> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  if contact_taken(&tx, &input.contact.phone_number, &input.contact.email)? {
    return Err(gym_core::Error::ContactExists.into());
  }

  tx.execute(
    "INSERT INTO contacts (phone_number, email) VALUES (?1, ?2)",
    params![input.contact.phone_number, input.contact.email],
  )?;
  let contact_id = tx.last_insert_rowid();

  tx.execute(
    "INSERT INTO trainers (name, surname, birthday, sex, id_contact)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      input.name,
      input.surname,
      encode_date(input.birthday),
      input.sex.as_ref(),
      contact_id,
    ],
  )?;
  let id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(Trainer {
    id,
    name: input.name,
    surname: input.surname,
    birthday: input.birthday,
    sex: input.sex,
    contact: input.contact,
  })
}

fn trainer_contact(conn: &Connection, id: i64) -> Result<i64> {
  conn
    .query_row(
      "SELECT id_contact FROM trainers WHERE id_trainer = ?1",
      params![id],
      |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| not_found(Entity::Trainer, id))
}

pub fn update_trainer(conn: &mut Connection, id: i64, input: TrainerInput) -> Result<Trainer> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let contact_id = trainer_contact(&tx, id)?;
  let taken: bool = tx.query_row(
    "SELECT EXISTS(SELECT 1 FROM contacts
                   WHERE (phone_number = ?1 OR email = ?2) AND id_contact <> ?3)",
    params![input.contact.phone_number, input.contact.email, contact_id],
    |r| r.get(0),
  )?;
  if taken {
    return Err(gym_core::Error::ContactExists.into());
  }

  tx.execute(
    "UPDATE contacts SET phone_number = ?1, email = ?2 WHERE id_contact = ?3",
    params![input.contact.phone_number, input.contact.email, contact_id],
  )?;
  tx.execute(
    "UPDATE trainers SET name = ?1, surname = ?2, birthday = ?3, sex = ?4
     WHERE id_trainer = ?5",
    params![
      input.name,
      input.surname,
      encode_date(input.birthday),
      input.sex.as_ref(),
      id,
    ],
  )?;
  tx.commit()?;

  Ok(Trainer {
    id,
    name: input.name,
    surname: input.surname,
    birthday: input.birthday,
    sex: input.sex,
    contact: input.contact,
  })
}

pub fn delete_trainer(conn: &mut Connection, id: i64) -> Result<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let contact_id = trainer_contact(&tx, id)?;
  let sql = "SELECT EXISTS(SELECT 1 FROM class_groups WHERE id_trainer = ?1)";
  if exists(&tx, sql, id)? {
    return Err(gym_core::Error::InUse(Entity::Trainer, id).into());
  }

  tx.execute("DELETE FROM trainers WHERE id_trainer = ?1", params![id])?;
  tx.execute("DELETE FROM contacts WHERE id_contact = ?1", params![contact_id])?;
  tx.commit()?;
  Ok(())
}

// ─── Groups ──────────────────────────────────────────────────────────────────

pub fn list_groups(conn: &Connection) -> Result<Vec<Group>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {GROUP_COLUMNS} FROM class_groups ORDER BY id_group"
  ))?;
  let raws = stmt
    .query_map([], RawGroup::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawGroup::into_group).collect()
}

pub fn get_group(conn: &Connection, id: i64) -> Result<Option<Group>> {
  let raw = conn
    .query_row(
      &format!("SELECT {GROUP_COLUMNS} FROM class_groups WHERE id_group = ?1"),
      params![id],
      RawGroup::from_row,
    )
    .optional()?;
  raw.map(RawGroup::into_group).transpose()
}

/// Both ends of a group must exist.
fn check_group_refs(conn: &Connection, input: &GroupInput) -> Result<()> {
  let sql = "SELECT EXISTS(SELECT 1 FROM trainers WHERE id_trainer = ?1)";
  if !exists(conn, sql, input.trainer_id)? {
    return Err(not_found(Entity::Trainer, input.trainer_id));
  }
  if get_gym(conn, input.gym_id)?.is_none() {
    return Err(not_found(Entity::Gym, input.gym_id));
  }
  Ok(())
}

fn enrolled(conn: &Connection, group_id: i64) -> Result<u32> {
  Ok(conn.query_row(
    "SELECT COUNT(*) FROM registered WHERE id_group = ?1",
    params![group_id],
    |r| r.get(0),
  )?)
}

pub fn create_group(conn: &mut Connection, mut input: GroupInput) -> Result<Group> {
  let max_capacity = input.validate()?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  check_group_refs(&tx, &input)?;

  tx.execute(
    "INSERT INTO class_groups
       (id_trainer, id_gym, max_capacity, time_start, time_finish, week_day)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      input.trainer_id,
      input.gym_id,
      max_capacity,
      encode_time(input.time_start),
      encode_time(input.time_finish),
      input.week_day.as_ref(),
    ],
  )?;
  let id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(Group {
    id,
    trainer_id: input.trainer_id,
    gym_id: input.gym_id,
    max_capacity,
    week_day: input.week_day,
    time_start: input.time_start,
    time_finish: input.time_finish,
  })
}

pub fn update_group(conn: &mut Connection, id: i64, mut input: GroupInput) -> Result<Group> {
  let max_capacity = input.validate()?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let sql = "SELECT EXISTS(SELECT 1 FROM class_groups WHERE id_group = ?1)";
  if !exists(&tx, sql, id)? {
    return Err(not_found(Entity::Group, id));
  }
  check_group_refs(&tx, &input)?;

  let taken = enrolled(&tx, id)?;
  if taken > max_capacity {
    return Err(
      gym_core::Error::CapacityBelowEnrolled {
        group_id: id,
        capacity: max_capacity,
        enrolled: taken,
      }
      .into(),
    );
  }

  tx.execute(
    "UPDATE class_groups
     SET id_trainer = ?1, id_gym = ?2, max_capacity = ?3,
         time_start = ?4, time_finish = ?5, week_day = ?6
     WHERE id_group = ?7",
    params![
      input.trainer_id,
      input.gym_id,
      max_capacity,
      encode_time(input.time_start),
      encode_time(input.time_finish),
      input.week_day.as_ref(),
      id,
    ],
  )?;
  tx.commit()?;

  Ok(Group {
    id,
    trainer_id: input.trainer_id,
    gym_id: input.gym_id,
    max_capacity,
    week_day: input.week_day,
    time_start: input.time_start,
    time_finish: input.time_finish,
  })
}

pub fn delete_group(conn: &mut Connection, id: i64) -> Result<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let sql = "SELECT EXISTS(SELECT 1 FROM class_groups WHERE id_group = ?1)";
  if !exists(&tx, sql, id)? {
    return Err(not_found(Entity::Group, id));
  }
  if enrolled(&tx, id)? > 0 {
    return Err(gym_core::Error::InUse(Entity::Group, id).into());
  }

  tx.execute("DELETE FROM class_groups WHERE id_group = ?1", params![id])?;
  tx.commit()?;
  Ok(())
}
