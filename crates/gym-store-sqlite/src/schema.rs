//! SQL schema for the gym SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

use rusqlite::{Connection, functions::FunctionFlags};

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contacts (
    id_contact    INTEGER PRIMARY KEY AUTOINCREMENT,
    phone_number  TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE
);

CREATE TABLE IF NOT EXISTS clients (
    id_client     INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    surname       TEXT    NOT NULL,
    birthday      TEXT    NOT NULL,             -- YYYY-MM-DD
    sex           TEXT    NOT NULL,             -- 'M' | 'F' | 'O'
    discount_bp   INTEGER NOT NULL DEFAULT 0    -- basis points, 10000 = 100 %
                  CHECK (discount_bp BETWEEN 0 AND 10000),
    id_contact    INTEGER NOT NULL UNIQUE REFERENCES contacts(id_contact),
    is_admin      INTEGER NOT NULL DEFAULT 0
);

-- One credential per client; never updated.
CREATE TABLE IF NOT EXISTS passwords (
    id_password   INTEGER PRIMARY KEY AUTOINCREMENT,
    id_client     INTEGER NOT NULL UNIQUE REFERENCES clients(id_client),
    password_hash TEXT    NOT NULL,             -- argon2 PHC string
    created_at    TEXT    NOT NULL              -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS trainers (
    id_trainer    INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    surname       TEXT    NOT NULL,
    birthday      TEXT    NOT NULL,
    sex           TEXT    NOT NULL,
    id_contact    INTEGER NOT NULL UNIQUE REFERENCES contacts(id_contact)
);

CREATE TABLE IF NOT EXISTS gyms (
    id_gym        INTEGER PRIMARY KEY AUTOINCREMENT,
    country       TEXT NOT NULL,
    city          TEXT NOT NULL,
    postcode      TEXT NOT NULL,
    street        TEXT NOT NULL,
    building      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS class_groups (
    id_group      INTEGER PRIMARY KEY AUTOINCREMENT,
    id_trainer    INTEGER NOT NULL REFERENCES trainers(id_trainer),
    id_gym        INTEGER NOT NULL REFERENCES gyms(id_gym),
    max_capacity  INTEGER NOT NULL CHECK (max_capacity > 0),
    time_start    TEXT    NOT NULL,             -- HH:MM:SS
    time_finish   TEXT    NOT NULL,
    week_day      TEXT    NOT NULL,             -- 'Monday' .. 'Sunday'
    CHECK (time_start < time_finish)
);

CREATE TABLE IF NOT EXISTS registered (
    id_registered INTEGER PRIMARY KEY AUTOINCREMENT,
    id_group      INTEGER NOT NULL REFERENCES class_groups(id_group),
    id_client     INTEGER NOT NULL REFERENCES clients(id_client),
    UNIQUE (id_group, id_client)
);

CREATE TABLE IF NOT EXISTS membership_types (
    id_membership_type INTEGER PRIMARY KEY AUTOINCREMENT,
    title              TEXT    NOT NULL,
    price_minor        INTEGER NOT NULL CHECK (price_minor >= 0),
    currency           TEXT    NOT NULL,        -- 'CZK' | 'EUR'
    duration_days      INTEGER NOT NULL CHECK (duration_days > 0),
    description        TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS memberships (
    id_membership      INTEGER PRIMARY KEY AUTOINCREMENT,
    id_client          INTEGER NOT NULL REFERENCES clients(id_client),
    id_membership_type INTEGER NOT NULL REFERENCES membership_types(id_membership_type),
    id_gym             INTEGER NOT NULL REFERENCES gyms(id_gym),
    membership_status  TEXT    NOT NULL,        -- 'Active' | 'Suspended' | 'Cancelled'
    membership_start   TEXT    NOT NULL,
    membership_stop    TEXT    NOT NULL
);

-- Memberships are never deleted; at most one active row per client.
CREATE UNIQUE INDEX IF NOT EXISTS memberships_one_active_idx
    ON memberships(id_client) WHERE membership_status = 'Active';

CREATE TABLE IF NOT EXISTS payments (
    id_payment     INTEGER PRIMARY KEY AUTOINCREMENT,
    id_membership  INTEGER NOT NULL REFERENCES memberships(id_membership),
    payment_status TEXT    NOT NULL,            -- 'Pending' | 'Successful' | 'Failed'
    amount_minor   INTEGER NOT NULL,
    currency       TEXT    NOT NULL,
    date_creation  TEXT    NOT NULL,
    date_payment   TEXT    NOT NULL,
    date_due_date  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS memberships_client_idx ON memberships(id_client);
CREATE INDEX IF NOT EXISTS payments_membership_idx ON payments(id_membership);
CREATE INDEX IF NOT EXISTS registered_client_idx  ON registered(id_client);

PRAGMA user_version = 1;
";

/// Register the scalar functions the queries rely on.
///
/// `fold(text)` lower-cases with full Unicode case mapping; the built-in
/// `lower()` and `LIKE` only fold ASCII.
pub fn install_functions(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "fold",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
  )
}
