//! First-start data: an admin account, default membership types and gyms.
//!
//! Each part is skipped when the store already has rows of that kind.

use chrono::NaiveDate;
use gym_core::{
  catalog::{GymInput, MembershipTypeInput},
  client::{Contact, NewClient, Sex},
  money::{Currency, Money},
  store::{GymStore, StoreError},
};

use crate::{ServerConfig, credential, error::Error};

/// Password used for the seeded admin when no hash is configured.
const FALLBACK_ADMIN_PASSWORD: &str = "admin123";

const MEMBERSHIP_TYPES: &[(&str, i64, &str)] = &[
  ("Basic", 30_000, "Gym floor access"),
  ("Standard", 50_000, "Gym floor and group classes"),
  ("Premium", 80_000, "Unlimited access including sauna"),
];

const GYMS: &[(&str, &str, &str, &str)] = &[
  ("Brno", "60200", "Ceska", "1"),
  ("Brno", "61200", "Kolejni", "2"),
];

pub async fn seed<S: GymStore>(store: &S, config: &ServerConfig) -> Result<(), Error> {
  seed_admin(store, config).await?;

  if store.list_membership_types().await.map_err(Error::store)?.is_empty() {
    for (title, price, description) in MEMBERSHIP_TYPES {
      store
        .create_membership_type(MembershipTypeInput {
          title:         (*title).to_owned(),
          price:         Money::from_minor(*price, Currency::Czk),
          duration_days: 30,
          description:   (*description).to_owned(),
        })
        .await
        .map_err(Error::store)?;
    }
    tracing::info!(count = MEMBERSHIP_TYPES.len(), "seeded membership types");
  }

  if store.list_gyms().await.map_err(Error::store)?.is_empty() {
    for (city, postcode, street, building) in GYMS {
      store
        .create_gym(GymInput {
          country:  "Czech Republic".to_owned(),
          city:     (*city).to_owned(),
          postcode: (*postcode).to_owned(),
          street:   (*street).to_owned(),
          building: (*building).to_owned(),
        })
        .await
        .map_err(Error::store)?;
    }
    tracing::info!(count = GYMS.len(), "seeded gyms");
  }

  Ok(())
}

async fn seed_admin<S: GymStore>(store: &S, config: &ServerConfig) -> Result<(), Error> {
  if store.has_admin().await.map_err(Error::store)? {
    return Ok(());
  }

  let password_hash = match &config.admin_password_hash {
    Some(hash) => hash.clone(),
    None => {
      tracing::warn!(
        email = %config.admin_email,
        "no admin_password_hash configured; seeding admin with the default password"
      );
      credential::hash(Some(FALLBACK_ADMIN_PASSWORD))?
    }
  };

  let admin = NewClient {
    name:     "Admin".to_owned(),
    surname:  "Admin".to_owned(),
    birthday: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
    sex:      Sex::O,
    contact:  Contact {
      phone_number: config.admin_phone.clone(),
      email:        config.admin_email.clone(),
    },
    is_admin: true,
  };

  match store.register_client(admin, password_hash).await {
    Ok(client) => {
      tracing::info!(client_id = client.id, email = %config.admin_email, "seeded admin");
      Ok(())
    }
    Err(e) if matches!(e.domain(), Some(gym_core::Error::ContactExists)) => {
      tracing::warn!(
        email = %config.admin_email,
        "admin contact already belongs to a non-admin client; no admin seeded"
      );
      Ok(())
    }
    Err(e) => Err(Error::store(e)),
  }
}
