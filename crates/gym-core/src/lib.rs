//! Core types and trait definitions for the gym backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Business rules that do not need storage (pricing, seat checks, signup
//! validation) live here; the transactional parts are implemented by the
//! storage backend against the [`store::GymStore`] trait.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod client;
pub mod enrollment;
pub mod error;
pub mod membership;
pub mod money;
pub mod signup;
pub mod store;

pub use error::{Entity, Error, ErrorKind, Result, ValidationError};
