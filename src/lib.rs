//! Batch loader for Valorant esports CSV exports into a normalized Postgres
//! store.
//!
//! The pipeline per dataset: canonicalize names ([`normalization`]) →
//! resolve entities to surrogate ids ([`resolve`]) → parse semi-structured
//! numeric fields with per-field fault tolerance ([`parse`]) → write fact
//! rows under a per-table conflict policy inside one all-or-nothing
//! transaction ([`load`]).

pub mod db;
pub mod error;
pub mod load;
pub mod normalization;
pub mod parse;
pub mod records;
pub mod resolve;
pub mod util;

pub use db::Db;
pub use error::LoadError;
pub use load::{LoadReport, StatWindow};
