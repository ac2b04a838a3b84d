//! Aduan Core: domain models, error taxonomy, repository traits and the
//! access policy shared by every other crate.

pub mod error;
pub mod models;
pub mod notifier;
pub mod policy;
pub mod repository;
