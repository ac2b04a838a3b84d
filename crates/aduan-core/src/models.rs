//! Domain models for Aduan.
//!
//! These are the core types shared across all crates.

pub mod comment;
pub mod complaint;
pub mod identity;
pub mod notification;
pub mod response;
pub mod settings;
pub mod stats;
pub mod user;
