//! Database layer
//!
//! SQLite-backed persistence for the domain core. The service layer never
//! touches this module directly except through the repository traits in
//! [`repositories`].

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
