//! Conduit - domain core for a social blogging platform
//!
//! Users write articles, tag them, comment on them, favorite them, and
//! follow other users. This crate holds the business rules; the web layer
//! and token handling live elsewhere.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod validation;
