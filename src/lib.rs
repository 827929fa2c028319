//! # Rentals Library
//!
//! Records service for properties, units, tenants and leases: persistence,
//! validation, label derivation, the admin registry and the HTTP API.

pub mod admin;
pub mod auth;
pub mod config;
pub mod cursor;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod money;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub mod validation;
pub use migration;
