//! Test utilities for database testing.
//!
//! In-memory SQLite databases with migrations applied, plus fixture helpers
//! that go through the repositories.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use rentals::admin::default_site;
use rentals::config::AppConfig;
use rentals::models::PropertyType;
use rentals::models::{property, tenant};
use rentals::repositories::{
    LeaseInput, LeaseRecord, LeaseRepository, PropertyInput, PropertyRepository, TenantInput,
    TenantRepository, UnitInput, UnitRecord, UnitRepository,
};
use rentals::server::AppState;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub const TEST_TOKEN: &str = "test-operator-token";

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool holds a single connection: every connection to `sqlite::memory:`
/// opens its own empty database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        operator_tokens: vec![TEST_TOKEN.to_string()],
        ..Default::default()
    }
}

pub async fn test_state() -> Result<AppState> {
    Ok(AppState {
        config: Arc::new(test_config()),
        db: setup_test_db().await?,
        admin: Arc::new(default_site()?),
    })
}

pub fn money(value: &str) -> Decimal {
    Decimal::from_str(value).expect("valid decimal literal")
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date literal")
}

pub async fn create_property(db: &DatabaseConnection, name: &str) -> Result<property::Model> {
    Ok(PropertyRepository::new(db)
        .create(PropertyInput {
            name: name.to_string(),
            address: format!("{name} Street 1"),
            property_type: PropertyType::Apartment,
            description: "Test property".to_string(),
            number_of_units: 4,
        })
        .await?)
}

pub async fn create_unit(
    db: &DatabaseConnection,
    property_id: i32,
    unit_number: &str,
    rent: &str,
) -> Result<UnitRecord> {
    Ok(UnitRepository::new(db)
        .create(UnitInput {
            property_id,
            unit_number: unit_number.to_string(),
            bedrooms: 2,
            bathrooms: 1,
            rent: money(rent),
            is_available: None,
        })
        .await?)
}

pub async fn create_tenant(db: &DatabaseConnection, name: &str) -> Result<tenant::Model> {
    let local = name.to_lowercase().replace(' ', ".");
    Ok(TenantRepository::new(db)
        .create(TenantInput {
            name: name.to_string(),
            email: format!("{local}@example.com"),
            phone_number: "555-0100".to_string(),
        })
        .await?)
}

pub async fn create_lease(
    db: &DatabaseConnection,
    tenant_id: i32,
    unit_id: i32,
    rent_amount: &str,
) -> Result<LeaseRecord> {
    Ok(LeaseRepository::new(db)
        .create(LeaseInput {
            tenant_id,
            unit_id,
            start_date: date("2026-01-01"),
            end_date: date("2026-12-31"),
            rent_amount: money(rent_amount),
        })
        .await?)
}
