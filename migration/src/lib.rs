//! Database migrations for the rentals service.
//!
//! Creates the four record tables. Foreign keys cascade on delete so that
//! units follow their property and leases follow their tenant and unit.

pub use sea_orm_migration::prelude::*;

mod m2026_01_05_090000_create_properties;
mod m2026_01_05_090100_create_units;
mod m2026_01_05_090200_create_tenants;
mod m2026_01_05_090300_create_leases;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2026_01_05_090000_create_properties::Migration),
            Box::new(m2026_01_05_090100_create_units::Migration),
            Box::new(m2026_01_05_090200_create_tenants::Migration),
            Box::new(m2026_01_05_090300_create_leases::Migration),
        ]
    }
}
