//! # Data Models
//!
//! SeaORM entities for the rental records: properties, their units,
//! tenants, and the leases binding a tenant to a unit.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod lease;
pub mod property;
pub mod tenant;
pub mod unit;

pub use lease::Entity as Lease;
pub use property::{Entity as Property, PropertyType};
pub use tenant::Entity as Tenant;
pub use unit::Entity as Unit;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "rentals".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
