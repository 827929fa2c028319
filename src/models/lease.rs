//! Lease entity model
//!
//! Binds one tenant to one unit for a date range at a rent fixed at signing.
//! The lease is removed when either its tenant or its unit is removed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::money;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub tenant_id: i32,

    pub unit_id: i32,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    /// Rate locked in at signing, independent of the unit's current rent
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub rent_amount: Decimal,
}

impl Model {
    /// `"Lease for {tenant name} - {unit number}"`
    pub fn label(&self, tenant: &super::tenant::Model, unit: &super::unit::Model) -> String {
        debug_assert_eq!(self.tenant_id, tenant.id);
        debug_assert_eq!(self.unit_id, unit.id);
        label(&tenant.name, &unit.unit_number)
    }

    /// Restores the two-decimal scale of `rent_amount` after a load.
    pub fn normalized(mut self) -> Self {
        self.rent_amount = money::normalize(self.rent_amount);
        self
    }
}

/// Builds a lease label from its parts.
pub fn label(tenant_name: &str, unit_number: &str) -> String {
    format!("Lease for {tenant_name} - {unit_number}")
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,

    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id",
        on_delete = "Cascade"
    )]
    Unit,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{tenant, unit};
    use std::str::FromStr;

    #[test]
    fn test_lease_label_uses_tenant_name_and_unit_number() {
        let tenant = tenant::Model {
            id: 5,
            name: "J. Rivera".to_string(),
            email: "j.rivera@example.com".to_string(),
            phone_number: "555-0100".to_string(),
        };
        let unit = unit::Model {
            id: 9,
            property_id: 1,
            unit_number: "12".to_string(),
            bedrooms: 1,
            bathrooms: 1,
            rent: Decimal::from_str("1200.00").unwrap(),
            is_available: false,
        };
        let lease = Model {
            id: 1,
            tenant_id: 5,
            unit_id: 9,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            rent_amount: Decimal::from_str("1150.00").unwrap(),
        };

        assert_eq!(lease.label(&tenant, &unit), "Lease for J. Rivera - 12");
        assert_eq!(label("J. Rivera", "12"), "Lease for J. Rivera - 12");
    }
}
