//! Unit entity model
//!
//! An individually rentable subdivision of a property.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::money;

pub const UNIT_NUMBER_MAX_LENGTH: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub property_id: i32,

    /// Identifier within the property; not unique
    pub unit_number: String,

    pub bedrooms: i32,

    pub bathrooms: i32,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub rent: Decimal,

    pub is_available: bool,
}

impl Model {
    /// `"Unit {unit_number} - {property name}"`
    pub fn label(&self, property: &super::property::Model) -> String {
        label(&self.unit_number, &property.name)
    }

    /// Restores the two-decimal scale of `rent` after a load.
    pub fn normalized(mut self) -> Self {
        self.rent = money::normalize(self.rent);
        self
    }
}

/// Builds a unit label from its parts.
pub fn label(unit_number: &str, property_name: &str) -> String {
    format!("Unit {unit_number} - {property_name}")
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,

    #[sea_orm(has_many = "super::lease::Entity")]
    Leases,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::lease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
