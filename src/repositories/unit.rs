//! # Unit Repository
//!
//! CRUD for units. Every unit is returned together with its property, which
//! its label needs. Deleting a unit removes its leases.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, LoaderTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{
    LabelRow, Page, Paged, into_paged, missing_parent, record_created, record_deleted,
};
use crate::error::RepositoryError;
use crate::money;
use crate::models::unit::{
    self, ActiveModel as UnitActiveModel, Entity as Unit, Model as UnitModel,
    UNIT_NUMBER_MAX_LENGTH,
};
use crate::models::{lease, property};
use crate::validation::{INVALID_CHOICE_MESSAGE, Validate, ValidationErrors};

/// Create/replace payload for a unit
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UnitInput {
    pub property_id: i32,
    pub unit_number: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[schema(value_type = String, example = "1500.00")]
    pub rent: Decimal,
    /// Defaults to `true` when omitted
    #[serde(default)]
    pub is_available: Option<bool>,
}

impl Validate for UnitInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("unit_number", &self.unit_number, Some(UNIT_NUMBER_MAX_LENGTH));
        errors.require_money("rent", &self.rent);
        errors.into_result()
    }
}

/// Optional filters for listing units
#[derive(Debug, Clone, Default)]
pub struct UnitFilter {
    pub property_id: Option<i32>,
    pub is_available: Option<bool>,
}

/// A unit with the property it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRecord {
    pub unit: UnitModel,
    pub property: property::Model,
}

impl UnitRecord {
    pub fn label(&self) -> String {
        self.unit.label(&self.property)
    }
}

/// Repository for Unit database operations
pub struct UnitRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UnitRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates the payload and resolves its property, reporting every problem together.
    async fn check(&self, input: &UnitInput) -> Result<property::Model, RepositoryError> {
        let mut errors = input.validate().err().unwrap_or_default();

        let parent = property::Entity::find_by_id(input.property_id)
            .one(self.db)
            .await?;
        if parent.is_none() {
            errors.add("property_id", INVALID_CHOICE_MESSAGE);
        }

        errors.into_result()?;
        missing_parent(parent, "property", input.property_id)
    }

    pub async fn create(&self, input: UnitInput) -> Result<UnitRecord, RepositoryError> {
        let property = self.check(&input).await?;

        let unit = UnitActiveModel {
            property_id: Set(input.property_id),
            unit_number: Set(input.unit_number.trim().to_string()),
            bedrooms: Set(input.bedrooms),
            bathrooms: Set(input.bathrooms),
            rent: Set(money::normalize(input.rent)),
            is_available: Set(input.is_available.unwrap_or(true)),
            ..Default::default()
        }
        .insert(self.db)
        .await?
        .normalized();

        record_created("unit");
        tracing::info!(unit_id = unit.id, property_id = property.id, "Unit created");
        Ok(UnitRecord { unit, property })
    }

    pub async fn find(&self, id: i32) -> Result<Option<UnitRecord>, RepositoryError> {
        let Some((unit, property)) = Unit::find_by_id(id)
            .find_also_related(property::Entity)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let property = missing_parent(property, "property", unit.property_id)?;
        Ok(Some(UnitRecord {
            unit: unit.normalized(),
            property,
        }))
    }

    pub async fn get(&self, id: i32) -> Result<UnitRecord, RepositoryError> {
        self.find(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("unit", id))
    }

    pub async fn list(
        &self,
        filter: &UnitFilter,
        page: Page,
    ) -> Result<Paged<UnitRecord>, RepositoryError> {
        let mut query = Unit::find();

        if let Some(property_id) = filter.property_id {
            query = query.filter(unit::Column::PropertyId.eq(property_id));
        }

        if let Some(available) = filter.is_available {
            query = query.filter(unit::Column::IsAvailable.eq(available));
        }

        if let Some(after) = page.after_id {
            query = query.filter(unit::Column::Id.gt(after));
        }

        let rows = query
            .order_by_asc(unit::Column::Id)
            .limit(page.fetch_limit())
            .all(self.db)
            .await?;
        let properties = rows.load_one(property::Entity, self.db).await?;

        let records = rows
            .into_iter()
            .zip(properties)
            .map(|(unit, property)| -> Result<UnitRecord, RepositoryError> {
                let property = missing_parent(property, "property", unit.property_id)?;
                Ok(UnitRecord {
                    unit: unit.normalized(),
                    property,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(into_paged(records, &page, |r| r.unit.id))
    }

    /// Replaces every field of an existing unit, including its property.
    pub async fn update(&self, id: i32, input: UnitInput) -> Result<UnitRecord, RepositoryError> {
        let existing = Unit::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("unit", id))?;
        let property = self.check(&input).await?;

        let mut active = existing.into_active_model();
        active.property_id = Set(input.property_id);
        active.unit_number = Set(input.unit_number.trim().to_string());
        active.bedrooms = Set(input.bedrooms);
        active.bathrooms = Set(input.bathrooms);
        active.rent = Set(money::normalize(input.rent));
        active.is_available = Set(input.is_available.unwrap_or(true));

        let unit = active.update(self.db).await?.normalized();
        Ok(UnitRecord { unit, property })
    }

    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let unit = Unit::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("unit", id))?;

        let leases = lease::Entity::delete_many()
            .filter(lease::Column::UnitId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        unit.delete(&txn).await?;
        txn.commit().await?;

        record_deleted("lease", leases);
        record_deleted("unit", 1);
        tracing::info!(unit_id = id, leases_removed = leases, "Unit deleted");
        Ok(())
    }

    pub async fn label_for(&self, id: i32) -> Result<String, RepositoryError> {
        Ok(self.get(id).await?.label())
    }

    pub async fn labels(&self, page: Page) -> Result<Paged<LabelRow>, RepositoryError> {
        let rows = self.list(&UnitFilter::default(), page).await?;
        Ok(rows.map(|r| LabelRow {
            id: r.unit.id,
            label: r.label(),
        }))
    }
}
