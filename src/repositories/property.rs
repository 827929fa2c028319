//! # Property Repository
//!
//! CRUD for properties. Deleting a property removes its units and every
//! lease on those units in one transaction.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{LabelRow, Page, Paged, into_paged, record_created, record_deleted};
use crate::error::RepositoryError;
use crate::models::property::{
    self, ADDRESS_MAX_LENGTH, ActiveModel as PropertyActiveModel, Entity as Property,
    Model as PropertyModel, NAME_MAX_LENGTH, PropertyType,
};
use crate::models::{lease, unit};
use crate::validation::{Validate, ValidationErrors};

/// Create/replace payload for a property
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PropertyInput {
    pub name: String,
    pub address: String,
    pub property_type: PropertyType,
    pub description: String,
    pub number_of_units: i32,
}

impl Validate for PropertyInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name, Some(NAME_MAX_LENGTH));
        errors.require_text("address", &self.address, Some(ADDRESS_MAX_LENGTH));
        errors.require_text("description", &self.description, None);
        errors.into_result()
    }
}

/// Optional filters for listing properties
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub property_type: Option<PropertyType>,
}

/// Repository for Property database operations
pub struct PropertyRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PropertyRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: PropertyInput) -> Result<PropertyModel, RepositoryError> {
        input.validate()?;

        let property = PropertyActiveModel {
            name: Set(input.name.trim().to_string()),
            address: Set(input.address.trim().to_string()),
            property_type: Set(input.property_type),
            description: Set(input.description.trim().to_string()),
            number_of_units: Set(input.number_of_units),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        record_created("property");
        tracing::info!(property_id = property.id, "Property created");
        Ok(property)
    }

    pub async fn find(&self, id: i32) -> Result<Option<PropertyModel>, RepositoryError> {
        Ok(Property::find_by_id(id).one(self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<PropertyModel, RepositoryError> {
        self.find(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("property", id))
    }

    pub async fn list(
        &self,
        filter: &PropertyFilter,
        page: Page,
    ) -> Result<Paged<PropertyModel>, RepositoryError> {
        let mut query = Property::find();

        if let Some(kind) = filter.property_type {
            query = query.filter(property::Column::PropertyType.eq(kind));
        }

        if let Some(after) = page.after_id {
            query = query.filter(property::Column::Id.gt(after));
        }

        let rows = query
            .order_by_asc(property::Column::Id)
            .limit(page.fetch_limit())
            .all(self.db)
            .await?;

        Ok(into_paged(rows, &page, |p| p.id))
    }

    /// Replaces every field of an existing property.
    pub async fn update(
        &self,
        id: i32,
        input: PropertyInput,
    ) -> Result<PropertyModel, RepositoryError> {
        input.validate()?;

        let mut active = self.get(id).await?.into_active_model();
        active.name = Set(input.name.trim().to_string());
        active.address = Set(input.address.trim().to_string());
        active.property_type = Set(input.property_type);
        active.description = Set(input.description.trim().to_string());
        active.number_of_units = Set(input.number_of_units);

        Ok(active.update(self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let property = Property::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("property", id))?;

        let unit_ids = unit::Entity::find()
            .select_only()
            .column(unit::Column::Id)
            .filter(unit::Column::PropertyId.eq(id))
            .into_query();

        let leases = lease::Entity::delete_many()
            .filter(lease::Column::UnitId.in_subquery(unit_ids))
            .exec(&txn)
            .await?
            .rows_affected;

        let units = unit::Entity::delete_many()
            .filter(unit::Column::PropertyId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        property.delete(&txn).await?;
        txn.commit().await?;

        record_deleted("lease", leases);
        record_deleted("unit", units);
        record_deleted("property", 1);
        tracing::info!(
            property_id = id,
            units_removed = units,
            leases_removed = leases,
            "Property deleted"
        );
        Ok(())
    }

    pub async fn label_for(&self, id: i32) -> Result<String, RepositoryError> {
        Ok(self.get(id).await?.label())
    }

    pub async fn labels(&self, page: Page) -> Result<Paged<LabelRow>, RepositoryError> {
        let rows = self.list(&PropertyFilter::default(), page).await?;
        Ok(rows.map(|p| LabelRow {
            id: p.id,
            label: p.label(),
        }))
    }
}
