//! # Lease Repository
//!
//! CRUD for leases. A lease is returned with its tenant and unit, which its
//! label needs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, LoaderTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{
    LabelRow, Page, Paged, UnitRecord, UnitRepository, into_paged, missing_parent,
    record_created, record_deleted,
};
use crate::error::RepositoryError;
use crate::models::lease::{
    self, ActiveModel as LeaseActiveModel, Entity as Lease, Model as LeaseModel,
};
use crate::models::{property, tenant, unit};
use crate::money;
use crate::validation::{INVALID_CHOICE_MESSAGE, Validate, ValidationErrors};

/// Create/replace payload for a lease
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeaseInput {
    pub tenant_id: i32,
    pub unit_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = String, example = "1450.00")]
    pub rent_amount: Decimal,
}

impl Validate for LeaseInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_money("rent_amount", &self.rent_amount);
        errors.into_result()
    }
}

/// Optional filters for listing leases
#[derive(Debug, Clone, Default)]
pub struct LeaseFilter {
    pub tenant_id: Option<i32>,
    pub unit_id: Option<i32>,
}

/// A lease with its tenant and its unit (with the unit's property).
#[derive(Debug, Clone, PartialEq)]
pub struct LeaseRecord {
    pub lease: LeaseModel,
    pub tenant: tenant::Model,
    pub unit: UnitRecord,
}

impl LeaseRecord {
    pub fn label(&self) -> String {
        self.lease.label(&self.tenant, &self.unit.unit)
    }
}

/// Repository for Lease database operations
pub struct LeaseRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LeaseRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates the payload and resolves both parents, reporting every problem together.
    async fn check(
        &self,
        input: &LeaseInput,
    ) -> Result<(tenant::Model, UnitRecord), RepositoryError> {
        let mut errors = input.validate().err().unwrap_or_default();

        let tenant = tenant::Entity::find_by_id(input.tenant_id)
            .one(self.db)
            .await?;
        if tenant.is_none() {
            errors.add("tenant_id", INVALID_CHOICE_MESSAGE);
        }

        let unit = UnitRepository::new(self.db).find(input.unit_id).await?;
        if unit.is_none() {
            errors.add("unit_id", INVALID_CHOICE_MESSAGE);
        }

        errors.into_result()?;
        Ok((
            missing_parent(tenant, "tenant", input.tenant_id)?,
            missing_parent(unit, "unit", input.unit_id)?,
        ))
    }

    pub async fn create(&self, input: LeaseInput) -> Result<LeaseRecord, RepositoryError> {
        let (tenant, unit) = self.check(&input).await?;

        let lease = LeaseActiveModel {
            tenant_id: Set(input.tenant_id),
            unit_id: Set(input.unit_id),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            rent_amount: Set(money::normalize(input.rent_amount)),
            ..Default::default()
        }
        .insert(self.db)
        .await?
        .normalized();

        record_created("lease");
        tracing::info!(
            lease_id = lease.id,
            tenant_id = tenant.id,
            unit_id = unit.unit.id,
            "Lease created"
        );
        Ok(LeaseRecord {
            lease,
            tenant,
            unit,
        })
    }

    pub async fn find(&self, id: i32) -> Result<Option<LeaseRecord>, RepositoryError> {
        let records = self.load(Lease::find_by_id(id).all(self.db).await?).await?;
        Ok(records.into_iter().next())
    }

    pub async fn get(&self, id: i32) -> Result<LeaseRecord, RepositoryError> {
        self.find(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("lease", id))
    }

    pub async fn list(
        &self,
        filter: &LeaseFilter,
        page: Page,
    ) -> Result<Paged<LeaseRecord>, RepositoryError> {
        let mut query = Lease::find();

        if let Some(tenant_id) = filter.tenant_id {
            query = query.filter(lease::Column::TenantId.eq(tenant_id));
        }

        if let Some(unit_id) = filter.unit_id {
            query = query.filter(lease::Column::UnitId.eq(unit_id));
        }

        if let Some(after) = page.after_id {
            query = query.filter(lease::Column::Id.gt(after));
        }

        let rows = query
            .order_by_asc(lease::Column::Id)
            .limit(page.fetch_limit())
            .all(self.db)
            .await?;

        let records = self.load(rows).await?;
        Ok(into_paged(records, &page, |r| r.lease.id))
    }

    /// Attaches tenant, unit and the unit's property to each lease, keeping the input order.
    async fn load(&self, rows: Vec<LeaseModel>) -> Result<Vec<LeaseRecord>, RepositoryError> {
        let tenants = rows.load_one(tenant::Entity, self.db).await?;
        let units = rows
            .load_one(unit::Entity, self.db)
            .await?
            .into_iter()
            .zip(&rows)
            .map(|(unit, lease)| missing_parent(unit, "unit", lease.unit_id))
            .collect::<Result<Vec<_>, _>>()?;
        let properties = units.load_one(property::Entity, self.db).await?;

        rows.into_iter()
            .zip(tenants)
            .zip(units.into_iter().zip(properties))
            .map(
                |((lease, tenant), (unit, property))| -> Result<LeaseRecord, RepositoryError> {
                    Ok(LeaseRecord {
                        tenant: missing_parent(tenant, "tenant", lease.tenant_id)?,
                        unit: UnitRecord {
                            property: missing_parent(property, "property", unit.property_id)?,
                            unit: unit.normalized(),
                        },
                        lease: lease.normalized(),
                    })
                },
            )
            .collect()
    }

    /// Replaces every field of an existing lease.
    pub async fn update(&self, id: i32, input: LeaseInput) -> Result<LeaseRecord, RepositoryError> {
        let existing = Lease::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("lease", id))?;
        let (tenant, unit) = self.check(&input).await?;

        let mut active = existing.into_active_model();
        active.tenant_id = Set(input.tenant_id);
        active.unit_id = Set(input.unit_id);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.rent_amount = Set(money::normalize(input.rent_amount));

        let lease = active.update(self.db).await?.normalized();
        Ok(LeaseRecord {
            lease,
            tenant,
            unit,
        })
    }

    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = Lease::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("lease", id));
        }

        record_deleted("lease", 1);
        tracing::info!(lease_id = id, "Lease deleted");
        Ok(())
    }

    pub async fn label_for(&self, id: i32) -> Result<String, RepositoryError> {
        Ok(self.get(id).await?.label())
    }

    pub async fn labels(&self, page: Page) -> Result<Paged<LabelRow>, RepositoryError> {
        let rows = self.list(&LeaseFilter::default(), page).await?;
        Ok(rows.map(|r| LabelRow {
            id: r.lease.id,
            label: r.label(),
        }))
    }
}
