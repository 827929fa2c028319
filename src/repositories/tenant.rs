//! # Tenant Repository
//!
//! CRUD for tenants. Deleting a tenant removes the tenant's leases.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{LabelRow, Page, Paged, into_paged, record_created, record_deleted};
use crate::error::RepositoryError;
use crate::models::lease;
use crate::models::tenant::{
    self, ActiveModel as TenantActiveModel, EMAIL_MAX_LENGTH, Entity as Tenant,
    Model as TenantModel, NAME_MAX_LENGTH, PHONE_NUMBER_MAX_LENGTH,
};
use crate::validation::{Validate, ValidationErrors};

/// Create/replace payload for a tenant
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TenantInput {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

impl Validate for TenantInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name, Some(NAME_MAX_LENGTH));
        errors.require_email("email", &self.email, EMAIL_MAX_LENGTH);
        errors.require_text(
            "phone_number",
            &self.phone_number,
            Some(PHONE_NUMBER_MAX_LENGTH),
        );
        errors.into_result()
    }
}

/// Repository for Tenant database operations
pub struct TenantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantRepository<'a> {
    /// Create a new TenantRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new tenant
    pub async fn create(&self, input: TenantInput) -> Result<TenantModel, RepositoryError> {
        input.validate()?;

        let tenant = TenantActiveModel {
            name: Set(input.name.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            phone_number: Set(input.phone_number.trim().to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        record_created("tenant");
        tracing::info!(tenant_id = tenant.id, "Tenant created");
        Ok(tenant)
    }

    /// Get tenant by ID
    pub async fn find(&self, id: i32) -> Result<Option<TenantModel>, RepositoryError> {
        Ok(Tenant::find_by_id(id).one(self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<TenantModel, RepositoryError> {
        self.find(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("tenant", id))
    }

    /// List tenants in id order
    pub async fn list(&self, page: Page) -> Result<Paged<TenantModel>, RepositoryError> {
        let mut query = Tenant::find();

        if let Some(after) = page.after_id {
            query = query.filter(tenant::Column::Id.gt(after));
        }

        let rows = query
            .order_by_asc(tenant::Column::Id)
            .limit(page.fetch_limit())
            .all(self.db)
            .await?;

        Ok(into_paged(rows, &page, |t| t.id))
    }

    /// Replace every field of an existing tenant
    pub async fn update(&self, id: i32, input: TenantInput) -> Result<TenantModel, RepositoryError> {
        input.validate()?;

        let mut active = self.get(id).await?.into_active_model();
        active.name = Set(input.name.trim().to_string());
        active.email = Set(input.email.trim().to_string());
        active.phone_number = Set(input.phone_number.trim().to_string());

        Ok(active.update(self.db).await?)
    }

    /// Delete a tenant together with the tenant's leases
    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let tenant = Tenant::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("tenant", id))?;

        let leases = lease::Entity::delete_many()
            .filter(lease::Column::TenantId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        tenant.delete(&txn).await?;
        txn.commit().await?;

        record_deleted("lease", leases);
        record_deleted("tenant", 1);
        tracing::info!(tenant_id = id, leases_removed = leases, "Tenant deleted");
        Ok(())
    }

    pub async fn label_for(&self, id: i32) -> Result<String, RepositoryError> {
        Ok(self.get(id).await?.label())
    }

    pub async fn labels(&self, page: Page) -> Result<Paged<LabelRow>, RepositoryError> {
        let rows = self.list(page).await?;
        Ok(rows.map(|t| LabelRow {
            id: t.id,
            label: t.label(),
        }))
    }
}
