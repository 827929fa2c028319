//! Administrative registry
//!
//! The record types an operator can manage, with the form schema an admin
//! interface renders for each and a source of `{id, label}` rows for list
//! views and relational pickers. The site is assembled explicitly at startup
//! with [`default_site`]; nothing is discovered implicitly.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::RepositoryError;
use crate::models::{property, tenant, unit};
use crate::models::PropertyType;
use crate::repositories::{
    LabelRow, LeaseRepository, Page, Paged, PropertyRepository, TenantRepository, UnitRepository,
};

/// Error type for registry operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum AdminError {
    #[error("Entity '{key}' is already registered")]
    DuplicateEntity { key: String },
}

/// Input widget kind for a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Email,
    Integer,
    Decimal,
    Boolean,
    Date,
    Choice,
    ForeignKey,
}

/// One editable field of a record type
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Registry key of the referenced entity, for foreign keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub default: Option<serde_json::Value>,
}

impl FieldDescriptor {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            max_length: None,
            choices: Vec::new(),
            references: None,
            default: None,
        }
    }

    fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    fn choices<I: IntoIterator<Item = S>, S: Into<String>>(mut self, choices: I) -> Self {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    fn references(mut self, key: &str) -> Self {
        self.references = Some(key.to_string());
        self
    }

    fn default_value(mut self, value: serde_json::Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }
}

/// Form schema for a record type
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EntityDescriptor {
    /// Registry key, also the URL segment under `/admin`
    pub key: String,
    pub display_name: String,
    /// Collection path of the record API
    pub api_path: String,
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Produces human-readable labels for one record type.
#[async_trait]
pub trait LabelSource: Send + Sync {
    async fn labels(
        &self,
        db: &DatabaseConnection,
        page: Page,
    ) -> Result<Paged<LabelRow>, RepositoryError>;

    async fn label_for(&self, db: &DatabaseConnection, id: i32) -> Result<String, RepositoryError>;
}

pub struct PropertyLabels;
pub struct UnitLabels;
pub struct TenantLabels;
pub struct LeaseLabels;

#[async_trait]
impl LabelSource for PropertyLabels {
    async fn labels(
        &self,
        db: &DatabaseConnection,
        page: Page,
    ) -> Result<Paged<LabelRow>, RepositoryError> {
        PropertyRepository::new(db).labels(page).await
    }

    async fn label_for(&self, db: &DatabaseConnection, id: i32) -> Result<String, RepositoryError> {
        PropertyRepository::new(db).label_for(id).await
    }
}

#[async_trait]
impl LabelSource for UnitLabels {
    async fn labels(
        &self,
        db: &DatabaseConnection,
        page: Page,
    ) -> Result<Paged<LabelRow>, RepositoryError> {
        UnitRepository::new(db).labels(page).await
    }

    async fn label_for(&self, db: &DatabaseConnection, id: i32) -> Result<String, RepositoryError> {
        UnitRepository::new(db).label_for(id).await
    }
}

#[async_trait]
impl LabelSource for TenantLabels {
    async fn labels(
        &self,
        db: &DatabaseConnection,
        page: Page,
    ) -> Result<Paged<LabelRow>, RepositoryError> {
        TenantRepository::new(db).labels(page).await
    }

    async fn label_for(&self, db: &DatabaseConnection, id: i32) -> Result<String, RepositoryError> {
        TenantRepository::new(db).label_for(id).await
    }
}

#[async_trait]
impl LabelSource for LeaseLabels {
    async fn labels(
        &self,
        db: &DatabaseConnection,
        page: Page,
    ) -> Result<Paged<LabelRow>, RepositoryError> {
        LeaseRepository::new(db).labels(page).await
    }

    async fn label_for(&self, db: &DatabaseConnection, id: i32) -> Result<String, RepositoryError> {
        LeaseRepository::new(db).label_for(id).await
    }
}

/// A registered record type
#[derive(Clone)]
pub struct Registration {
    pub descriptor: EntityDescriptor,
    pub labels: Arc<dyn LabelSource>,
}

/// Explicit registry of manageable record types, in registration order
#[derive(Clone, Default)]
pub struct AdminSite {
    registrations: Vec<Registration>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        descriptor: EntityDescriptor,
        labels: Arc<dyn LabelSource>,
    ) -> Result<(), AdminError> {
        if self.get(&descriptor.key).is_some() {
            return Err(AdminError::DuplicateEntity {
                key: descriptor.key,
            });
        }

        tracing::debug!(entity = %descriptor.key, "Registered admin entity");
        self.registrations.push(Registration { descriptor, labels });
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Registration> {
        self.registrations
            .iter()
            .find(|registration| registration.descriptor.key == key)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.registrations
            .iter()
            .map(|registration| &registration.descriptor)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

pub fn property_descriptor() -> EntityDescriptor {
    EntityDescriptor {
        key: "properties".to_string(),
        display_name: "Properties".to_string(),
        api_path: "/api/v1/properties".to_string(),
        fields: vec![
            FieldDescriptor::new("name", FieldKind::Text).max_length(property::NAME_MAX_LENGTH),
            FieldDescriptor::new("address", FieldKind::Text)
                .max_length(property::ADDRESS_MAX_LENGTH),
            FieldDescriptor::new("property_type", FieldKind::Choice)
                .choices(PropertyType::ALL.iter().map(PropertyType::as_str)),
            FieldDescriptor::new("description", FieldKind::LongText),
            FieldDescriptor::new("number_of_units", FieldKind::Integer),
        ],
    }
}

pub fn unit_descriptor() -> EntityDescriptor {
    EntityDescriptor {
        key: "units".to_string(),
        display_name: "Units".to_string(),
        api_path: "/api/v1/units".to_string(),
        fields: vec![
            FieldDescriptor::new("property_id", FieldKind::ForeignKey).references("properties"),
            FieldDescriptor::new("unit_number", FieldKind::Text)
                .max_length(unit::UNIT_NUMBER_MAX_LENGTH),
            FieldDescriptor::new("bedrooms", FieldKind::Integer),
            FieldDescriptor::new("bathrooms", FieldKind::Integer),
            FieldDescriptor::new("rent", FieldKind::Decimal),
            FieldDescriptor::new("is_available", FieldKind::Boolean)
                .default_value(serde_json::Value::Bool(true)),
        ],
    }
}

pub fn tenant_descriptor() -> EntityDescriptor {
    EntityDescriptor {
        key: "tenants".to_string(),
        display_name: "Tenants".to_string(),
        api_path: "/api/v1/tenants".to_string(),
        fields: vec![
            FieldDescriptor::new("name", FieldKind::Text).max_length(tenant::NAME_MAX_LENGTH),
            FieldDescriptor::new("email", FieldKind::Email).max_length(tenant::EMAIL_MAX_LENGTH),
            FieldDescriptor::new("phone_number", FieldKind::Text)
                .max_length(tenant::PHONE_NUMBER_MAX_LENGTH),
        ],
    }
}

pub fn lease_descriptor() -> EntityDescriptor {
    EntityDescriptor {
        key: "leases".to_string(),
        display_name: "Leases".to_string(),
        api_path: "/api/v1/leases".to_string(),
        fields: vec![
            FieldDescriptor::new("tenant_id", FieldKind::ForeignKey).references("tenants"),
            FieldDescriptor::new("unit_id", FieldKind::ForeignKey).references("units"),
            FieldDescriptor::new("start_date", FieldKind::Date),
            FieldDescriptor::new("end_date", FieldKind::Date),
            FieldDescriptor::new("rent_amount", FieldKind::Decimal),
        ],
    }
}

/// The site served by the application: properties, units, tenants, leases.
pub fn default_site() -> Result<AdminSite, AdminError> {
    let mut site = AdminSite::new();
    site.register(property_descriptor(), Arc::new(PropertyLabels))?;
    site.register(unit_descriptor(), Arc::new(UnitLabels))?;
    site.register(tenant_descriptor(), Arc::new(TenantLabels))?;
    site.register(lease_descriptor(), Arc::new(LeaseLabels))?;
    Ok(site)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_site_registers_four_entities_in_order() {
        let site = default_site().unwrap();
        let keys: Vec<_> = site.entities().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["properties", "units", "tenants", "leases"]);
        assert_eq!(site.len(), 4);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut site = default_site().unwrap();
        let result = site.register(tenant_descriptor(), Arc::new(TenantLabels));
        assert!(matches!(
            result,
            Err(AdminError::DuplicateEntity { ref key }) if key == "tenants"
        ));
        assert_eq!(site.len(), 4);
    }

    #[test]
    fn test_property_type_choices_exposed() {
        let descriptor = property_descriptor();
        let field = descriptor.field("property_type").unwrap();
        assert_eq!(field.kind, FieldKind::Choice);
        assert_eq!(field.choices, vec!["Apartment", "House", "Commercial"]);
    }

    #[test]
    fn test_foreign_keys_reference_registered_entities() {
        let site = default_site().unwrap();
        for descriptor in site.entities() {
            for field in &descriptor.fields {
                if let Some(target) = &field.references {
                    assert_eq!(field.kind, FieldKind::ForeignKey);
                    assert!(site.get(target).is_some(), "{} -> {}", field.name, target);
                }
            }
        }

        let lease = lease_descriptor();
        assert_eq!(
            lease.field("unit_id").unwrap().references.as_deref(),
            Some("units")
        );
    }

    #[test]
    fn test_is_available_defaults_to_true() {
        let descriptor = unit_descriptor();
        let field = descriptor.field("is_available").unwrap();
        assert!(!field.required);
        assert_eq!(field.default, Some(serde_json::Value::Bool(true)));

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["fields"][1]["max_length"], 10);
        assert!(json["fields"][0].get("max_length").is_none());
    }
}
