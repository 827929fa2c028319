//! # Repository Layer
//!
//! One repository per record type, each borrowing the connection pool.
//! Repositories validate payloads, keep the parent/child invariants and
//! return models with their currency columns normalized.

use sea_orm::DbErr;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::RepositoryError;

pub mod lease;
pub mod property;
pub mod tenant;
pub mod unit;

pub use lease::{LeaseFilter, LeaseInput, LeaseRecord, LeaseRepository};
pub use property::{PropertyFilter, PropertyInput, PropertyRepository};
pub use tenant::{TenantInput, TenantRepository};
pub use unit::{UnitFilter, UnitInput, UnitRecord, UnitRepository};

/// Keyset page request: records with `id > after_id`, ascending, at most `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub after_id: Option<i32>,
    pub limit: u64,
}

impl Page {
    pub fn first(limit: u64) -> Self {
        Self {
            after_id: None,
            limit,
        }
    }

    /// Rows to fetch: one extra to learn whether another page follows.
    pub(crate) fn fetch_limit(&self) -> u64 {
        self.limit.saturating_add(1)
    }
}

/// One page of results plus the id to continue after, if any.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub next_after: Option<i32>,
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            next_after: self.next_after,
        }
    }
}

/// Trims an over-fetched row set down to the page and records the continuation id.
pub(crate) fn into_paged<T>(mut rows: Vec<T>, page: &Page, id_of: impl Fn(&T) -> i32) -> Paged<T> {
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    let next_after = if rows.len() > limit {
        rows.truncate(limit);
        rows.last().map(id_of)
    } else {
        None
    };

    Paged {
        items: rows,
        next_after,
    }
}

/// `{id, label}` row used by list views and relational pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LabelRow {
    pub id: i32,
    pub label: String,
}

/// A non-null foreign key whose target row is gone; only reachable when
/// referential integrity was bypassed outside the service.
pub(crate) fn missing_parent<T>(parent: Option<T>, entity: &str, id: i32) -> Result<T, RepositoryError> {
    parent.ok_or_else(|| {
        RepositoryError::Database(DbErr::RecordNotFound(format!(
            "{entity} {id} referenced by an existing record"
        )))
    })
}

pub(crate) fn record_created(entity: &'static str) {
    metrics::counter!("rentals_records_created_total", "entity" => entity).increment(1);
}

pub(crate) fn record_deleted(entity: &'static str, count: u64) {
    metrics::counter!("rentals_records_deleted_total", "entity" => entity).increment(count);
}
