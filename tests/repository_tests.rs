//! Repository tests against an in-memory SQLite database.

#[path = "test_utils/mod.rs"]
mod test_utils;

use rentals::error::RepositoryError;
use rentals::models::PropertyType;
use rentals::repositories::{
    LeaseFilter, LeaseInput, LeaseRepository, Page, PropertyFilter, PropertyInput,
    PropertyRepository, TenantInput, TenantRepository, UnitFilter, UnitInput, UnitRepository,
};
use rentals::validation::{INVALID_CHOICE_MESSAGE, REQUIRED_MESSAGE};
use test_utils::{
    create_lease, create_property, create_tenant, create_unit, date, money, setup_test_db,
};

fn validation_errors(err: RepositoryError) -> rentals::validation::ValidationErrors {
    match err {
        RepositoryError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unit_defaults_to_available_and_keeps_two_decimal_rent() {
    let db = setup_test_db().await.unwrap();
    let property = create_property(&db, "Maple Court").await.unwrap();

    let record = create_unit(&db, property.id, "4B", "1500").await.unwrap();
    assert!(record.unit.is_available);
    assert_eq!(record.unit.rent.to_string(), "1500.00");
    assert_eq!(record.label(), "Unit 4B - Maple Court");

    let loaded = UnitRepository::new(&db).get(record.unit.id).await.unwrap();
    assert_eq!(loaded.unit.rent.to_string(), "1500.00");
    assert!(loaded.unit.is_available);
}

#[tokio::test]
async fn test_unit_with_missing_property_is_field_error() {
    let db = setup_test_db().await.unwrap();

    let err = UnitRepository::new(&db)
        .create(UnitInput {
            property_id: 999,
            unit_number: "1A".to_string(),
            bedrooms: 1,
            bathrooms: 1,
            rent: money("900.00"),
            is_available: Some(false),
        })
        .await
        .unwrap_err();

    let errors = validation_errors(err);
    assert_eq!(errors.get("property_id"), Some(INVALID_CHOICE_MESSAGE));
}

#[tokio::test]
async fn test_lease_reports_every_invalid_field() {
    let db = setup_test_db().await.unwrap();

    let err = LeaseRepository::new(&db)
        .create(LeaseInput {
            tenant_id: 41,
            unit_id: 42,
            start_date: date("2026-01-01"),
            end_date: date("2026-12-31"),
            rent_amount: money("12.345"),
        })
        .await
        .unwrap_err();

    let errors = validation_errors(err);
    assert_eq!(errors.get("tenant_id"), Some(INVALID_CHOICE_MESSAGE));
    assert_eq!(errors.get("unit_id"), Some(INVALID_CHOICE_MESSAGE));
    assert!(errors.get("rent_amount").is_some());
    assert_eq!(errors.len(), 3);
}

#[tokio::test]
async fn test_property_validation_collects_all_fields() {
    let db = setup_test_db().await.unwrap();

    let err = PropertyRepository::new(&db)
        .create(PropertyInput {
            name: "x".repeat(101),
            address: "   ".to_string(),
            property_type: PropertyType::House,
            description: String::new(),
            number_of_units: 1,
        })
        .await
        .unwrap_err();

    let errors = validation_errors(err);
    assert!(errors.get("name").unwrap().contains("at most 100 characters"));
    assert_eq!(errors.get("address"), Some(REQUIRED_MESSAGE));
    assert_eq!(errors.get("description"), Some(REQUIRED_MESSAGE));
}

#[tokio::test]
async fn test_tenant_email_is_checked() {
    let db = setup_test_db().await.unwrap();

    let err = TenantRepository::new(&db)
        .create(TenantInput {
            name: "Jo Rivera".to_string(),
            email: "not-an-email".to_string(),
            phone_number: "555-0100".to_string(),
        })
        .await
        .unwrap_err();

    assert!(validation_errors(err).get("email").is_some());
}

#[tokio::test]
async fn test_lease_label_and_loaded_parents() {
    let db = setup_test_db().await.unwrap();
    let property = create_property(&db, "Maple Court").await.unwrap();
    let unit = create_unit(&db, property.id, "4B", "1500.00").await.unwrap();
    let tenant = create_tenant(&db, "Jo Rivera").await.unwrap();

    let lease = create_lease(&db, tenant.id, unit.unit.id, "1450")
        .await
        .unwrap();
    assert_eq!(lease.label(), "Lease for Jo Rivera - 4B");
    assert_eq!(lease.lease.rent_amount.to_string(), "1450.00");

    let listed = LeaseRepository::new(&db)
        .list(&LeaseFilter::default(), Page::first(10))
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].unit.label(), "Unit 4B - Maple Court");
    assert_eq!(listed.items[0].tenant.id, tenant.id);
}

#[tokio::test]
async fn test_deleting_property_removes_units_and_their_leases() {
    let db = setup_test_db().await.unwrap();
    let kept = create_property(&db, "Kept").await.unwrap();
    let doomed = create_property(&db, "Doomed").await.unwrap();
    let kept_unit = create_unit(&db, kept.id, "1", "800").await.unwrap();
    let doomed_unit = create_unit(&db, doomed.id, "2", "900").await.unwrap();
    let tenant = create_tenant(&db, "Sam Lee").await.unwrap();
    let kept_lease = create_lease(&db, tenant.id, kept_unit.unit.id, "800")
        .await
        .unwrap();
    let doomed_lease = create_lease(&db, tenant.id, doomed_unit.unit.id, "900")
        .await
        .unwrap();

    PropertyRepository::new(&db).delete(doomed.id).await.unwrap();

    let units = UnitRepository::new(&db);
    let leases = LeaseRepository::new(&db);
    assert!(PropertyRepository::new(&db).find(doomed.id).await.unwrap().is_none());
    assert!(units.find(doomed_unit.unit.id).await.unwrap().is_none());
    assert!(leases.find(doomed_lease.lease.id).await.unwrap().is_none());
    assert!(units.find(kept_unit.unit.id).await.unwrap().is_some());
    assert!(leases.find(kept_lease.lease.id).await.unwrap().is_some());
    assert!(TenantRepository::new(&db).find(tenant.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_deleting_unit_or_tenant_removes_their_leases() {
    let db = setup_test_db().await.unwrap();
    let property = create_property(&db, "Birch House").await.unwrap();
    let unit = create_unit(&db, property.id, "A", "700").await.unwrap();
    let other_unit = create_unit(&db, property.id, "B", "750").await.unwrap();
    let tenant = create_tenant(&db, "Ana Diaz").await.unwrap();
    let other_tenant = create_tenant(&db, "Ben Ode").await.unwrap();

    let on_unit = create_lease(&db, tenant.id, unit.unit.id, "700").await.unwrap();
    let of_other = create_lease(&db, other_tenant.id, other_unit.unit.id, "750")
        .await
        .unwrap();

    UnitRepository::new(&db).delete(unit.unit.id).await.unwrap();
    let leases = LeaseRepository::new(&db);
    assert!(leases.find(on_unit.lease.id).await.unwrap().is_none());
    assert!(leases.find(of_other.lease.id).await.unwrap().is_some());

    TenantRepository::new(&db).delete(other_tenant.id).await.unwrap();
    assert!(leases.find(of_other.lease.id).await.unwrap().is_none());
    assert!(UnitRepository::new(&db).find(other_unit.unit.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_missing_record_is_not_found() {
    let db = setup_test_db().await.unwrap();

    let err = PropertyRepository::new(&db).delete(77).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    let err = LeaseRepository::new(&db).delete(77).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[tokio::test]
async fn test_update_replaces_unit_fields() {
    let db = setup_test_db().await.unwrap();
    let first = create_property(&db, "First").await.unwrap();
    let second = create_property(&db, "Second").await.unwrap();
    let unit = create_unit(&db, first.id, "1", "1000").await.unwrap();

    let updated = UnitRepository::new(&db)
        .update(
            unit.unit.id,
            UnitInput {
                property_id: second.id,
                unit_number: " 9C ".to_string(),
                bedrooms: 3,
                bathrooms: 2,
                rent: money("1234.5"),
                is_available: Some(false),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.property.id, second.id);
    assert_eq!(updated.unit.unit_number, "9C");
    assert_eq!(updated.unit.rent.to_string(), "1234.50");
    assert!(!updated.unit.is_available);
    assert_eq!(updated.label(), "Unit 9C - Second");
}

#[tokio::test]
async fn test_list_filters_and_pages_by_id() {
    let db = setup_test_db().await.unwrap();
    let property = create_property(&db, "Cedar Lofts").await.unwrap();
    for number in ["1", "2", "3", "4", "5"] {
        create_unit(&db, property.id, number, "600").await.unwrap();
    }
    let repo = UnitRepository::new(&db);
    let last = repo
        .list(&UnitFilter::default(), Page::first(10))
        .await
        .unwrap()
        .items
        .pop()
        .unwrap();
    repo.update(
        last.unit.id,
        UnitInput {
            property_id: property.id,
            unit_number: last.unit.unit_number.clone(),
            bedrooms: last.unit.bedrooms,
            bathrooms: last.unit.bathrooms,
            rent: last.unit.rent,
            is_available: Some(false),
        },
    )
    .await
    .unwrap();

    let first = repo
        .list(&UnitFilter::default(), Page::first(2))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    let after = first.next_after.unwrap();
    assert_eq!(after, first.items[1].unit.id);

    let second = repo
        .list(
            &UnitFilter::default(),
            Page {
                after_id: Some(after),
                limit: 10,
            },
        )
        .await
        .unwrap();
    assert_eq!(second.items.len(), 3);
    assert!(second.next_after.is_none());
    assert!(second.items.iter().all(|r| r.unit.id > after));

    let available = repo
        .list(
            &UnitFilter {
                property_id: Some(property.id),
                is_available: Some(true),
            },
            Page::first(10),
        )
        .await
        .unwrap();
    assert_eq!(available.items.len(), 4);

    let houses = PropertyRepository::new(&db)
        .list(
            &PropertyFilter {
                property_type: Some(PropertyType::House),
            },
            Page::first(10),
        )
        .await
        .unwrap();
    assert!(houses.items.is_empty());
}

#[tokio::test]
async fn test_labels_follow_entity_rules() {
    let db = setup_test_db().await.unwrap();
    let property = create_property(&db, "Oak Row").await.unwrap();
    let unit = create_unit(&db, property.id, "7", "1100").await.unwrap();
    let tenant = create_tenant(&db, "Kim Park").await.unwrap();
    let lease = create_lease(&db, tenant.id, unit.unit.id, "1100")
        .await
        .unwrap();

    assert_eq!(
        PropertyRepository::new(&db).label_for(property.id).await.unwrap(),
        "Oak Row"
    );
    assert_eq!(
        UnitRepository::new(&db).label_for(unit.unit.id).await.unwrap(),
        "Unit 7 - Oak Row"
    );
    assert_eq!(
        TenantRepository::new(&db).label_for(tenant.id).await.unwrap(),
        "Kim Park"
    );

    let labels = LeaseRepository::new(&db).labels(Page::first(10)).await.unwrap();
    assert_eq!(labels.items.len(), 1);
    assert_eq!(labels.items[0].id, lease.lease.id);
    assert_eq!(labels.items[0].label, "Lease for Kim Park - 7");
}

#[tokio::test]
async fn test_unconstrained_units_and_lease_dates_are_accepted() {
    let db = setup_test_db().await.unwrap();
    let property = create_property(&db, "Pine Terrace").await.unwrap();
    let tenant = create_tenant(&db, "Lou Grant").await.unwrap();
    let other_tenant = create_tenant(&db, "Mary Rich").await.unwrap();

    // unit_number is not unique within a property
    let first = create_unit(&db, property.id, "1", "700").await.unwrap();
    let second = create_unit(&db, property.id, "1", "720").await.unwrap();
    assert_ne!(first.unit.id, second.unit.id);
    assert_eq!(first.label(), second.label());

    let leases = LeaseRepository::new(&db);

    // end_date may precede start_date
    let reversed = leases
        .create(LeaseInput {
            tenant_id: tenant.id,
            unit_id: first.unit.id,
            start_date: date("2026-12-31"),
            end_date: date("2026-01-01"),
            rent_amount: money("700"),
        })
        .await
        .unwrap();
    assert_eq!(reversed.lease.start_date, date("2026-12-31"));
    assert_eq!(reversed.lease.end_date, date("2026-01-01"));

    // leases on one unit may overlap, and rent_amount need not match the unit
    let overlapping = leases
        .create(LeaseInput {
            tenant_id: other_tenant.id,
            unit_id: first.unit.id,
            start_date: date("2026-06-01"),
            end_date: date("2027-05-31"),
            rent_amount: money("650"),
        })
        .await
        .unwrap();

    let on_unit = leases
        .list(
            &LeaseFilter {
                tenant_id: None,
                unit_id: Some(first.unit.id),
            },
            Page::first(10),
        )
        .await
        .unwrap();
    let ids: Vec<i32> = on_unit.items.iter().map(|r| r.lease.id).collect();
    assert_eq!(ids, vec![reversed.lease.id, overlapping.lease.id]);
    assert_eq!(overlapping.lease.rent_amount.to_string(), "650.00");
}
