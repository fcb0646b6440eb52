//! Integration tests for the asset repository: owner scoping, listing
//! filters, ordering, pagination, and reference counts.

use std::str::FromStr;

use inventra_core::asset::{order_by_clause, AssetCondition, PageRequest};
use inventra_db::models::asset::{AssetFilter, CreateAsset, UpdateAsset};
use inventra_db::models::user::CreateUser;
use inventra_db::repositories::{AssetRepo, CategoryRepo, LocationRepo, UserRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    owner: i64,
    category: i64,
    location: i64,
}

async fn fixture(pool: &PgPool, email: &str) -> Fixture {
    let owner = UserRepo::create(
        pool,
        &CreateUser {
            fullname: "Asset Owner".to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap()
    .id;
    let category = CategoryRepo::create(pool, owner, "Gear", None).await.unwrap().id;
    let location = LocationRepo::create(pool, owner, "Shed").await.unwrap().id;
    Fixture {
        owner,
        category,
        location,
    }
}

fn new_asset(f: &Fixture, name: &str, price: &str, condition: AssetCondition) -> CreateAsset {
    CreateAsset {
        name: name.to_string(),
        description: format!("{name} description"),
        category_id: f.category,
        location_id: f.location,
        price: Decimal::from_str(price).unwrap(),
        condition,
        serial_number: format!("SN-{name}"),
        purchase_date: None,
        warranty: None,
        image_url: None,
    }
}

fn names(assets: &[inventra_db::models::asset::Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assets_are_owner_scoped(pool: PgPool) {
    let alice = fixture(&pool, "alice@example.com").await;
    let bob = fixture(&pool, "bob@example.com").await;
    let asset = AssetRepo::create(&pool, alice.owner, &new_asset(&alice, "Drill", "50", AssetCondition::Good))
        .await
        .unwrap();

    assert!(AssetRepo::find_by_id(&pool, asset.id, alice.owner).await.unwrap().is_some());
    assert!(AssetRepo::find_by_id(&pool, asset.id, bob.owner).await.unwrap().is_none());
    assert!(!AssetRepo::soft_delete(&pool, asset.id, bob.owner).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_sorts_and_paginates(pool: PgPool) {
    let f = fixture(&pool, "list@example.com").await;
    for (name, price, condition) in [
        ("Drill", "50", AssetCondition::Good),
        ("Hammer", "15.50", AssetCondition::Fair),
        ("Saw", "30", AssetCondition::New),
        ("Ladder", "120", AssetCondition::Poor),
    ] {
        AssetRepo::create(&pool, f.owner, &new_asset(&f, name, price, condition))
            .await
            .unwrap();
    }

    let by_price = order_by_clause(Some("price"), Some("asc"));
    let (all, total) = AssetRepo::list(
        &pool,
        f.owner,
        &AssetFilter::default(),
        &by_price,
        PageRequest::new(None, None),
    )
    .await
    .unwrap();
    assert_eq!(total, 4);
    assert_eq!(names(&all), vec!["Hammer", "Saw", "Drill", "Ladder"]);

    let range = AssetFilter {
        min_price: Some(Decimal::from(20)),
        max_price: Some(Decimal::from(100)),
        ..Default::default()
    };
    let (in_range, total) = AssetRepo::list(&pool, f.owner, &range, &by_price, PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(names(&in_range), vec!["Saw", "Drill"]);

    let search = AssetFilter {
        search: Some("sn-ham".to_string()),
        ..Default::default()
    };
    let (found, _) = AssetRepo::list(&pool, f.owner, &search, &by_price, PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Hammer"]);

    let poor = AssetFilter {
        condition: Some(AssetCondition::Poor),
        ..Default::default()
    };
    let (poor_only, _) = AssetRepo::list(&pool, f.owner, &poor, &by_price, PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(names(&poor_only), vec!["Ladder"]);

    let (page_two, total) = AssetRepo::list(
        &pool,
        f.owner,
        &AssetFilter::default(),
        &by_price,
        PageRequest::new(Some(2), Some(3)),
    )
    .await
    .unwrap();
    assert_eq!(total, 4);
    assert_eq!(names(&page_two), vec!["Ladder"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counts_ignore_deleted_and_foreign_assets(pool: PgPool) {
    let f = fixture(&pool, "count@example.com").await;
    let a = AssetRepo::create(&pool, f.owner, &new_asset(&f, "One", "1", AssetCondition::New))
        .await
        .unwrap();
    AssetRepo::create(&pool, f.owner, &new_asset(&f, "Two", "2", AssetCondition::New))
        .await
        .unwrap();

    assert_eq!(AssetRepo::count_by_category(&pool, f.category, f.owner).await.unwrap(), 2);
    assert_eq!(AssetRepo::count_by_location(&pool, f.location, f.owner).await.unwrap(), 2);

    AssetRepo::soft_delete(&pool, a.id, f.owner).await.unwrap();
    assert_eq!(AssetRepo::count_by_category(&pool, f.category, f.owner).await.unwrap(), 1);
    assert_eq!(AssetRepo::list_by_location(&pool, f.location, f.owner).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_image_links_are_counted_across_owners(pool: PgPool) {
    let alice = fixture(&pool, "img-a@example.com").await;
    let bob = fixture(&pool, "img-b@example.com").await;
    let url = "http://localhost:3000/uploads/1/photo.jpg";

    let mut input = new_asset(&alice, "Lamp", "20", AssetCondition::Good);
    input.image_url = Some(url.to_string());
    let lamp = AssetRepo::create(&pool, alice.owner, &input).await.unwrap();
    let mut input = new_asset(&bob, "Copy", "20", AssetCondition::Good);
    input.image_url = Some(url.to_string());
    let copy = AssetRepo::create(&pool, bob.owner, &input).await.unwrap();

    assert_eq!(AssetRepo::count_by_image_url(&pool, url).await.unwrap(), 2);
    AssetRepo::soft_delete(&pool, copy.id, bob.owner).await.unwrap();
    assert_eq!(AssetRepo::count_by_image_url(&pool, url).await.unwrap(), 1);
    AssetRepo::soft_delete(&pool, lamp.id, alice.owner).await.unwrap();
    assert_eq!(AssetRepo::count_by_image_url(&pool, url).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_patches_only_supplied_fields(pool: PgPool) {
    let f = fixture(&pool, "patch@example.com").await;
    let asset = AssetRepo::create(&pool, f.owner, &new_asset(&f, "Drill", "50", AssetCondition::Good))
        .await
        .unwrap();

    let patch = UpdateAsset {
        price: Some(Decimal::from_str("45.25").unwrap()),
        condition: Some(AssetCondition::Fair),
        ..Default::default()
    };
    let updated = AssetRepo::update(&pool, asset.id, f.owner, &patch)
        .await
        .unwrap()
        .expect("asset should exist");

    assert_eq!(updated.name, "Drill");
    assert_eq!(updated.price, Decimal::from_str("45.25").unwrap());
    assert_eq!(updated.condition, "fair");
    assert_eq!(updated.serial_number, "SN-Drill");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_price_rejected_by_schema(pool: PgPool) {
    let f = fixture(&pool, "neg@example.com").await;
    let err = AssetRepo::create(&pool, f.owner, &new_asset(&f, "Bad", "-1", AssetCondition::New))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("ck_assets_price_non_negative")
    );
}
