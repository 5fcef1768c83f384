mod common;

use bidexpert_bidding::business_code::model::{EntityType, PlatformSettings};
use bidexpert_bidding::business_code::{generate_next_code, generate_next_code_on};
use bidexpert_bidding::error::AppError;
use bidexpert_bidding::ids::TenantId;
use bidexpert_bidding::repository::MemoryRepository;
use chrono::{NaiveDate, Utc};
use common::{init_tracing, OTHER_TENANT, TENANT};
use std::sync::Arc;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn repo_with(settings: PlatformSettings) -> MemoryRepository {
    init_tracing();
    let repo = MemoryRepository::new();
    repo.upsert_settings(settings).await;
    repo
}

fn default_settings(tenant: TenantId) -> PlatformSettings {
    PlatformSettings {
        tenant_id: tenant.0,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_sequential_codes_in_one_month() {
    let repo = repo_with(default_settings(TENANT)).await;
    let jan = day(2025, 1, 20);

    let first = generate_next_code_on(&repo, EntityType::Auction, TENANT, jan)
        .await
        .unwrap();
    let second = generate_next_code_on(&repo, EntityType::Auction, TENANT, jan)
        .await
        .unwrap();

    assert_eq!(first, "AUC-202501-00001");
    assert_eq!(second, "AUC-202501-00002");
}

#[tokio::test]
async fn test_new_month_restarts_sequence() {
    let repo = repo_with(default_settings(TENANT)).await;

    for _ in 0..3 {
        generate_next_code_on(&repo, EntityType::Lot, TENANT, day(2025, 1, 31))
            .await
            .unwrap();
    }
    let february = generate_next_code_on(&repo, EntityType::Lot, TENANT, day(2025, 2, 1))
        .await
        .unwrap();
    assert_eq!(february, "LOT-202502-00001");

    let january = generate_next_code_on(&repo, EntityType::Lot, TENANT, day(2025, 1, 31))
        .await
        .unwrap();
    assert_eq!(january, "LOT-202501-00004");
}

#[tokio::test]
async fn test_each_entity_uses_its_prefix_and_counter() {
    let repo = repo_with(default_settings(TENANT)).await;
    let date = day(2025, 3, 5);

    let expected = [
        (EntityType::Auction, "AUC-202503-00001"),
        (EntityType::Lot, "LOT-202503-00001"),
        (EntityType::Seller, "SEL-202503-00001"),
        (EntityType::Auctioneer, "LEI-202503-00001"),
        (EntityType::Asset, "BEM-202503-00001"),
        (EntityType::JudicialProcess, "PRC-202503-00001"),
        (EntityType::Category, "CAT-202503-00001"),
    ];
    for (entity, code) in expected {
        assert_eq!(
            generate_next_code_on(&repo, entity, TENANT, date).await.unwrap(),
            code
        );
    }
}

#[tokio::test]
async fn test_custom_mask_sets_width_and_format() {
    let repo = repo_with(PlatformSettings {
        tenant_id: TENANT.0,
        seller_code_mask: Some("COM/{TYPE}/YYYY/NNN".to_string()),
        asset_code_mask: Some("   ".to_string()),
        ..Default::default()
    })
    .await;
    let date = day(2025, 7, 1);

    assert_eq!(
        generate_next_code_on(&repo, EntityType::Seller, TENANT, date)
            .await
            .unwrap(),
        "COM/SEL/2025/001"
    );
    // A blank mask falls back to the default.
    assert_eq!(
        generate_next_code_on(&repo, EntityType::Asset, TENANT, date)
            .await
            .unwrap(),
        "BEM-202507-00001"
    );
}

#[tokio::test]
async fn test_mask_without_placeholder_is_invalid() {
    let repo = repo_with(PlatformSettings {
        tenant_id: TENANT.0,
        category_code_mask: Some("{TYPE}-YYYY".to_string()),
        ..Default::default()
    })
    .await;

    let err = generate_next_code(&repo, EntityType::Category, TENANT)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_missing_settings_is_an_error() {
    let repo = repo_with(default_settings(TENANT)).await;

    let err = generate_next_code(&repo, EntityType::Auction, OTHER_TENANT)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_tenants_have_independent_counters() {
    let repo = MemoryRepository::new();
    repo.upsert_settings(default_settings(TENANT)).await;
    repo.upsert_settings(default_settings(OTHER_TENANT)).await;
    let date = day(2025, 1, 2);

    generate_next_code_on(&repo, EntityType::Auction, TENANT, date)
        .await
        .unwrap();
    let other = generate_next_code_on(&repo, EntityType::Auction, OTHER_TENANT, date)
        .await
        .unwrap();
    assert_eq!(other, "AUC-202501-00001");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generation_never_repeats() {
    let repo = Arc::new(repo_with(default_settings(TENANT)).await);

    let mut handles = vec![];
    for _ in 0..25 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            generate_next_code(repo.as_ref(), EntityType::Lot, TENANT).await
        }));
    }

    let mut codes = vec![];
    for handle in handles {
        codes.push(handle.await.unwrap().unwrap());
    }
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 25);

    let month = Utc::now().format("%Y%m").to_string();
    assert!(codes.contains(&format!("LOT-{month}-00025")));
}
