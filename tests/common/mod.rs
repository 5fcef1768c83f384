#![allow(dead_code)]

use bidexpert_bidding::auction::model::{Auction, Lot};
use bidexpert_bidding::bidding::model::User;
use bidexpert_bidding::business_code::model::PlatformSettings;
use bidexpert_bidding::config::BiddingSettings;
use bidexpert_bidding::event_store::MemoryEventStore;
use bidexpert_bidding::ids::TenantId;
use bidexpert_bidding::repository::MemoryRepository;
use bidexpert_bidding::status::{AuctionStatus, LotStatus};
use chrono::Utc;
use std::sync::Arc;

pub const TENANT: TenantId = TenantId(1);
pub const OTHER_TENANT: TenantId = TenantId(2);

/// Tracing for tests; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// One open auction with a single lot (initial price R$ 1.000,00) and one bidder.
pub struct Fixture {
    pub repo: Arc<MemoryRepository>,
    pub events: Arc<MemoryEventStore>,
    pub settings: BiddingSettings,
    pub auction: Auction,
    pub lot: Lot,
    pub bidder: User,
}

pub async fn setup() -> Fixture {
    init_tracing();

    let repo = Arc::new(MemoryRepository::new());
    repo.upsert_settings(PlatformSettings {
        tenant_id: TENANT.0,
        ..Default::default()
    })
    .await;

    let auction = repo
        .insert_auction(auction(TENANT, "AUC-202501-00001", AuctionStatus::AbertoParaLances))
        .await;
    let lot = repo
        .insert_lot(lot(TENANT, auction.id, "LOT-202501-00001", 100_000))
        .await;
    let bidder = repo
        .insert_user(user(TENANT, "USR-0001", "ana@example.com"))
        .await;

    Fixture {
        repo,
        events: Arc::new(MemoryEventStore::new()),
        settings: BiddingSettings::default(),
        auction,
        lot,
        bidder,
    }
}

pub fn auction(tenant: TenantId, public_id: &str, status: AuctionStatus) -> Auction {
    Auction {
        id: 0,
        public_id: public_id.to_string(),
        tenant_id: tenant.0,
        title: format!("Leilão {public_id}"),
        status,
        auction_type: Some("EXTRAJUDICIAL".to_string()),
        seller_id: None,
        auctioneer_id: None,
        created_at: Utc::now(),
    }
}

pub fn lot(tenant: TenantId, auction_id: i64, public_id: &str, initial_price: i64) -> Lot {
    let now = Utc::now();
    Lot {
        id: 0,
        public_id: public_id.to_string(),
        tenant_id: tenant.0,
        auction_id,
        title: format!("Lote {public_id}"),
        price: initial_price,
        initial_price: Some(initial_price),
        evaluation_value: None,
        bid_increment_step: None,
        status: LotStatus::AbertoParaLances,
        bids_count: 0,
        winner_id: None,
        is_relisted: false,
        original_lot_id: None,
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn user(tenant: TenantId, public_id: &str, email: &str) -> User {
    User {
        id: 0,
        public_id: public_id.to_string(),
        tenant_id: tenant.0,
        email: email.to_string(),
        full_name: None,
    }
}
