//! In-process backend with the same tenant scoping and version checks as Postgres.
//! Backs the test suite and local experiments that have no database at hand.

// region:    --- Imports
use super::{AuctionRepository, RepoResult};
use crate::auction::model::{Auction, Lot, NewLot};
use crate::bidding::model::{Bid, NewBid, ResolvedBidFilter, User};
use crate::business_code::model::{EntityType, PlatformSettings};
use crate::ids::TenantId;
use crate::payments::model::{InstallmentPayment, NewInstallment, UserWin};
use crate::status::{AuctionStatus, BidStatus, LotStatus, PaymentStatus};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

// endregion: --- Imports

#[derive(Default)]
struct Tables {
    next_id: i64,
    auctions: Vec<Auction>,
    lots: Vec<Lot>,
    users: Vec<User>,
    bids: Vec<Bid>,
    wins: Vec<UserWin>,
    installments: Vec<InstallmentPayment>,
    settings: Vec<PlatformSettings>,
    counters: HashMap<(i64, EntityType, String), i64>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // region:    --- Seeding
    // Ids given by the caller are ignored and replaced with fresh ones.

    pub async fn insert_auction(&self, mut auction: Auction) -> Auction {
        let mut tables = self.tables.lock().await;
        auction.id = tables.allocate_id();
        tables.auctions.push(auction.clone());
        auction
    }

    pub async fn insert_lot(&self, mut lot: Lot) -> Lot {
        let mut tables = self.tables.lock().await;
        lot.id = tables.allocate_id();
        tables.lots.push(lot.clone());
        lot
    }

    pub async fn insert_user(&self, mut user: User) -> User {
        let mut tables = self.tables.lock().await;
        user.id = tables.allocate_id();
        tables.users.push(user.clone());
        user
    }

    pub async fn insert_bid(&self, mut bid: Bid) -> Bid {
        let mut tables = self.tables.lock().await;
        bid.id = tables.allocate_id();
        tables.bids.push(bid.clone());
        bid
    }

    pub async fn insert_user_win(&self, mut win: UserWin) -> UserWin {
        let mut tables = self.tables.lock().await;
        win.id = tables.allocate_id();
        tables.wins.push(win.clone());
        win
    }

    pub async fn upsert_settings(&self, settings: PlatformSettings) {
        let mut tables = self.tables.lock().await;
        tables.settings.retain(|s| s.tenant_id != settings.tenant_id);
        tables.settings.push(settings);
    }

    /// Stands in for the external job that opens and closes auctions.
    pub async fn set_auction_status(
        &self,
        tenant: TenantId,
        auction_id: i64,
        status: AuctionStatus,
    ) {
        let mut tables = self.tables.lock().await;
        if let Some(auction) = tables
            .auctions
            .iter_mut()
            .find(|a| a.tenant_id == tenant.0 && a.id == auction_id)
        {
            auction.status = status;
        }
    }

    // endregion: --- Seeding

    pub async fn installments_for(
        &self,
        tenant: TenantId,
        user_win_id: i64,
    ) -> Vec<InstallmentPayment> {
        let tables = self.tables.lock().await;
        tables
            .installments
            .iter()
            .filter(|i| i.tenant_id == tenant.0 && i.user_win_id == user_win_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuctionRepository for MemoryRepository {
    async fn auction_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<Auction>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .auctions
            .iter()
            .find(|a| a.tenant_id == tenant.0 && a.id == id)
            .cloned())
    }

    async fn auction_by_public_id(
        &self,
        tenant: TenantId,
        public_id: &str,
    ) -> RepoResult<Option<Auction>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .auctions
            .iter()
            .find(|a| a.tenant_id == tenant.0 && a.public_id == public_id)
            .cloned())
    }

    async fn lot_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<Lot>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .lots
            .iter()
            .find(|l| l.tenant_id == tenant.0 && l.id == id)
            .cloned())
    }

    async fn lot_by_public_id(
        &self,
        tenant: TenantId,
        public_id: &str,
    ) -> RepoResult<Option<Lot>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .lots
            .iter()
            .find(|l| l.tenant_id == tenant.0 && l.public_id == public_id)
            .cloned())
    }

    async fn user_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.tenant_id == tenant.0 && u.id == id)
            .cloned())
    }

    async fn user_by_handle(&self, tenant: TenantId, handle: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| {
                u.tenant_id == tenant.0
                    && (u.public_id == handle || u.email.eq_ignore_ascii_case(handle))
            })
            .cloned())
    }

    async fn highest_active_bid(&self, tenant: TenantId, lot_id: i64) -> RepoResult<Option<i64>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bids
            .iter()
            .filter(|b| {
                b.tenant_id == tenant.0 && b.lot_id == lot_id && b.status == BidStatus::Ativo
            })
            .map(|b| b.amount)
            .max())
    }

    async fn commit_bid(
        &self,
        tenant: TenantId,
        bid: NewBid,
        expected_version: i64,
    ) -> RepoResult<Option<(Bid, Lot)>> {
        let mut tables = self.tables.lock().await;
        let id = tables.allocate_id();

        let Some(lot) = tables.lots.iter_mut().find(|l| {
            l.tenant_id == tenant.0 && l.id == bid.lot_id && l.version == expected_version
        }) else {
            return Ok(None);
        };
        lot.price = bid.amount;
        lot.bids_count += 1;
        lot.version += 1;
        lot.updated_at = bid.timestamp;
        let lot = lot.clone();

        let created = Bid {
            id,
            tenant_id: tenant.0,
            lot_id: bid.lot_id,
            auction_id: bid.auction_id,
            bidder_id: bid.bidder_id,
            amount: bid.amount,
            status: BidStatus::Ativo,
            is_auto_bid: bid.is_auto_bid,
            timestamp: bid.timestamp,
        };
        tables.bids.push(created.clone());

        Ok(Some((created, lot)))
    }

    async fn list_bids(&self, tenant: TenantId, filter: ResolvedBidFilter) -> RepoResult<Vec<Bid>> {
        let tables = self.tables.lock().await;
        let mut bids: Vec<Bid> = tables
            .bids
            .iter()
            .filter(|b| b.tenant_id == tenant.0)
            .filter(|b| filter.lot_id.map_or(true, |id| b.lot_id == id))
            .filter(|b| filter.auction_id.map_or(true, |id| b.auction_id == id))
            .filter(|b| filter.bidder_id.map_or(true, |id| b.bidder_id == id))
            .cloned()
            .collect();
        bids.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(bids)
    }

    async fn relist_lot(
        &self,
        tenant: TenantId,
        original_lot_id: i64,
        expected_version: i64,
        new_lot: NewLot,
    ) -> RepoResult<Option<Lot>> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let id = tables.allocate_id();

        let Some(original) = tables.lots.iter_mut().find(|l| {
            l.tenant_id == tenant.0 && l.id == original_lot_id && l.version == expected_version
        }) else {
            return Ok(None);
        };
        original.status = LotStatus::Relistado;
        original.version += 1;
        original.updated_at = now;

        let created = Lot {
            id,
            public_id: new_lot.public_id,
            tenant_id: tenant.0,
            auction_id: new_lot.auction_id,
            title: new_lot.title,
            price: new_lot.initial_price,
            initial_price: Some(new_lot.initial_price),
            evaluation_value: new_lot.evaluation_value,
            bid_increment_step: new_lot.bid_increment_step,
            status: new_lot.status,
            bids_count: 0,
            winner_id: None,
            is_relisted: true,
            original_lot_id: Some(new_lot.original_lot_id),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        tables.lots.push(created.clone());

        Ok(Some(created))
    }

    async fn platform_settings(&self, tenant: TenantId) -> RepoResult<Option<PlatformSettings>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .settings
            .iter()
            .find(|s| s.tenant_id == tenant.0)
            .cloned())
    }

    async fn next_sequence(
        &self,
        tenant: TenantId,
        entity: EntityType,
        prefix: &str,
    ) -> RepoResult<i64> {
        let mut tables = self.tables.lock().await;
        let counter = tables
            .counters
            .entry((tenant.0, entity, prefix.to_string()))
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn user_win_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<UserWin>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .wins
            .iter()
            .find(|w| w.tenant_id == tenant.0 && w.id == id)
            .cloned())
    }

    async fn start_checkout(
        &self,
        tenant: TenantId,
        user_win_id: i64,
        installments: Vec<NewInstallment>,
    ) -> RepoResult<Option<Vec<InstallmentPayment>>> {
        let mut tables = self.tables.lock().await;

        let Some(win) = tables.wins.iter_mut().find(|w| {
            w.tenant_id == tenant.0
                && w.id == user_win_id
                && w.payment_status == PaymentStatus::Pendente
        }) else {
            return Ok(None);
        };
        win.payment_status = PaymentStatus::Processando;

        let mut created = Vec::with_capacity(installments.len());
        for installment in installments {
            let row = InstallmentPayment {
                id: tables.allocate_id(),
                tenant_id: tenant.0,
                user_win_id,
                installment_number: installment.installment_number,
                total_installments: installment.total_installments,
                amount: installment.amount,
                due_date: installment.due_date,
                status: PaymentStatus::Pendente,
            };
            tables.installments.push(row.clone());
            created.push(row);
        }

        Ok(Some(created))
    }
}
