//! Tenant-scoped data access.
//!
//! Every method takes the [`TenantId`] it operates under and filters every read and
//! write by it, so a call site cannot reach another tenant's rows by forgetting a
//! `WHERE` clause. Writes that must be atomic are single methods here and run inside
//! one transaction in the Postgres backend.
// region:    --- Imports
use crate::auction::model::{Auction, Lot, NewLot};
use crate::bidding::model::{Bid, NewBid, ResolvedBidFilter, User};
use crate::business_code::model::{EntityType, PlatformSettings};
use crate::ids::TenantId;
use crate::payments::model::{InstallmentPayment, NewInstallment, UserWin};
use async_trait::async_trait;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;
pub mod queries;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

// endregion: --- Modules

pub type RepoResult<T> = Result<T, sqlx::Error>;

// region:    --- Repository Trait
#[async_trait]
pub trait AuctionRepository: Send + Sync {
    async fn auction_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<Auction>>;
    async fn auction_by_public_id(
        &self,
        tenant: TenantId,
        public_id: &str,
    ) -> RepoResult<Option<Auction>>;

    async fn lot_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<Lot>>;
    async fn lot_by_public_id(&self, tenant: TenantId, public_id: &str)
        -> RepoResult<Option<Lot>>;

    async fn user_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<User>>;
    /// Matches either the user's public id or their e-mail (case-insensitive).
    async fn user_by_handle(&self, tenant: TenantId, handle: &str) -> RepoResult<Option<User>>;

    /// Amount of the best `ATIVO` bid on the lot.
    async fn highest_active_bid(&self, tenant: TenantId, lot_id: i64) -> RepoResult<Option<i64>>;

    /// Insert the bid and move the lot's price, but only if the lot is still at
    /// `expected_version`. `None` means another write got there first.
    async fn commit_bid(
        &self,
        tenant: TenantId,
        bid: NewBid,
        expected_version: i64,
    ) -> RepoResult<Option<(Bid, Lot)>>;

    /// Newest first.
    async fn list_bids(&self, tenant: TenantId, filter: ResolvedBidFilter) -> RepoResult<Vec<Bid>>;

    /// Flag the original lot `RELISTADO` (if still at `expected_version`) and insert the
    /// new lot, atomically. `None` means the original changed in the meantime.
    async fn relist_lot(
        &self,
        tenant: TenantId,
        original_lot_id: i64,
        expected_version: i64,
        new_lot: NewLot,
    ) -> RepoResult<Option<Lot>>;

    async fn platform_settings(&self, tenant: TenantId) -> RepoResult<Option<PlatformSettings>>;

    /// Atomically bump the counter for `(tenant, entity, prefix)` and return the new value.
    /// A prefix seen for the first time yields 1.
    async fn next_sequence(
        &self,
        tenant: TenantId,
        entity: EntityType,
        prefix: &str,
    ) -> RepoResult<i64>;

    async fn user_win_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<UserWin>>;

    /// Move a `PENDENTE` win to `PROCESSANDO` and insert its installments, atomically.
    /// `None` means the win was no longer pending.
    async fn start_checkout(
        &self,
        tenant: TenantId,
        user_win_id: i64,
        installments: Vec<NewInstallment>,
    ) -> RepoResult<Option<Vec<InstallmentPayment>>>;
}

// endregion: --- Repository Trait
