// region:    --- Imports
use super::{queries, AuctionRepository, RepoResult};
use crate::auction::model::{Auction, Lot, NewLot};
use crate::bidding::model::{Bid, NewBid, ResolvedBidFilter, User};
use crate::business_code::model::{EntityType, PlatformSettings};
use crate::database::DatabaseManager;
use crate::ids::TenantId;
use crate::payments::model::{InstallmentPayment, NewInstallment, UserWin};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Repository
pub struct PostgresRepository {
    db: Arc<DatabaseManager>,
}

impl PostgresRepository {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuctionRepository for PostgresRepository {
    async fn auction_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<Auction>> {
        debug!("{:<12} --> auction id={} tenant={}", "Query", id, tenant);
        sqlx::query_as::<_, Auction>(queries::GET_AUCTION_BY_ID)
            .bind(tenant.0)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn auction_by_public_id(
        &self,
        tenant: TenantId,
        public_id: &str,
    ) -> RepoResult<Option<Auction>> {
        debug!("{:<12} --> auction public_id={} tenant={}", "Query", public_id, tenant);
        sqlx::query_as::<_, Auction>(queries::GET_AUCTION_BY_PUBLIC_ID)
            .bind(tenant.0)
            .bind(public_id)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn lot_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<Lot>> {
        debug!("{:<12} --> lot id={} tenant={}", "Query", id, tenant);
        sqlx::query_as::<_, Lot>(queries::GET_LOT_BY_ID)
            .bind(tenant.0)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn lot_by_public_id(
        &self,
        tenant: TenantId,
        public_id: &str,
    ) -> RepoResult<Option<Lot>> {
        debug!("{:<12} --> lot public_id={} tenant={}", "Query", public_id, tenant);
        sqlx::query_as::<_, Lot>(queries::GET_LOT_BY_PUBLIC_ID)
            .bind(tenant.0)
            .bind(public_id)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn user_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<User>> {
        sqlx::query_as::<_, User>(queries::GET_USER_BY_ID)
            .bind(tenant.0)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn user_by_handle(&self, tenant: TenantId, handle: &str) -> RepoResult<Option<User>> {
        sqlx::query_as::<_, User>(queries::GET_USER_BY_HANDLE)
            .bind(tenant.0)
            .bind(handle)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn highest_active_bid(&self, tenant: TenantId, lot_id: i64) -> RepoResult<Option<i64>> {
        let row = sqlx::query(queries::GET_HIGHEST_ACTIVE_BID)
            .bind(tenant.0)
            .bind(lot_id)
            .fetch_one(self.db.pool())
            .await?;
        row.try_get("highest_bid")
    }

    async fn commit_bid(
        &self,
        tenant: TenantId,
        bid: NewBid,
        expected_version: i64,
    ) -> RepoResult<Option<(Bid, Lot)>> {
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    let lot = sqlx::query_as::<_, Lot>(queries::UPDATE_LOT_PRICE_IF_VERSION)
                        .bind(bid.amount)
                        .bind(tenant.0)
                        .bind(bid.lot_id)
                        .bind(expected_version)
                        .bind(bid.timestamp)
                        .fetch_optional(&mut **tx)
                        .await?;

                    let Some(lot) = lot else {
                        debug!(
                            "{:<12} --> lot {} moved past version {}",
                            "Command", bid.lot_id, expected_version
                        );
                        return Ok(None);
                    };

                    let created = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(tenant.0)
                        .bind(bid.lot_id)
                        .bind(bid.auction_id)
                        .bind(bid.bidder_id)
                        .bind(bid.amount)
                        .bind(bid.is_auto_bid)
                        .bind(bid.timestamp)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok(Some((created, lot)))
                })
            })
            .await
    }

    async fn list_bids(&self, tenant: TenantId, filter: ResolvedBidFilter) -> RepoResult<Vec<Bid>> {
        sqlx::query_as::<_, Bid>(queries::LIST_BIDS)
            .bind(tenant.0)
            .bind(filter.lot_id)
            .bind(filter.auction_id)
            .bind(filter.bidder_id)
            .fetch_all(self.db.pool())
            .await
    }

    async fn relist_lot(
        &self,
        tenant: TenantId,
        original_lot_id: i64,
        expected_version: i64,
        new_lot: NewLot,
    ) -> RepoResult<Option<Lot>> {
        let now = Utc::now();
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    let flagged = sqlx::query(queries::MARK_LOT_RELISTED)
                        .bind(tenant.0)
                        .bind(original_lot_id)
                        .bind(expected_version)
                        .bind(now)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if flagged.is_none() {
                        return Ok(None);
                    }

                    let created = sqlx::query_as::<_, Lot>(queries::INSERT_RELISTED_LOT)
                        .bind(&new_lot.public_id)
                        .bind(tenant.0)
                        .bind(new_lot.auction_id)
                        .bind(&new_lot.title)
                        .bind(new_lot.initial_price)
                        .bind(new_lot.evaluation_value)
                        .bind(new_lot.bid_increment_step)
                        .bind(new_lot.status.as_str())
                        .bind(new_lot.original_lot_id)
                        .bind(now)
                        .fetch_one(&mut **tx)
                        .await?;

                    info!(
                        "{:<12} --> lot {} relisted as {}",
                        "Command", original_lot_id, created.id
                    );
                    Ok(Some(created))
                })
            })
            .await
    }

    async fn platform_settings(&self, tenant: TenantId) -> RepoResult<Option<PlatformSettings>> {
        sqlx::query_as::<_, PlatformSettings>(queries::GET_PLATFORM_SETTINGS)
            .bind(tenant.0)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn next_sequence(
        &self,
        tenant: TenantId,
        entity: EntityType,
        prefix: &str,
    ) -> RepoResult<i64> {
        let row = sqlx::query(queries::NEXT_SEQUENCE)
            .bind(tenant.0)
            .bind(entity.as_str())
            .bind(prefix)
            .fetch_one(self.db.pool())
            .await?;
        row.try_get("last_value")
    }

    async fn user_win_by_id(&self, tenant: TenantId, id: i64) -> RepoResult<Option<UserWin>> {
        sqlx::query_as::<_, UserWin>(queries::GET_USER_WIN_BY_ID)
            .bind(tenant.0)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn start_checkout(
        &self,
        tenant: TenantId,
        user_win_id: i64,
        installments: Vec<NewInstallment>,
    ) -> RepoResult<Option<Vec<InstallmentPayment>>> {
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    let flipped = sqlx::query(queries::MARK_WIN_PROCESSING)
                        .bind(tenant.0)
                        .bind(user_win_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if flipped.is_none() {
                        return Ok(None);
                    }

                    let mut created = Vec::with_capacity(installments.len());
                    for installment in installments {
                        let row =
                            sqlx::query_as::<_, InstallmentPayment>(queries::INSERT_INSTALLMENT)
                                .bind(tenant.0)
                                .bind(user_win_id)
                                .bind(installment.installment_number)
                                .bind(installment.total_installments)
                                .bind(installment.amount)
                                .bind(installment.due_date)
                                .fetch_one(&mut **tx)
                                .await?;
                        created.push(row);
                    }
                    Ok(Some(created))
                })
            })
            .await
    }
}

// endregion: --- Postgres Repository
