// region:    --- Imports
use super::model::{Bid, BidFilter, ResolvedBidFilter, User};
use super::rules;
use crate::auction::model::{Auction, Lot};
use crate::config::BiddingSettings;
use crate::error::{AppError, AppResult};
use crate::ids::{Identifier, TenantId};
use crate::repository::AuctionRepository;
use crate::status::AuctionStatus;
use serde::Serialize;
use tracing::debug;

// endregion: --- Imports

// region:    --- Resolution
// Numeric keys are tried first, then the textual handle.

pub async fn find_lot(
    repo: &dyn AuctionRepository,
    tenant: TenantId,
    lot: &Identifier,
) -> AppResult<Option<Lot>> {
    if let Some(id) = lot.numeric() {
        if let Some(found) = repo.lot_by_id(tenant, id).await? {
            return Ok(Some(found));
        }
    }
    Ok(repo.lot_by_public_id(tenant, &lot.text()).await?)
}

pub async fn find_auction(
    repo: &dyn AuctionRepository,
    tenant: TenantId,
    auction: &Identifier,
) -> AppResult<Option<Auction>> {
    if let Some(id) = auction.numeric() {
        if let Some(found) = repo.auction_by_id(tenant, id).await? {
            return Ok(Some(found));
        }
    }
    Ok(repo.auction_by_public_id(tenant, &auction.text()).await?)
}

/// Bidders also resolve by e-mail.
pub async fn find_bidder(
    repo: &dyn AuctionRepository,
    tenant: TenantId,
    bidder: &Identifier,
) -> AppResult<Option<User>> {
    if let Some(id) = bidder.numeric() {
        if let Some(found) = repo.user_by_id(tenant, id).await? {
            return Ok(Some(found));
        }
    }
    Ok(repo.user_by_handle(tenant, &bidder.text()).await?)
}

pub async fn get_lot(
    repo: &dyn AuctionRepository,
    tenant: TenantId,
    lot: &Identifier,
) -> AppResult<Lot> {
    find_lot(repo, tenant, lot)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lote {} não encontrado.", lot)))
}

/// Parent auction of a lot. A dangling reference is reported as not found.
pub async fn get_lot_auction(
    repo: &dyn AuctionRepository,
    tenant: TenantId,
    lot: &Lot,
) -> AppResult<Auction> {
    repo.auction_by_id(tenant, lot.auction_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Leilão do lote {} não encontrado.", lot.public_id))
        })
}

// endregion: --- Resolution

// region:    --- Bid History
/// Bids matching every given filter, newest first. A filter naming an entity
/// that does not exist in the tenant matches nothing.
pub async fn list_bids(
    repo: &dyn AuctionRepository,
    tenant: TenantId,
    filter: BidFilter,
) -> AppResult<Vec<Bid>> {
    let mut resolved = ResolvedBidFilter::default();

    if let Some(lot) = &filter.lot {
        match find_lot(repo, tenant, lot).await? {
            Some(found) => resolved.lot_id = Some(found.id),
            None => return Ok(Vec::new()),
        }
    }
    if let Some(auction) = &filter.auction {
        match find_auction(repo, tenant, auction).await? {
            Some(found) => resolved.auction_id = Some(found.id),
            None => return Ok(Vec::new()),
        }
    }
    if let Some(bidder) = &filter.bidder {
        match find_bidder(repo, tenant, bidder).await? {
            Some(found) => resolved.bidder_id = Some(found.id),
            None => return Ok(Vec::new()),
        }
    }

    debug!("{:<12} --> bids {:?} tenant={}", "Query", resolved, tenant);
    Ok(repo.list_bids(tenant, resolved).await?)
}

// endregion: --- Bid History

// region:    --- Lot Quote
/// What a bidder needs to know before placing a bid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotQuote {
    pub lot: Lot,
    pub auction_status: AuctionStatus,
    pub current_price: i64,
    pub bid_increment: i64,
    pub minimum_bid: i64,
    pub accepting_bids: bool,
}

/// Price a lot the same way bid placement does.
pub async fn quote_lot(
    repo: &dyn AuctionRepository,
    settings: &BiddingSettings,
    tenant: TenantId,
    lot: &Identifier,
) -> AppResult<LotQuote> {
    let lot = get_lot(repo, tenant, lot).await?;
    let auction = get_lot_auction(repo, tenant, &lot).await?;
    let pricing = price_lot(repo, settings, tenant, &lot, None).await?;

    Ok(LotQuote {
        auction_status: auction.status,
        accepting_bids: auction.status.accepts_bids(),
        current_price: pricing.current_price,
        bid_increment: pricing.increment,
        minimum_bid: pricing.minimum_bid,
        lot,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pricing {
    pub current_price: i64,
    pub increment: i64,
    pub minimum_bid: i64,
}

pub(crate) async fn price_lot(
    repo: &dyn AuctionRepository,
    settings: &BiddingSettings,
    tenant: TenantId,
    lot: &Lot,
    requested_increment: Option<i64>,
) -> AppResult<Pricing> {
    let highest = repo.highest_active_bid(tenant, lot.id).await?;
    let current_price = rules::current_price(highest, lot.opening_price());

    let lot_step = lot.bid_increment_step.filter(|step| *step > 0);
    let tenant_default = if requested_increment.is_none() && lot_step.is_none() {
        repo.platform_settings(tenant)
            .await?
            .and_then(|s| s.default_bid_increment)
    } else {
        None
    };
    let increment = rules::resolve_increment(
        requested_increment,
        lot_step,
        tenant_default,
        settings.default_bid_increment,
    );

    Ok(Pricing {
        current_price,
        increment,
        minimum_bid: rules::minimum_bid(current_price, increment),
    })
}

// endregion: --- Lot Quote
