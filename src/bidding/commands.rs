// region:    --- Imports
use super::model::{NewBid, PlaceBidCommand, PlacedBid};
use super::queries::{find_bidder, get_lot, get_lot_auction, price_lot};
use super::rules::format_brl;
use crate::auction::events::LotEvent;
use crate::config::BiddingSettings;
use crate::error::{AppError, AppResult};
use crate::event_store::{record_event, EventStore};
use crate::repository::AuctionRepository;
use chrono::Utc;
use tracing::{info, warn};

// endregion: --- Imports

/// Attempts before a bid that keeps losing the version race gives up.
pub const MAX_BID_RETRIES: u32 = 100;

// region:    --- Place Bid
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    repo: &dyn AuctionRepository,
    event_store: &dyn EventStore,
    settings: &BiddingSettings,
) -> AppResult<PlacedBid> {
    info!(
        "{:<12} --> place bid lot={} bidder={} amount={} tenant={}",
        "Command", cmd.lot, cmd.bidder, cmd.amount, cmd.tenant_id
    );

    let tenant = cmd.tenant_id;
    let mut retries = 0;

    while retries < MAX_BID_RETRIES {
        let lot = get_lot(repo, tenant, &cmd.lot).await?;

        let auction = get_lot_auction(repo, tenant, &lot).await?;
        if !auction.status.accepts_bids() {
            return Err(AppError::InvalidState(format!(
                "O leilão não está aberto para lances (status: {}).",
                auction.status
            )));
        }
        if cmd.amount <= 0 {
            return Err(AppError::Validation(
                "O valor do lance deve ser positivo.".to_string(),
            ));
        }
        if matches!(cmd.bid_increment, Some(step) if step <= 0) {
            return Err(AppError::Validation(
                "O incremento do lance deve ser positivo.".to_string(),
            ));
        }

        let bidder = find_bidder(repo, tenant, &cmd.bidder)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Licitante {} não encontrado.", cmd.bidder))
            })?;

        let pricing = price_lot(repo, settings, tenant, &lot, cmd.bid_increment).await?;
        if cmd.amount < pricing.minimum_bid {
            return Err(AppError::Validation(format!(
                "O lance mínimo é {} (lance atual {} + incremento {}); valor informado: {}.",
                format_brl(pricing.minimum_bid),
                format_brl(pricing.current_price),
                format_brl(pricing.increment),
                format_brl(cmd.amount),
            )));
        }

        let new_bid = NewBid {
            lot_id: lot.id,
            auction_id: lot.auction_id,
            bidder_id: bidder.id,
            amount: cmd.amount,
            is_auto_bid: cmd.is_auto_bid,
            timestamp: Utc::now(),
        };

        match repo.commit_bid(tenant, new_bid, lot.version).await? {
            Some((bid, updated_lot)) => {
                info!(
                    "{:<12} --> bid {} accepted on lot {} ({} -> {})",
                    "Command",
                    bid.id,
                    updated_lot.id,
                    format_brl(pricing.current_price),
                    format_brl(bid.amount)
                );

                let event = LotEvent::BidPlaced {
                    bid_id: bid.id,
                    lot_id: bid.lot_id,
                    auction_id: bid.auction_id,
                    bidder_id: bid.bidder_id,
                    amount: bid.amount,
                    previous_highest: pricing.current_price,
                    is_auto_bid: bid.is_auto_bid,
                    timestamp: bid.timestamp,
                };
                record_event(event_store, tenant, event, updated_lot.version).await;

                return Ok(PlacedBid {
                    previous_highest: pricing.current_price,
                    new_highest: bid.amount,
                    bid,
                });
            }
            None => {
                retries += 1;
                warn!(
                    "{:<12} --> version conflict on lot {}, retrying ({}/{})",
                    "Command", lot.id, retries, MAX_BID_RETRIES
                );
            }
        }
    }

    Err(AppError::Conflict(
        "O lote foi atualizado por outro lance. Tente novamente.".to_string(),
    ))
}

// endregion: --- Place Bid
