// region:    --- Imports
use crate::auction::events::LotEvent;
use crate::auction::model::{Lot, NewLot};
use crate::bidding::queries::{find_auction, get_lot};
use crate::business_code::generate_next_code;
use crate::business_code::model::EntityType;
use crate::error::{AppError, AppResult};
use crate::event_store::{record_event, EventStore};
use crate::ids::{Identifier, TenantId};
use crate::repository::AuctionRepository;
use crate::status::LotStatus;
use chrono::Utc;
use tracing::info;

// endregion: --- Imports

#[derive(Debug, Clone, PartialEq)]
pub struct RelistLotCommand {
    pub tenant_id: TenantId,
    pub original_lot: Identifier,
    pub new_auction: Identifier,
    /// Whole percent off the base price, `0..=100`.
    pub discount_percentage: Option<i64>,
}

/// `base` minus `discount` percent, rounded down to the centavo.
pub fn discounted_price(base: i64, discount_percentage: Option<i64>) -> AppResult<i64> {
    let Some(discount) = discount_percentage else {
        return Ok(base);
    };
    let price = i128::from(base) * (100 - i128::from(discount)) / 100;
    i64::try_from(price).map_err(|_| {
        AppError::Validation(format!(
            "Preço com desconto fora do intervalo suportado (base {base}, desconto {discount})."
        ))
    })
}

/// Copy an unsold lot into another auction at an optional discount, retiring the original.
pub async fn handle_relist_lot(
    cmd: RelistLotCommand,
    repo: &dyn AuctionRepository,
    event_store: &dyn EventStore,
) -> AppResult<Lot> {
    info!(
        "{:<12} --> relist lot={} into auction={} discount={:?} tenant={}",
        "Command", cmd.original_lot, cmd.new_auction, cmd.discount_percentage, cmd.tenant_id
    );
    let tenant = cmd.tenant_id;

    if let Some(discount) = cmd.discount_percentage {
        if !(0..=100).contains(&discount) {
            return Err(AppError::Validation(format!(
                "O desconto deve estar entre 0 e 100 (informado: {discount})."
            )));
        }
    }

    let original = get_lot(repo, tenant, &cmd.original_lot).await?;
    let auction = find_auction(repo, tenant, &cmd.new_auction)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Leilão {} não encontrado.", cmd.new_auction))
        })?;

    if auction.id == original.auction_id {
        return Err(AppError::Validation(
            "O novo leilão deve ser diferente do leilão atual do lote.".to_string(),
        ));
    }
    if auction.status.is_closed() {
        return Err(AppError::InvalidState(format!(
            "O leilão {} está {} e não recebe novos lotes.",
            auction.public_id, auction.status
        )));
    }
    if !original.status.can_be_relisted() {
        return Err(AppError::InvalidState(format!(
            "O lote {} não pode ser relistado (status: {}).",
            original.public_id, original.status
        )));
    }

    let initial_price =
        discounted_price(original.relist_base_price(), cmd.discount_percentage)?;
    let public_id = generate_next_code(repo, EntityType::Lot, tenant).await?;

    let new_lot = NewLot {
        public_id,
        auction_id: auction.id,
        title: original.title.clone(),
        initial_price,
        evaluation_value: original.evaluation_value,
        bid_increment_step: original.bid_increment_step,
        status: LotStatus::EmBreve,
        original_lot_id: original.id,
    };

    let created = repo
        .relist_lot(tenant, original.id, original.version, new_lot)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!(
                "O lote {} foi alterado durante a relistagem. Tente novamente.",
                original.public_id
            ))
        })?;

    let event = LotEvent::LotRelisted {
        original_lot_id: original.id,
        new_lot_id: created.id,
        new_auction_id: auction.id,
        initial_price,
        discount_percentage: cmd.discount_percentage,
        timestamp: created.created_at,
    };
    record_event(event_store, tenant, event, original.version + 1).await;

    Ok(created)
}
