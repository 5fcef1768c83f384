mod common;

use bidexpert_bidding::auction::events::LotEvent;
use bidexpert_bidding::auction::model::Lot;
use bidexpert_bidding::bidding::commands::handle_place_bid;
use bidexpert_bidding::bidding::model::PlaceBidCommand;
use bidexpert_bidding::error::AppError;
use bidexpert_bidding::ids::Identifier;
use bidexpert_bidding::relisting::{handle_relist_lot, RelistLotCommand};
use bidexpert_bidding::repository::AuctionRepository;
use bidexpert_bidding::status::{AuctionStatus, LotStatus};
use chrono::Utc;
use common::{setup, Fixture, OTHER_TENANT, TENANT};

/// Unsold lot appraised at R$ 1.000,00 plus a second auction to move it into.
async fn setup_unsold() -> (Fixture, Lot, i64) {
    let fx = setup().await;

    let mut unsold = common::lot(TENANT, fx.auction.id, "LOT-202501-00009", 80_000);
    unsold.evaluation_value = Some(100_000);
    unsold.bid_increment_step = Some(5_000);
    unsold.status = LotStatus::NaoVendido;
    let unsold = fx.repo.insert_lot(unsold).await;

    let next = fx
        .repo
        .insert_auction(common::auction(
            TENANT,
            "AUC-202502-00001",
            AuctionStatus::EmBreve,
        ))
        .await;

    (fx, unsold, next.id)
}

fn relist(lot: &Lot, new_auction: i64, discount: Option<i64>) -> RelistLotCommand {
    RelistLotCommand {
        tenant_id: TENANT,
        original_lot: Identifier::from(lot.id),
        new_auction: Identifier::from(new_auction),
        discount_percentage: discount,
    }
}

#[tokio::test]
async fn test_relist_with_half_discount() {
    let (fx, original, next_auction) = setup_unsold().await;

    let created = handle_relist_lot(
        relist(&original, next_auction, Some(50)),
        fx.repo.as_ref(),
        fx.events.as_ref(),
    )
    .await
    .unwrap();

    assert_eq!(created.auction_id, next_auction);
    assert_eq!(created.price, 50_000);
    assert_eq!(created.initial_price, Some(50_000));
    assert_eq!(created.evaluation_value, Some(100_000));
    assert_eq!(created.bid_increment_step, Some(5_000));
    assert_eq!(created.status, LotStatus::EmBreve);
    assert_eq!(created.bids_count, 0);
    assert!(created.is_relisted);
    assert_eq!(created.original_lot_id, Some(original.id));
    assert_eq!(created.title, original.title);

    let today = Utc::now().format("%Y%m").to_string();
    assert_eq!(created.public_id, format!("LOT-{today}-00001"));

    let original = fx
        .repo
        .lot_by_id(TENANT, original.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(original.status, LotStatus::Relistado);
}

#[tokio::test]
async fn test_relist_without_discount_keeps_base_price() {
    let (fx, mut original, next_auction) = setup_unsold().await;
    original.evaluation_value = None;
    let original = fx.repo.insert_lot(original).await;

    let created = handle_relist_lot(
        relist(&original, next_auction, None),
        fx.repo.as_ref(),
        fx.events.as_ref(),
    )
    .await
    .unwrap();
    assert_eq!(created.price, 80_000);
}

#[tokio::test]
async fn test_relist_by_public_ids_records_event() {
    let (fx, original, next_auction) = setup_unsold().await;

    let cmd = RelistLotCommand {
        tenant_id: TENANT,
        original_lot: Identifier::from(original.public_id.as_str()),
        new_auction: Identifier::from("AUC-202502-00001"),
        discount_percentage: Some(25),
    };
    let created = handle_relist_lot(cmd, fx.repo.as_ref(), fx.events.as_ref())
        .await
        .unwrap();
    assert_eq!(created.price, 75_000);

    let events = fx.events.events().await;
    assert_eq!(events.len(), 1);
    match events[0].decode().unwrap() {
        LotEvent::LotRelisted {
            original_lot_id,
            new_lot_id,
            new_auction_id,
            initial_price,
            discount_percentage,
            ..
        } => {
            assert_eq!(original_lot_id, original.id);
            assert_eq!(new_lot_id, created.id);
            assert_eq!(new_auction_id, next_auction);
            assert_eq!(initial_price, 75_000);
            assert_eq!(discount_percentage, Some(25));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_relist_rejections() {
    let (fx, original, next_auction) = setup_unsold().await;
    let run = |cmd: RelistLotCommand| {
        let repo = fx.repo.clone();
        let events = fx.events.clone();
        async move { handle_relist_lot(cmd, repo.as_ref(), events.as_ref()).await }
    };

    // Discount out of range.
    for discount in [-1, 101] {
        let err = run(relist(&original, next_auction, Some(discount)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{discount}");
    }

    // Same auction the lot is already in.
    let err = run(relist(&original, fx.auction.id, None)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Unknown lot and auction.
    let err = run(relist(&original, 9_999, None)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let mut cmd = relist(&original, next_auction, None);
    cmd.original_lot = Identifier::from("LOT-000000-00000");
    assert!(matches!(run(cmd).await, Err(AppError::NotFound(_))));

    // Another tenant cannot reach the lot.
    let mut cmd = relist(&original, next_auction, None);
    cmd.tenant_id = OTHER_TENANT;
    assert!(matches!(run(cmd).await, Err(AppError::NotFound(_))));

    // Destination already closed.
    fx.repo
        .set_auction_status(TENANT, next_auction, AuctionStatus::Finalizado)
        .await;
    let err = run(relist(&original, next_auction, None)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    assert!(fx.events.events().await.is_empty());
}

#[tokio::test]
async fn test_sold_or_already_relisted_lot_cannot_be_relisted() {
    let (fx, original, next_auction) = setup_unsold().await;

    handle_relist_lot(
        relist(&original, next_auction, Some(10)),
        fx.repo.as_ref(),
        fx.events.as_ref(),
    )
    .await
    .unwrap();
    let again = handle_relist_lot(
        relist(&original, next_auction, Some(10)),
        fx.repo.as_ref(),
        fx.events.as_ref(),
    )
    .await;
    assert!(matches!(again, Err(AppError::InvalidState(_))));

    let mut sold = common::lot(TENANT, fx.auction.id, "LOT-202501-00010", 10_000);
    sold.status = LotStatus::Vendido;
    let sold = fx.repo.insert_lot(sold).await;
    let err = handle_relist_lot(
        relist(&sold, next_auction, None),
        fx.repo.as_ref(),
        fx.events.as_ref(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_relist_without_platform_settings_changes_nothing() {
    let fx = setup().await;
    let mut foreign_lot = common::lot(OTHER_TENANT, 0, "LOT-X", 1_000);
    foreign_lot.status = LotStatus::NaoVendido;
    let foreign_lot = fx.repo.insert_lot(foreign_lot).await;
    let foreign_auction = fx
        .repo
        .insert_auction(common::auction(
            OTHER_TENANT,
            "AUC-X",
            AuctionStatus::EmBreve,
        ))
        .await;

    let cmd = RelistLotCommand {
        tenant_id: OTHER_TENANT,
        original_lot: Identifier::from(foreign_lot.id),
        new_auction: Identifier::from(foreign_auction.id),
        discount_percentage: None,
    };
    let err = handle_relist_lot(cmd, fx.repo.as_ref(), fx.events.as_ref())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let untouched = fx
        .repo
        .lot_by_id(OTHER_TENANT, foreign_lot.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, LotStatus::NaoVendido);
}

#[tokio::test]
async fn test_live_lot_cannot_be_relisted() {
    let (fx, _, next_auction) = setup_unsold().await;
    let place = |amount: i64| PlaceBidCommand {
        tenant_id: TENANT,
        lot: Identifier::from(fx.lot.id),
        bidder: Identifier::from(fx.bidder.id),
        amount,
        is_auto_bid: false,
        bid_increment: None,
    };

    handle_place_bid(place(100_100), fx.repo.as_ref(), fx.events.as_ref(), &fx.settings)
        .await
        .unwrap();

    let err = handle_relist_lot(
        relist(&fx.lot, next_auction, Some(50)),
        fx.repo.as_ref(),
        fx.events.as_ref(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let lot = fx.repo.lot_by_id(TENANT, fx.lot.id).await.unwrap().unwrap();
    assert_eq!(lot.status, LotStatus::AbertoParaLances);
    handle_place_bid(place(100_200), fx.repo.as_ref(), fx.events.as_ref(), &fx.settings)
        .await
        .unwrap();

    for status in [LotStatus::EmBreve, LotStatus::Rascunho] {
        let mut pending = common::lot(TENANT, fx.auction.id, "LOT-202501-00011", 10_000);
        pending.status = status;
        let pending = fx.repo.insert_lot(pending).await;
        let err = handle_relist_lot(
            relist(&pending, next_auction, None),
            fx.repo.as_ref(),
            fx.events.as_ref(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)), "{status}");
    }
}

#[tokio::test]
async fn test_withdrawn_and_cancelled_lots_can_be_relisted() {
    let (fx, _, next_auction) = setup_unsold().await;

    for (status, public_id) in [
        (LotStatus::Encerrado, "LOT-202501-00020"),
        (LotStatus::Cancelado, "LOT-202501-00021"),
        (LotStatus::Retirado, "LOT-202501-00022"),
    ] {
        let mut closed = common::lot(TENANT, fx.auction.id, public_id, 10_000);
        closed.status = status;
        let closed = fx.repo.insert_lot(closed).await;
        let created = handle_relist_lot(
            relist(&closed, next_auction, None),
            fx.repo.as_ref(),
            fx.events.as_ref(),
        )
        .await
        .unwrap();
        assert_eq!(created.price, 10_000, "{status}");
    }
}
