// region:    --- Imports
use crate::bidding::commands::handle_place_bid;
use crate::bidding::model::{BidFilter, PlaceBidCommand};
use crate::bidding::queries::{list_bids, quote_lot};
use crate::config::BiddingSettings;
use crate::error::{AppError, AppResult};
use crate::event_store::EventStore;
use crate::ids::{Identifier, TenantId};
use crate::payments::handle_checkout;
use crate::relisting::{handle_relist_lot, RelistLotCommand};
use crate::repository::AuctionRepository;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

// endregion: --- Imports

// region:    --- State
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn AuctionRepository>,
    pub event_store: Arc<dyn EventStore>,
    pub settings: BiddingSettings,
}

impl AppState {
    fn tenant(&self, requested: Option<i64>) -> TenantId {
        TenantId(requested.unwrap_or(self.settings.default_tenant_id))
    }
}

// endregion: --- State

// region:    --- Request Bodies
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    pub lot_id: Option<Identifier>,
    pub bidder_id: Option<Identifier>,
    pub amount: Option<i64>,
    pub tenant_id: Option<i64>,
    pub is_auto_bid: Option<bool>,
    pub bid_increment: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidsQuery {
    pub lot_id: Option<String>,
    pub auction_id: Option<String>,
    pub bidder_id: Option<String>,
    pub tenant_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantQuery {
    pub tenant_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelistRequest {
    pub new_auction_id: Option<Identifier>,
    pub discount_percentage: Option<i64>,
    pub tenant_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub installments: Option<u32>,
    pub tenant_id: Option<i64>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        AppError::Validation(format!("Corpo inválido: {}", rejection.body_text()))
    })
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query.map(|Query(params)| params).map_err(|rejection| {
        AppError::Validation(format!("Parâmetros inválidos: {}", rejection.body_text()))
    })
}

fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::Validation(format!("Campo obrigatório ausente: {field}.")))
}

/// Blank query values count as absent.
fn filter_param(value: Option<String>) -> Option<Identifier> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(Identifier::from)
}

// endregion: --- Request Bodies

// region:    --- Command Handlers
pub async fn handle_bid(
    State(state): State<AppState>,
    payload: Result<Json<PlaceBidRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let req = json_body(payload)?;

    let cmd = PlaceBidCommand {
        tenant_id: state.tenant(req.tenant_id),
        lot: required(req.lot_id, "lotId")?,
        bidder: required(req.bidder_id, "bidderId")?,
        amount: required(req.amount, "amount")?,
        is_auto_bid: req.is_auto_bid.unwrap_or(false),
        bid_increment: req.bid_increment,
    };

    let placed = handle_place_bid(
        cmd,
        state.repo.as_ref(),
        state.event_store.as_ref(),
        &state.settings,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": placed.bid,
            "previousHighest": placed.previous_highest,
            "newHighest": placed.new_highest,
        })),
    ))
}

pub async fn handle_relist(
    State(state): State<AppState>,
    Path(lot_id): Path<String>,
    payload: Result<Json<RelistRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let req = json_body(payload)?;

    let cmd = RelistLotCommand {
        tenant_id: state.tenant(req.tenant_id),
        original_lot: Identifier::from(lot_id),
        new_auction: required(req.new_auction_id, "newAuctionId")?,
        discount_percentage: req.discount_percentage,
    };

    let created = handle_relist_lot(cmd, state.repo.as_ref(), state.event_store.as_ref()).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Lote relistado com sucesso como {}.", created.public_id),
        "newLotId": created.id,
    })))
}

pub async fn handle_win_checkout(
    State(state): State<AppState>,
    win_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(win_id) = win_id.map_err(|rejection| {
        AppError::Validation(format!("Identificador inválido: {}", rejection.body_text()))
    })?;
    let req = json_body(payload)?;

    let installments = handle_checkout(
        state.tenant(req.tenant_id),
        win_id,
        req.installments.unwrap_or(1),
        state.repo.as_ref(),
        state.event_store.as_ref(),
        &state.settings,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "data": installments,
    })))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers
pub async fn handle_get_bids(
    State(state): State<AppState>,
    query: Result<Query<BidsQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let params = query_params(query)?;
    let filter = BidFilter {
        lot: filter_param(params.lot_id),
        auction: filter_param(params.auction_id),
        bidder: filter_param(params.bidder_id),
    };

    let bids = list_bids(state.repo.as_ref(), state.tenant(params.tenant_id), filter).await?;

    Ok(Json(json!({
        "success": true,
        "count": bids.len(),
        "data": bids,
    })))
}

pub async fn handle_get_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<String>,
    query: Result<Query<TenantQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let params = query_params(query)?;
    let quote = quote_lot(
        state.repo.as_ref(),
        &state.settings,
        state.tenant(params.tenant_id),
        &Identifier::from(lot_id),
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "data": quote,
    })))
}

pub async fn handle_health() -> &'static str {
    "ok"
}

// endregion: --- Query Handlers
