use crate::status::{AuctionStatus, LotStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sale event run by a tenant; owns its lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: i64,
    pub public_id: String,
    pub tenant_id: i64,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub status: AuctionStatus,
    pub auction_type: Option<String>,
    pub seller_id: Option<i64>,
    pub auctioneer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A single auctionable item (or bundle) inside an auction. Money is in centavos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: i64,
    pub public_id: String,
    pub tenant_id: i64,
    pub auction_id: i64,
    pub title: String,
    /// Current leading price.
    pub price: i64,
    pub initial_price: Option<i64>,
    pub evaluation_value: Option<i64>,
    pub bid_increment_step: Option<i64>,
    #[sqlx(try_from = "String")]
    pub status: LotStatus,
    pub bids_count: i32,
    pub winner_id: Option<i64>,
    pub is_relisted: bool,
    pub original_lot_id: Option<i64>,
    /// Optimistic lock counter, bumped by every write to the row.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lot {
    /// Price a first bid is measured against.
    pub fn opening_price(&self) -> i64 {
        self.initial_price.unwrap_or(self.price)
    }

    /// Price a relisting discount is taken from: the appraisal when there is one.
    pub fn relist_base_price(&self) -> i64 {
        self.evaluation_value.unwrap_or_else(|| self.opening_price())
    }
}

/// Fields for a lot created by the service (relisting).
#[derive(Debug, Clone, PartialEq)]
pub struct NewLot {
    pub public_id: String,
    pub auction_id: i64,
    pub title: String,
    pub initial_price: i64,
    pub evaluation_value: Option<i64>,
    pub bid_increment_step: Option<i64>,
    pub status: LotStatus,
    pub original_lot_id: i64,
}
