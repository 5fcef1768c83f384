use crate::ids::{Identifier, TenantId};
use crate::status::BidStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monetary offer against a lot. Never mutated by this service once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: i64,
    pub tenant_id: i64,
    pub lot_id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    #[sqlx(try_from = "String")]
    pub status: BidStatus,
    pub is_auto_bid: bool,
    pub timestamp: DateTime<Utc>,
}

/// A registered bidder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub tenant_id: i64,
    pub email: String,
    pub full_name: Option<String>,
}

/// Row to insert once a bid has been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBid {
    pub lot_id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub is_auto_bid: bool,
    pub timestamp: DateTime<Utc>,
}

/// Request to place a bid, as received at the boundary.
#[derive(Debug, Clone)]
pub struct PlaceBidCommand {
    pub tenant_id: TenantId,
    pub lot: Identifier,
    pub bidder: Identifier,
    pub amount: i64,
    pub is_auto_bid: bool,
    /// Overrides every configured increment when present.
    pub bid_increment: Option<i64>,
}

/// Outcome of a successful placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBid {
    pub bid: Bid,
    pub previous_highest: i64,
    pub new_highest: i64,
}

/// Filters for bid listings; every field is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidFilter {
    pub lot: Option<Identifier>,
    pub auction: Option<Identifier>,
    pub bidder: Option<Identifier>,
}

/// The same filter once every identifier is resolved to a primary key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedBidFilter {
    pub lot_id: Option<i64>,
    pub auction_id: Option<i64>,
    pub bidder_id: Option<i64>,
}
