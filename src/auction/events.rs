use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain events emitted after a command commits.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum LotEvent {
    #[serde(rename_all = "camelCase")]
    BidPlaced {
        bid_id: i64,
        lot_id: i64,
        auction_id: i64,
        bidder_id: i64,
        amount: i64,
        previous_highest: i64,
        is_auto_bid: bool,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    LotRelisted {
        original_lot_id: i64,
        new_lot_id: i64,
        new_auction_id: i64,
        initial_price: i64,
        discount_percentage: Option<i64>,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    CheckoutStarted {
        user_win_id: i64,
        lot_id: i64,
        installments: u32,
        total_amount: i64,
        timestamp: DateTime<Utc>,
    },
}

impl LotEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LotEvent::BidPlaced { .. } => "BidPlaced",
            LotEvent::LotRelisted { .. } => "LotRelisted",
            LotEvent::CheckoutStarted { .. } => "CheckoutStarted",
        }
    }

    /// Kind of row the event hangs off, used to namespace event versions.
    pub fn aggregate_type(&self) -> &'static str {
        match self {
            LotEvent::BidPlaced { .. } | LotEvent::LotRelisted { .. } => "Lot",
            LotEvent::CheckoutStarted { .. } => "UserWin",
        }
    }

    pub fn aggregate_id(&self) -> i64 {
        match self {
            LotEvent::BidPlaced { lot_id, .. } => *lot_id,
            LotEvent::LotRelisted {
                original_lot_id, ..
            } => *original_lot_id,
            LotEvent::CheckoutStarted { user_win_id, .. } => *user_win_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LotEvent::BidPlaced { timestamp, .. }
            | LotEvent::LotRelisted { timestamp, .. }
            | LotEvent::CheckoutStarted { timestamp, .. } => *timestamp,
        }
    }
}
