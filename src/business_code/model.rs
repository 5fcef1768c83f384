use serde::{Deserialize, Serialize};
use std::fmt;

/// Entities that carry a human-readable business code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Auction,
    Lot,
    Seller,
    Auctioneer,
    Asset,
    JudicialProcess,
    Category,
}

impl EntityType {
    /// Text substituted for `{TYPE}` in a mask.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            EntityType::Auction => "AUC",
            EntityType::Lot => "LOT",
            EntityType::Seller => "SEL",
            EntityType::Auctioneer => "LEI",
            EntityType::Asset => "BEM",
            EntityType::JudicialProcess => "PRC",
            EntityType::Category => "CAT",
        }
    }

    /// Stable key used by the counter table.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Auction => "auction",
            EntityType::Lot => "lot",
            EntityType::Seller => "seller",
            EntityType::Auctioneer => "auctioneer",
            EntityType::Asset => "asset",
            EntityType::JudicialProcess => "judicialProcess",
            EntityType::Category => "category",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant-scoped platform configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSettings {
    pub tenant_id: i64,
    pub auction_code_mask: Option<String>,
    pub lot_code_mask: Option<String>,
    pub seller_code_mask: Option<String>,
    pub auctioneer_code_mask: Option<String>,
    pub asset_code_mask: Option<String>,
    pub judicial_process_code_mask: Option<String>,
    pub category_code_mask: Option<String>,
    /// Centavos; used when neither the caller nor the lot sets an increment.
    pub default_bid_increment: Option<i64>,
}

impl PlatformSettings {
    pub fn mask_for(&self, entity: EntityType) -> Option<&str> {
        let mask = match entity {
            EntityType::Auction => &self.auction_code_mask,
            EntityType::Lot => &self.lot_code_mask,
            EntityType::Seller => &self.seller_code_mask,
            EntityType::Auctioneer => &self.auctioneer_code_mask,
            EntityType::Asset => &self.asset_code_mask,
            EntityType::JudicialProcess => &self.judicial_process_code_mask,
            EntityType::Category => &self.category_code_mask,
        };
        mask.as_deref().filter(|m| !m.trim().is_empty())
    }
}
