pub const GET_AUCTION_BY_ID: &str = r#"
    SELECT id, public_id, tenant_id, title, status, auction_type, seller_id, auctioneer_id, created_at
    FROM auctions
    WHERE tenant_id = $1 AND id = $2
"#;

pub const GET_AUCTION_BY_PUBLIC_ID: &str = r#"
    SELECT id, public_id, tenant_id, title, status, auction_type, seller_id, auctioneer_id, created_at
    FROM auctions
    WHERE tenant_id = $1 AND public_id = $2
"#;

macro_rules! lot_columns {
    () => {
        "id, public_id, tenant_id, auction_id, title, price, initial_price, evaluation_value, \
         bid_increment_step, status, bids_count, winner_id, is_relisted, original_lot_id, version, \
         created_at, updated_at"
    };
}

pub const GET_LOT_BY_ID: &str = concat!(
    "SELECT ",
    lot_columns!(),
    " FROM lots WHERE tenant_id = $1 AND id = $2"
);

pub const GET_LOT_BY_PUBLIC_ID: &str = concat!(
    "SELECT ",
    lot_columns!(),
    " FROM lots WHERE tenant_id = $1 AND public_id = $2"
);

pub const GET_USER_BY_ID: &str =
    "SELECT id, public_id, tenant_id, email, full_name FROM users WHERE tenant_id = $1 AND id = $2";

pub const GET_USER_BY_HANDLE: &str = r#"
    SELECT id, public_id, tenant_id, email, full_name
    FROM users
    WHERE tenant_id = $1 AND (public_id = $2 OR LOWER(email) = LOWER($2))
    ORDER BY id
    LIMIT 1
"#;

/// Best active bid on a lot.
pub const GET_HIGHEST_ACTIVE_BID: &str = r#"
    SELECT MAX(amount) AS highest_bid
    FROM bids
    WHERE tenant_id = $1 AND lot_id = $2 AND status = 'ATIVO'
"#;

/// Moves the leading price only if nobody wrote the lot since it was read.
pub const UPDATE_LOT_PRICE_IF_VERSION: &str = concat!(
    "UPDATE lots \
     SET price = $1, bids_count = bids_count + 1, version = version + 1, updated_at = $5 \
     WHERE tenant_id = $2 AND id = $3 AND version = $4 \
     RETURNING ",
    lot_columns!()
);

pub const INSERT_BID: &str = r#"
    INSERT INTO bids (tenant_id, lot_id, auction_id, bidder_id, amount, status, is_auto_bid, timestamp)
    VALUES ($1, $2, $3, $4, $5, 'ATIVO', $6, $7)
    RETURNING id, tenant_id, lot_id, auction_id, bidder_id, amount, status, is_auto_bid, timestamp
"#;

/// Bid history; NULL parameters disable their filter.
pub const LIST_BIDS: &str = r#"
    SELECT id, tenant_id, lot_id, auction_id, bidder_id, amount, status, is_auto_bid, timestamp
    FROM bids
    WHERE tenant_id = $1
      AND ($2::BIGINT IS NULL OR lot_id = $2)
      AND ($3::BIGINT IS NULL OR auction_id = $3)
      AND ($4::BIGINT IS NULL OR bidder_id = $4)
    ORDER BY timestamp DESC, id DESC
"#;

pub const MARK_LOT_RELISTED: &str = r#"
    UPDATE lots
    SET status = 'RELISTADO', version = version + 1, updated_at = $4
    WHERE tenant_id = $1 AND id = $2 AND version = $3
    RETURNING id
"#;

/// Lots created by this service are always relistings.
pub const INSERT_RELISTED_LOT: &str = concat!(
    "INSERT INTO lots (public_id, tenant_id, auction_id, title, price, initial_price, evaluation_value, \
                       bid_increment_step, status, bids_count, is_relisted, original_lot_id, version, \
                       created_at, updated_at) \
     VALUES ($1, $2, $3, $4, $5, $5, $6, $7, $8, 0, TRUE, $9, 0, $10, $10) \
     RETURNING ",
    lot_columns!()
);

pub const GET_PLATFORM_SETTINGS: &str = r#"
    SELECT tenant_id, auction_code_mask, lot_code_mask, seller_code_mask, auctioneer_code_mask,
           asset_code_mask, judicial_process_code_mask, category_code_mask, default_bid_increment
    FROM platform_settings
    WHERE tenant_id = $1
"#;

/// Single-statement upsert, so concurrent callers serialize on the counter row.
pub const NEXT_SEQUENCE: &str = r#"
    INSERT INTO business_code_counters (tenant_id, entity_type, prefix, last_value)
    VALUES ($1, $2, $3, 1)
    ON CONFLICT (tenant_id, entity_type, prefix)
    DO UPDATE SET last_value = business_code_counters.last_value + 1
    RETURNING last_value
"#;

pub const GET_USER_WIN_BY_ID: &str = r#"
    SELECT id, tenant_id, lot_id, user_id, winning_bid_amount, payment_status, win_date
    FROM user_wins
    WHERE tenant_id = $1 AND id = $2
"#;

pub const MARK_WIN_PROCESSING: &str = r#"
    UPDATE user_wins
    SET payment_status = 'PROCESSANDO'
    WHERE tenant_id = $1 AND id = $2 AND payment_status = 'PENDENTE'
    RETURNING id
"#;

pub const INSERT_INSTALLMENT: &str = r#"
    INSERT INTO installment_payments (tenant_id, user_win_id, installment_number, total_installments, amount, due_date, status)
    VALUES ($1, $2, $3, $4, $5, $6, 'PENDENTE')
    RETURNING id, tenant_id, user_win_id, installment_number, total_installments, amount, due_date, status
"#;
