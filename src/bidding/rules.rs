//! Pure pricing rules for bids. Amounts are centavos.

/// Pick the increment for a bid: caller, then lot, then tenant, then service default.
pub fn resolve_increment(
    requested: Option<i64>,
    lot_step: Option<i64>,
    tenant_default: Option<i64>,
    service_default: i64,
) -> i64 {
    requested
        .or(lot_step.filter(|step| *step > 0))
        .or(tenant_default.filter(|step| *step > 0))
        .unwrap_or(service_default)
}

/// Price the next bid is measured against: the best active bid, otherwise the opening price.
pub fn current_price(highest_active_bid: Option<i64>, opening_price: i64) -> i64 {
    highest_active_bid.unwrap_or(opening_price)
}

pub fn minimum_bid(current_price: i64, increment: i64) -> i64 {
    current_price.saturating_add(increment)
}

/// Format centavos as Brazilian reais, e.g. `R$ 1.100,00`.
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let reais = (abs / 100).to_string();
    let centavos = abs % 100;

    let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
    for (i, digit) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{sign}R$ {grouped},{centavos:02}")
}
