// region:    --- Imports
use crate::auction::events::LotEvent;
use crate::config::BiddingSettings;
use crate::error::{AppError, AppResult};
use crate::event_store::{record_event, EventStore};
use crate::ids::TenantId;
use crate::repository::AuctionRepository;
use crate::status::PaymentStatus;
use chrono::{Months, NaiveDate, Utc};
use self::model::{InstallmentPayment, NewInstallment};
use tracing::info;

// endregion: --- Imports

pub mod model;

/// Only checkout ever touches a win's event stream, once.
const CHECKOUT_EVENT_VERSION: i64 = 1;

/// Split `total` into `count` monthly installments, the first due one month after `start`.
/// Leftover centavos go to the first installment so the parts always add up to `total`.
pub fn split_installments(total: i64, count: u32, start: NaiveDate) -> Vec<NewInstallment> {
    let parts = i64::from(count.max(1));
    let base = total / parts;
    let remainder = total % parts;

    (1..=count.max(1))
        .map(|number| NewInstallment {
            installment_number: number as i32,
            total_installments: count.max(1) as i32,
            amount: if number == 1 { base + remainder } else { base },
            due_date: start
                .checked_add_months(Months::new(number))
                .unwrap_or(NaiveDate::MAX),
        })
        .collect()
}

/// Turn a pending win into installment payments.
pub async fn handle_checkout(
    tenant: TenantId,
    user_win_id: i64,
    installments: u32,
    repo: &dyn AuctionRepository,
    event_store: &dyn EventStore,
    settings: &BiddingSettings,
) -> AppResult<Vec<InstallmentPayment>> {
    info!(
        "{:<12} --> checkout win={} installments={} tenant={}",
        "Command", user_win_id, installments, tenant
    );

    if installments == 0 || installments > settings.max_installments {
        return Err(AppError::Validation(format!(
            "O número de parcelas deve estar entre 1 e {}.",
            settings.max_installments
        )));
    }

    let win = repo
        .user_win_by_id(tenant, user_win_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Arremate {} não encontrado.", user_win_id)))?;

    if win.payment_status != PaymentStatus::Pendente {
        return Err(AppError::InvalidState(format!(
            "O arremate {} não está pendente de pagamento (status: {}).",
            win.id, win.payment_status
        )));
    }

    let now = Utc::now();
    let plan = split_installments(win.winning_bid_amount, installments, now.date_naive());

    let created = repo
        .start_checkout(tenant, win.id, plan)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!(
                "O pagamento do arremate {} já foi iniciado.",
                win.id
            ))
        })?;

    let event = LotEvent::CheckoutStarted {
        user_win_id: win.id,
        lot_id: win.lot_id,
        installments,
        total_amount: win.winning_bid_amount,
        timestamp: now,
    };
    record_event(event_store, tenant, event, CHECKOUT_EVENT_VERSION).await;

    Ok(created)
}
