use crate::status::PaymentStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A lot sold to a bidder, awaiting or undergoing payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserWin {
    pub id: i64,
    pub tenant_id: i64,
    pub lot_id: i64,
    pub user_id: i64,
    pub winning_bid_amount: i64,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub win_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPayment {
    pub id: i64,
    pub tenant_id: i64,
    pub user_win_id: i64,
    pub installment_number: i32,
    pub total_installments: i32,
    pub amount: i64,
    pub due_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstallment {
    pub installment_number: i32,
    pub total_installments: i32,
    pub amount: i64,
    pub due_date: NaiveDate,
}
