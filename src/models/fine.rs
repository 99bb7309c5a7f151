//! Fine model and related types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Fine model from database.
///
/// Invariants: `amount > 0` (zero-amount fines are never recorded) and
/// `payment_date` is set iff `paid` is true. PAID is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub fine_id: i32,
    pub loan_id: i32,
    pub amount: Decimal,
    pub description: Option<String>,
    pub paid: bool,
    pub payment_date: Option<NaiveDate>,
}

/// Fine with the title of the book whose late return caused it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FineDetails {
    pub fine_id: i32,
    pub loan_id: i32,
    pub title: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub paid: bool,
    pub payment_date: Option<NaiveDate>,
}
