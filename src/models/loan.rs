//! Loan model and related types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan model from database.
///
/// A loan is open while `return_date` is NULL; at most one open loan exists
/// per (user, book) pair. CLOSED is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub loan_id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

/// Active loan with book details for display.
///
/// `accrued_fine` is the live as-of-today estimate; the definitive charge is
/// only computed at return time from the actual return date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub loan_id: i32,
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub is_overdue: bool,
    pub accrued_fine: Decimal,
}

/// Closed loan for a user's borrowing history
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanHistoryEntry {
    pub loan_id: i32,
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: NaiveDate,
    pub fine_total: Decimal,
}
