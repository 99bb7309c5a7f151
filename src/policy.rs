//! Lending policy: loan period, overdue detection, and fine amounts.
//!
//! Pure functions only. The same rules serve two callers: the query facade,
//! which shows a live estimate against today's date, and the loan ledger,
//! which computes the definitive charge exactly once, at return time, from
//! the actual return date.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

/// Length of a loan; due date is `loan_date + LOAN_PERIOD_DAYS`.
pub const LOAN_PERIOD_DAYS: u64 = 14;

/// Fine charged per calendar day a loan is overdue: $0.50.
///
/// The single source of the rate. Callers must never re-derive it, so the
/// displayed estimate and the charged amount cannot drift.
pub const DAILY_FINE_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Due date for a loan starting on `loan_date`.
pub fn due_date(loan_date: NaiveDate) -> NaiveDate {
    loan_date + Days::new(LOAN_PERIOD_DAYS)
}

/// True iff the reference date is strictly past the due date.
pub fn is_overdue(due: NaiveDate, reference: NaiveDate) -> bool {
    reference > due
}

/// Whole calendar days the loan is overdue as of `reference`; zero when the
/// reference date is on or before the due date.
pub fn days_overdue(due: NaiveDate, reference: NaiveDate) -> i64 {
    (reference - due).num_days().max(0)
}

/// Fine owed for a loan due on `due` as of `reference`.
pub fn fine_amount(due: NaiveDate, reference: NaiveDate) -> Decimal {
    Decimal::from(days_overdue(due, reference)) * DAILY_FINE_RATE
}

/// Human-readable description recorded on a fine row.
pub fn fine_description(days: i64) -> String {
    format!("Late return fine: {} days", days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_is_fourteen_days_out() {
        assert_eq!(due_date(date(2025, 6, 1)), date(2025, 6, 15));
    }

    #[test]
    fn not_overdue_on_due_date() {
        let due = date(2025, 6, 15);
        assert!(!is_overdue(due, due));
        assert!(!is_overdue(due, date(2025, 6, 10)));
        assert!(is_overdue(due, date(2025, 6, 16)));
    }

    #[test]
    fn fine_is_fifty_cents_per_day() {
        let due = date(2025, 6, 15);
        assert_eq!(fine_amount(due, date(2025, 6, 21)), Decimal::new(300, 2));
        assert_eq!(fine_amount(due, date(2025, 6, 16)), Decimal::new(50, 2));
    }

    #[test]
    fn no_fine_on_or_before_due_date() {
        let due = date(2025, 6, 15);
        assert_eq!(fine_amount(due, due), Decimal::ZERO);
        assert_eq!(fine_amount(due, date(2025, 6, 1)), Decimal::ZERO);
        assert_eq!(days_overdue(due, date(2025, 6, 1)), 0);
    }

    #[test]
    fn twenty_days_late_loan_charges_for_six_overdue_days() {
        // Borrowed June 1, due June 15, returned June 21: 6 days overdue.
        let loan_date = date(2025, 6, 1);
        let due = due_date(loan_date);
        let returned = loan_date + Days::new(20);
        assert_eq!(days_overdue(due, returned), 6);
        assert_eq!(fine_amount(due, returned), Decimal::new(300, 2));
    }
}
