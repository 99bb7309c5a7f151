//! Loans repository: the storage side of the loan ledger
//!
//! Borrow and return are each one transaction. The book row is locked with
//! `SELECT ... FOR UPDATE` before the availability check, so the check and
//! the mutation it guards read the same snapshot; two concurrent borrows of
//! the last copy cannot both succeed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        fine::Fine,
        loan::{Loan, LoanDetails, LoanHistoryEntry},
    },
    policy,
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE loan_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Borrow a book: insert the loan and decrement the available copy count
    /// as one atomic unit.
    pub async fn borrow(&self, book_id: i32, user_id: i32, today: NaiveDate) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let available: Option<i32> = sqlx::query_scalar(
            "SELECT available_copies FROM books WHERE book_id = $1 FOR UPDATE",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;
        let available =
            available.ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let already_borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1 AND user_id = $2 AND return_date IS NULL)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_borrowed {
            return Err(AppError::AlreadyBorrowed);
        }

        if available <= 0 {
            return Err(AppError::Unavailable);
        }

        // Guarded decrement; the WHERE clause closes the check-then-write
        // window even if the lock above were ever dropped.
        let updated = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 WHERE book_id = $1 AND available_copies > 0",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::Unavailable);
        }

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id, loan_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(today)
        .bind(policy::due_date(today))
        .fetch_one(&mut *tx)
        .await
        // Partial unique index on open (user_id, book_id) pairs backs the
        // duplicate check above.
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::AlreadyBorrowed,
            _ => AppError::Database(e),
        })?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Close a loan: set the return date, restore the copy, and record the
    /// overdue fine (if any) as one atomic unit.
    ///
    /// The fine is computed here, from the actual return date, and never
    /// recomputed afterwards.
    pub async fn return_loan(
        &self,
        loan_id: i32,
        user_id: i32,
        today: NaiveDate,
    ) -> AppResult<(Loan, Option<Fine>)> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE loan_id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(loan_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if loan.return_date.is_some() {
            return Err(AppError::AlreadyReturned);
        }

        let loan = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET return_date = $2 WHERE loan_id = $1 RETURNING *",
        )
        .bind(loan_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET available_copies = available_copies + 1 WHERE book_id = $1")
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;

        let days = policy::days_overdue(loan.due_date, today);
        let fine = if days > 0 {
            let amount = policy::fine_amount(loan.due_date, today);
            let fine = sqlx::query_as::<_, Fine>(
                r#"
                INSERT INTO fines (loan_id, amount, description, paid)
                VALUES ($1, $2, $3, FALSE)
                RETURNING *
                "#,
            )
            .bind(loan_id)
            .bind(amount)
            .bind(policy::fine_description(days))
            .fetch_one(&mut *tx)
            .await?;
            Some(fine)
        } else {
            None
        };

        tx.commit().await?;
        Ok((loan, fine))
    }

    /// Open loans for a user with book details and a live fine estimate
    pub async fn get_user_loans(&self, user_id: i32, today: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT l.loan_id, l.book_id, l.loan_date, l.due_date, b.title, b.author
            FROM loans l
            JOIN books b ON b.book_id = l.book_id
            WHERE l.user_id = $1 AND l.return_date IS NULL
            ORDER BY l.due_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let loans = rows
            .into_iter()
            .map(|row| {
                let due_date: NaiveDate = row.get("due_date");
                LoanDetails {
                    loan_id: row.get("loan_id"),
                    book_id: row.get("book_id"),
                    title: row.get("title"),
                    author: row.get("author"),
                    loan_date: row.get("loan_date"),
                    due_date,
                    is_overdue: policy::is_overdue(due_date, today),
                    accrued_fine: policy::fine_amount(due_date, today),
                }
            })
            .collect();

        Ok(loans)
    }

    /// Closed loans for a user, most recently returned first
    pub async fn get_user_history(&self, user_id: i32) -> AppResult<Vec<LoanHistoryEntry>> {
        let history = sqlx::query_as::<_, LoanHistoryEntry>(
            r#"
            SELECT l.loan_id, l.book_id, b.title, b.author,
                   l.loan_date, l.due_date, l.return_date,
                   COALESCE((SELECT SUM(f.amount) FROM fines f WHERE f.loan_id = l.loan_id), 0) AS fine_total
            FROM loans l
            JOIN books b ON b.book_id = l.book_id
            WHERE l.user_id = $1 AND l.return_date IS NOT NULL
            ORDER BY l.return_date DESC, l.loan_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(history)
    }

    /// Count open loans, optionally for one user
    pub async fn count_open(&self, user_id: Option<i32>) -> AppResult<i64> {
        let count: i64 = match user_id {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM loans WHERE user_id = $1 AND return_date IS NULL",
                )
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE return_date IS NULL")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    /// Count overdue open loans, optionally for one user
    pub async fn count_overdue(&self, user_id: Option<i32>, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = match user_id {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM loans WHERE user_id = $1 AND return_date IS NULL AND due_date < $2",
                )
                .bind(id)
                .bind(today)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM loans WHERE return_date IS NULL AND due_date < $1",
                )
                .bind(today)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(count)
    }

    /// Sum of live fine estimates across a user's overdue open loans.
    ///
    /// Display-only: the charged amounts are fixed at return time.
    pub async fn estimated_accruing_fines(&self, user_id: i32, today: NaiveDate) -> AppResult<Decimal> {
        let due_dates: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT due_date FROM loans WHERE user_id = $1 AND return_date IS NULL AND due_date < $2",
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(due_dates
            .into_iter()
            .map(|due| policy::fine_amount(due, today))
            .sum())
    }
}
