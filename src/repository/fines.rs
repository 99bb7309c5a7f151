//! Fines repository: the storage side of the fine ledger

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::fine::{Fine, FineDetails},
};

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get fine by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Fine> {
        sqlx::query_as::<_, Fine>("SELECT * FROM fines WHERE fine_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", id)))
    }

    /// Insert an unpaid fine row. The caller has already verified the loan
    /// exists and the amount is positive.
    pub async fn create(&self, loan_id: i32, amount: Decimal, description: &str) -> AppResult<Fine> {
        let fine = sqlx::query_as::<_, Fine>(
            r#"
            INSERT INTO fines (loan_id, amount, description, paid)
            VALUES ($1, $2, $3, FALSE)
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(amount)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(fine)
    }

    /// Mark a fine as paid.
    ///
    /// Ownership is checked transitively (fine -> loan -> user): a fine that
    /// belongs to another user is reported as `NotFound`, not leaked. Paying
    /// twice fails with `AlreadyPaid` and never changes the row again.
    pub async fn pay(&self, fine_id: i32, user_id: i32, today: NaiveDate) -> AppResult<Fine> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT f.paid, l.user_id
            FROM fines f
            JOIN loans l ON l.loan_id = f.loan_id
            WHERE f.fine_id = $1
            FOR UPDATE OF f
            "#,
        )
        .bind(fine_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = match row {
            Some(row) if row.get::<i32, _>("user_id") == user_id => row,
            _ => {
                return Err(AppError::NotFound(format!(
                    "Fine with id {} not found",
                    fine_id
                )))
            }
        };

        if row.get::<bool, _>("paid") {
            return Err(AppError::AlreadyPaid);
        }

        let fine = sqlx::query_as::<_, Fine>(
            "UPDATE fines SET paid = TRUE, payment_date = $2 WHERE fine_id = $1 RETURNING *",
        )
        .bind(fine_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(fine)
    }

    /// All fines for a user's loans, unpaid first then newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<FineDetails>> {
        let fines = sqlx::query_as::<_, FineDetails>(
            r#"
            SELECT f.fine_id, f.loan_id, b.title, f.amount, f.description, f.paid, f.payment_date
            FROM fines f
            JOIN loans l ON l.loan_id = f.loan_id
            JOIN books b ON b.book_id = l.book_id
            WHERE l.user_id = $1
            ORDER BY f.paid, f.fine_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fines)
    }

    /// Sum of unpaid fine amounts for one user's loans
    pub async fn outstanding_total(&self, user_id: i32) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(f.amount), 0)
            FROM fines f
            JOIN loans l ON l.loan_id = f.loan_id
            WHERE l.user_id = $1 AND f.paid = FALSE
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Sum of all unpaid fine amounts (admin dashboard)
    pub async fn pending_total(&self) -> AppResult<Decimal> {
        let total: Decimal =
            sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0) FROM fines WHERE paid = FALSE")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }
}
