//! Fine ledger service: recording and paying fines

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::fine::{Fine, FineDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct FinesService {
    repository: Repository,
}

impl FinesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a fine against a loan. Zero-amount fines are never recorded.
    pub async fn create_fine(
        &self,
        loan_id: i32,
        amount: Decimal,
        description: &str,
    ) -> AppResult<Fine> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Fine amount must be positive".to_string(),
            ));
        }

        // Verify the loan exists
        self.repository.loans.get_by_id(loan_id).await?;
        self.repository.fines.create(loan_id, amount, description).await
    }

    /// Pay a fine belonging to the user
    pub async fn pay(&self, fine_id: i32, user_id: i32) -> AppResult<Fine> {
        let today = Utc::now().date_naive();
        let fine = self.repository.fines.pay(fine_id, user_id, today).await?;

        tracing::info!(fine_id, user_id, amount = %fine.amount, "fine paid");
        Ok(fine)
    }

    /// All fines for a user, unpaid first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<FineDetails>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.fines.list_for_user(user_id).await
    }

    /// Sum of unpaid fine amounts for a user
    pub async fn outstanding_total(&self, user_id: i32) -> AppResult<Decimal> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.fines.outstanding_total(user_id).await
    }
}
