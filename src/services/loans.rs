//! Loan ledger service: borrowing and returning

use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        fine::Fine,
        loan::{Loan, LoanDetails, LoanHistoryEntry},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for a user. Due in fourteen days.
    pub async fn borrow(&self, book_id: i32, user_id: i32) -> AppResult<Loan> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;

        let today = Utc::now().date_naive();
        let loan = self.repository.loans.borrow(book_id, user_id, today).await?;

        tracing::info!(
            loan_id = loan.loan_id,
            user_id,
            book_id,
            due_date = %loan.due_date,
            "book borrowed"
        );
        Ok(loan)
    }

    /// Return a borrowed book. If the loan is past due, the overdue fine is
    /// recorded in the same transaction.
    pub async fn return_loan(&self, loan_id: i32, user_id: i32) -> AppResult<(Loan, Option<Fine>)> {
        let today = Utc::now().date_naive();
        let (loan, fine) = self
            .repository
            .loans
            .return_loan(loan_id, user_id, today)
            .await?;

        if let Some(ref fine) = fine {
            tracing::info!(
                loan_id,
                user_id,
                fine_id = fine.fine_id,
                amount = %fine.amount,
                "book returned late, fine recorded"
            );
        } else {
            tracing::info!(loan_id, user_id, "book returned");
        }
        Ok((loan, fine))
    }

    /// Get open loans for a user with live fine estimates
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        let today = Utc::now().date_naive();
        self.repository.loans.get_user_loans(user_id, today).await
    }

    /// Get a user's borrowing history (closed loans)
    pub async fn get_user_history(&self, user_id: i32) -> AppResult<Vec<LoanHistoryEntry>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.loans.get_user_history(user_id).await
    }
}
