//! Read-side aggregations: dashboards, histograms, per-user summaries

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

/// Admin dashboard counters
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    /// Total books in the catalog
    pub total_books: i64,
    /// Copies currently on loan
    pub borrowed_books: i64,
    /// Of which overdue
    pub overdue_loans: i64,
    /// Registered users
    pub total_users: i64,
    /// Sum of unpaid fine amounts across all users
    pub pending_fines: Decimal,
}

/// One bar of the genre histogram
#[derive(Debug, Serialize, ToSchema)]
pub struct GenreCount {
    pub genre: String,
    pub count: i64,
}

/// Per-user dashboard summary
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    /// Open loans
    pub books_borrowed: i64,
    /// Open loans past their due date
    pub due_books: i64,
    /// Unpaid recorded fines
    pub pending_fines: Decimal,
    /// Estimate still accruing on overdue open loans (display only, charged
    /// at return time)
    pub accruing_fines: Decimal,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Library-wide counters for the admin dashboard
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let today = Utc::now().date_naive();
        Ok(DashboardStats {
            total_books: self.repository.books.count().await?,
            borrowed_books: self.repository.loans.count_open(None).await?,
            overdue_loans: self.repository.loans.count_overdue(None, today).await?,
            total_users: self.repository.users.count().await?,
            pending_fines: self.repository.fines.pending_total().await?,
        })
    }

    /// Catalog genre histogram
    pub async fn genre_histogram(&self) -> AppResult<Vec<GenreCount>> {
        let rows = self.repository.books.genre_histogram().await?;
        Ok(rows
            .into_iter()
            .map(|(genre, count)| GenreCount { genre, count })
            .collect())
    }

    /// One user's dashboard numbers
    pub async fn user_summary(&self, user_id: i32) -> AppResult<UserSummary> {
        self.repository.users.get_by_id(user_id).await?;
        let today = Utc::now().date_naive();
        Ok(UserSummary {
            books_borrowed: self.repository.loans.count_open(Some(user_id)).await?,
            due_books: self.repository.loans.count_overdue(Some(user_id), today).await?,
            pending_fines: self.repository.fines.outstanding_total(user_id).await?,
            accruing_fines: self
                .repository
                .loans
                .estimated_accruing_fines(user_id, today)
                .await?,
        })
    }
}
