//! Loan endpoints: borrowing and returning books

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{fine::Fine, loan::Loan},
};

use super::AuthenticatedUser;

/// Borrow request. `user_id` lets an admin borrow on a member's behalf;
/// members always borrow for themselves.
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Book to borrow
    pub book_id: i32,
    /// Target user (admin only; defaults to the caller)
    pub user_id: Option<i32>,
}

/// Outcome of returning a book
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// The closed loan
    pub loan: Loan,
    /// Fine recorded if the return was late
    pub fine: Option<Fine>,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "User already has this book on loan"),
        (status = 422, description = "No copies available")
    )
)]
pub async fn borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let user_id = request.user_id.unwrap_or(claims.user_id);
    claims.require_self_or_admin(user_id)?;

    let loan = state.services.loans.borrow(request.book_id, user_id).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed book. A late return records the overdue fine in the
/// same operation and includes it in the response.
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let (loan, fine) = state
        .services
        .loans
        .return_loan(loan_id, claims.user_id)
        .await?;
    Ok(Json(ReturnResponse { loan, fine }))
}
