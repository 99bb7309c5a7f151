//! Fine endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::fine::Fine};

use super::AuthenticatedUser;

/// Manual fine request (admin only), e.g. for a damaged book
#[derive(Deserialize, ToSchema)]
pub struct CreateFineRequest {
    /// Loan the fine is attached to
    pub loan_id: i32,
    /// Amount in dollars, must be positive
    pub amount: Decimal,
    /// Reason for the fine
    pub description: String,
}

/// Record a fine against a loan (admin only)
#[utoipa::path(
    post,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    request_body = CreateFineRequest,
    responses(
        (status = 201, description = "Fine recorded", body = Fine),
        (status = 400, description = "Invalid amount"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn create_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateFineRequest>,
) -> AppResult<(StatusCode, Json<Fine>)> {
    claims.require_admin()?;

    let fine = state
        .services
        .fines
        .create_fine(request.loan_id, request.amount, &request.description)
        .await?;
    Ok((StatusCode::CREATED, Json(fine)))
}

/// Pay a fine
#[utoipa::path(
    post,
    path = "/fines/{id}/pay",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Fine ID")
    ),
    responses(
        (status = 200, description = "Fine paid", body = Fine),
        (status = 404, description = "Fine not found"),
        (status = 409, description = "Fine already paid")
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(fine_id): Path<i32>,
) -> AppResult<Json<Fine>> {
    let fine = state.services.fines.pay(fine_id, claims.user_id).await?;
    Ok(Json(fine))
}
