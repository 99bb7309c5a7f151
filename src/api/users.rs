//! User endpoints: administration and per-user ledgers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        fine::FineDetails,
        loan::{LoanDetails, LoanHistoryEntry},
    },
    services::stats::UserSummary,
};

use super::{auth::UserInfo, AuthenticatedUser};

/// Sum of a user's unpaid fines
#[derive(Serialize, ToSchema)]
pub struct OutstandingResponse {
    pub outstanding_total: Decimal,
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All registered users", body = Vec<UserInfo>)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    claims.require_admin()?;

    let users = state.services.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user", body = UserInfo),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<UserInfo>> {
    claims.require_self_or_admin(user_id)?;

    let user = state.services.users.get_by_id(user_id).await?;
    Ok(Json(user.into()))
}

/// Delete a user (admin only). Fails while the user holds any book.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User has open loans")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.users.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a user's open loans with live fine estimates
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Open loans", body = Vec<LoanDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_self_or_admin(user_id)?;

    let loans = state.services.loans.get_user_loans(user_id).await?;
    Ok(Json(loans))
}

/// Get a user's borrowing history (returned books)
#[utoipa::path(
    get,
    path = "/users/{id}/loans/history",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Closed loans", body = Vec<LoanHistoryEntry>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<LoanHistoryEntry>>> {
    claims.require_self_or_admin(user_id)?;

    let history = state.services.loans.get_user_history(user_id).await?;
    Ok(Json(history))
}

/// Get a user's fines, unpaid first
#[utoipa::path(
    get,
    path = "/users/{id}/fines",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Fines", body = Vec<FineDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_fines(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<FineDetails>>> {
    claims.require_self_or_admin(user_id)?;

    let fines = state.services.fines.list_for_user(user_id).await?;
    Ok(Json(fines))
}

/// Sum of a user's unpaid fines
#[utoipa::path(
    get,
    path = "/users/{id}/fines/outstanding",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Outstanding total", body = OutstandingResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_outstanding_fines(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<OutstandingResponse>> {
    claims.require_self_or_admin(user_id)?;

    let outstanding_total = state.services.fines.outstanding_total(user_id).await?;
    Ok(Json(OutstandingResponse { outstanding_total }))
}

/// Get a user's dashboard summary
#[utoipa::path(
    get,
    path = "/users/{id}/summary",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Summary counters", body = UserSummary),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<UserSummary>> {
    claims.require_self_or_admin(user_id)?;

    let summary = state.services.stats.user_summary(user_id).await?;
    Ok(Json(summary))
}
