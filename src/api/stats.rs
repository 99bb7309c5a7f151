//! Admin dashboard endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    services::stats::{DashboardStats, GenreCount},
};

use super::AuthenticatedUser;

/// Library-wide counters (admin only)
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardStats>> {
    claims.require_admin()?;

    let stats = state.services.stats.dashboard().await?;
    Ok(Json(stats))
}

/// Catalog genre histogram (admin only)
#[utoipa::path(
    get,
    path = "/stats/genres",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books per genre", body = Vec<GenreCount>)
    )
)]
pub async fn get_genre_histogram(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<GenreCount>>> {
    claims.require_admin()?;

    let histogram = state.services.stats.genre_histogram().await?;
    Ok(Json(histogram))
}
