//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, fines, health, loans, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.3.0",
        description = "Library loan and fine management REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::signup,
        auth::me,
        auth::update_profile,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Users
        users::list_users,
        users::get_user,
        users::delete_user,
        users::get_user_loans,
        users::get_user_history,
        users::get_user_fines,
        users::get_outstanding_fines,
        users::get_user_summary,
        // Loans
        loans::borrow,
        loans::return_loan,
        // Fines
        fines::create_fine,
        fines::pay_fine,
        // Stats
        stats::get_stats,
        stats::get_genre_histogram,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::Signup,
            crate::models::user::UpdateProfile,
            crate::models::user::UserRole,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Loans
            loans::BorrowRequest,
            loans::ReturnResponse,
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::LoanHistoryEntry,
            // Fines
            fines::CreateFineRequest,
            crate::models::fine::Fine,
            crate::models::fine::FineDetails,
            users::OutstandingResponse,
            // Stats
            crate::services::stats::DashboardStats,
            crate::services::stats::GenreCount,
            crate::services::stats::UserSummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "users", description = "User management and per-user ledgers"),
        (name = "loans", description = "Borrowing and returning"),
        (name = "fines", description = "Fine recording and payment"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
