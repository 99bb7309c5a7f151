//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database.
///
/// Invariant maintained by the loan ledger (and enforced by a CHECK
/// constraint): `0 <= available_copies <= total_copies`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "author must be 1-100 characters"))]
    pub author: String,
    #[validate(length(min = 10, max = 20, message = "isbn must be 10-20 characters"))]
    pub isbn: Option<String>,
    #[validate(range(min = 1, max = 2100, message = "publication year out of range"))]
    pub publication_year: Option<i32>,
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "total copies must be positive"))]
    pub total_copies: i32,
}

/// Update book request (bibliographic fields and total copy count)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "author must be 1-100 characters"))]
    pub author: Option<String>,
    #[validate(length(min = 10, max = 20, message = "isbn must be 10-20 characters"))]
    pub isbn: Option<String>,
    #[validate(range(min = 1, max = 2100, message = "publication year out of range"))]
    pub publication_year: Option<i32>,
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "total copies must be positive"))]
    pub total_copies: Option<i32>,
}

/// Catalog search query (substring match over title/author/genre/isbn)
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_book() -> CreateBook {
        CreateBook {
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            isbn: Some("9780743273565".to_string()),
            publication_year: Some(1925),
            genre: Some("Fiction".to_string()),
            description: None,
            total_copies: 5,
        }
    }

    #[test]
    fn accepts_valid_book() {
        assert!(valid_book().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_copy_count() {
        let mut book = valid_book();
        book.total_copies = 0;
        assert!(book.validate().is_err());
    }

    #[test]
    fn rejects_malformed_year() {
        let mut book = valid_book();
        book.publication_year = Some(99999);
        assert!(book.validate().is_err());
    }

    #[test]
    fn rejects_empty_title() {
        let mut book = valid_book();
        book.title = String::new();
        assert!(book.validate().is_err());
    }
}
