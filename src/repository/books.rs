//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search the catalog: substring match over title, author, genre, and
    /// ISBN; empty query lists the catalog ordered by title.
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = query.offset.unwrap_or(0).max(0);

        let books = match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let pattern = format!("%{}%", q);
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT * FROM books
                    WHERE title ILIKE $1 OR author ILIKE $1 OR genre ILIKE $1 OR isbn ILIKE $1
                    ORDER BY title
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title LIMIT $1 OFFSET $2")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(books)
    }

    /// Create a new book; all copies start available
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, publication_year, genre, description,
                               total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.publication_year)
        .bind(&book.genre)
        .bind(&book.description)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "A book with this ISBN already exists"))
    }

    /// Update bibliographic fields and the total copy count.
    ///
    /// Changing `total_copies` adjusts `available_copies` by the same delta
    /// so copies currently on loan stay accounted for; shrinking below the
    /// number on loan is rejected before any write.
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let total = book.total_copies.unwrap_or(current.total_copies);
        let on_loan = current.total_copies - current.available_copies;
        if total < on_loan {
            return Err(AppError::Validation(format!(
                "Cannot reduce total copies below the {} currently on loan",
                on_loan
            )));
        }

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                isbn = COALESCE($4, isbn),
                publication_year = COALESCE($5, publication_year),
                genre = COALESCE($6, genre),
                description = COALESCE($7, description),
                total_copies = $8,
                available_copies = $8 - $9
            WHERE book_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.publication_year)
        .bind(&book.genre)
        .bind(&book.description)
        .bind(total)
        .bind(on_loan)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "A book with this ISBN already exists"))?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a book and its closed loan/fine history in one transaction.
    ///
    /// Fails with `HasOpenLoans` while any copy is still out, so a concurrent
    /// borrow cannot race the delete into dangling rows.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // Lock the book row so a concurrent borrow serializes behind us
        let locked: Option<i32> =
            sqlx::query_scalar("SELECT book_id FROM books WHERE book_id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        let open_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE book_id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if open_loans > 0 {
            return Err(AppError::HasOpenLoans(format!(
                "Book has {} open loan(s) and cannot be deleted",
                open_loans
            )));
        }

        sqlx::query(
            "DELETE FROM fines WHERE loan_id IN (SELECT loan_id FROM loans WHERE book_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM loans WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Count books in the catalog
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Books per genre, most common first
    pub async fn genre_histogram(&self) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT COALESCE(genre, 'Unknown') AS genre, COUNT(*)
            FROM books
            GROUP BY COALESCE(genre, 'Unknown')
            ORDER BY COUNT(*) DESC, genre
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
