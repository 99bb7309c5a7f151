//! API integration tests
//!
//! These tests require a running server with a fresh database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an admin token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@library.local",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to sign up and log in a fresh member, returning (token, user_id)
async fn signup_member(client: &Client, email: &str) -> (String, i64) {
    client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "first_name": "Test",
            "last_name": "Member",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to send signup request");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    let user_id = body["user"]["user_id"].as_i64().expect("No user_id");
    (token, user_id)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check_round_trips_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@library.local",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@library.local",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_search_books() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/books?q=gatsby", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let books = body.as_array().expect("Expected an array");
    assert!(books.iter().any(|b| b["title"] == "The Great Gatsby"));
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_flow() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;
    let (token, user_id) = signup_member(&client, "borrower@example.com").await;

    // Create a dedicated book so copy counts are predictable
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "title": "Borrow Flow Test",
            "author": "Test Author",
            "isbn": "9990000000001",
            "genre": "Fiction",
            "publication_year": 2020,
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse book");
    let book_id = book["book_id"].as_i64().expect("No book_id");

    // Borrow it
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to borrow");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["loan_id"].as_i64().expect("No loan_id");
    assert!(loan["return_date"].is_null());

    // A second borrow of the same book by the same user is rejected
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // The only copy is out: another member cannot borrow it
    let (other_token, _) = signup_member(&client, "other@example.com").await;
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", other_token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // The loan shows up in the user's open loans
    let response = client
        .get(format!("{}/users/{}/loans", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch loans");
    assert!(response.status().is_success());
    let loans: Value = response.json().await.expect("Failed to parse loans");
    assert!(loans
        .as_array()
        .expect("Expected an array")
        .iter()
        .any(|l| l["loan_id"].as_i64() == Some(loan_id)));

    // Return it: on time, so no fine
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to return");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["loan"]["return_date"].is_string());
    assert!(body["fine"].is_null());

    // Returning again is rejected
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // The copy is available again
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch book");
    let book: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(book["available_copies"].as_i64(), Some(1));
}

#[tokio::test]
#[ignore]
async fn test_manual_fine_and_payment() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;
    let (token, user_id) = signup_member(&client, "fined@example.com").await;

    // Set up a book and a loan to attach the fine to
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "title": "Fine Flow Test",
            "author": "Test Author",
            "isbn": "9990000000002",
            "genre": "Fiction",
            "publication_year": 2021,
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to create book");
    let book: Value = response.json().await.expect("Failed to parse book");

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book["book_id"] }))
        .send()
        .await
        .expect("Failed to borrow");
    let loan: Value = response.json().await.expect("Failed to parse loan");

    // Admin records a $3.00 fine
    let response = client
        .post(format!("{}/fines", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "loan_id": loan["loan_id"],
            "amount": "3.00",
            "description": "Damaged cover"
        }))
        .send()
        .await
        .expect("Failed to create fine");
    assert_eq!(response.status(), 201);
    let fine: Value = response.json().await.expect("Failed to parse fine");
    let fine_id = fine["fine_id"].as_i64().expect("No fine_id");
    assert_eq!(fine["paid"], false);

    // It counts toward the user's outstanding total
    let response = client
        .get(format!("{}/users/{}/fines/outstanding", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch outstanding");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["outstanding_total"], "3.00");

    // A member cannot record fines
    let response = client
        .post(format!("{}/fines", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "loan_id": loan["loan_id"],
            "amount": "1.00",
            "description": "Nope"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Pay it
    let response = client
        .post(format!("{}/fines/{}/pay", BASE_URL, fine_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to pay fine");
    assert!(response.status().is_success());
    let fine: Value = response.json().await.expect("Failed to parse fine");
    assert_eq!(fine["paid"], true);
    assert!(fine["payment_date"].is_string());

    // Paying again is rejected
    let response = client
        .post(format!("{}/fines/{}/pay", BASE_URL, fine_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Outstanding total is back to zero
    let response = client
        .get(format!("{}/users/{}/fines/outstanding", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch outstanding");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["outstanding_total"], "0");
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_read_other_users_ledger() {
    let client = Client::new();
    let (token, _) = signup_member(&client, "snoop@example.com").await;
    let (_, other_id) = signup_member(&client, "target@example.com").await;

    let response = client
        .get(format!("{}/users/{}/loans", BASE_URL, other_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_delete_user_with_open_loan_rejected() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;
    let (token, user_id) = signup_member(&client, "holder@example.com").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "title": "Delete Guard Test",
            "author": "Test Author",
            "isbn": "9990000000003",
            "genre": "Fiction",
            "publication_year": 2022,
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to create book");
    let book: Value = response.json().await.expect("Failed to parse book");

    client
        .post(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book["book_id"] }))
        .send()
        .await
        .expect("Failed to borrow");

    // The user holds a book, so neither they nor the book can be deleted
    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book["book_id"].as_i64().unwrap()))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_admin_dashboard_stats() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_books"].is_number());
    assert!(body["borrowed_books"].is_number());
    assert!(body["overdue_loans"].is_number());
    assert!(body["total_users"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_stats_require_admin() {
    let client = Client::new();
    let (token, _) = signup_member(&client, "curious@example.com").await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}
