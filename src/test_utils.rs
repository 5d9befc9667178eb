//! Shared test utilities for Murakami Viz.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

use crate::{
    core::{
        library::{self, LibraryPayload},
        user::{self, UserPayload},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Password given to every user created by [`create_test_user`].
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a library with only a name set.
pub async fn create_test_library(db: &DatabaseConnection, name: &str) -> Result<entities::library::Model> {
    library::create(
        db,
        LibraryPayload {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Valid user payload for `username`.
///
/// # Defaults
/// * `password`: [`TEST_PASSWORD`]
/// * `email`: `"<username>@example.org"`
/// * `active`: true
pub fn test_user_payload(username: &str) -> UserPayload {
    UserPayload {
        username: username.to_string(),
        password: TEST_PASSWORD.to_string(),
        email: format!("{}@example.org", username.replace(char::is_whitespace, "")),
        role: Some("editor".to_string()),
        active: true,
        ..Default::default()
    }
}

/// Creates a user that is not linked to any library.
pub async fn create_test_user(db: &DatabaseConnection, username: &str) -> Result<entities::user::Model> {
    user::create(db, test_user_payload(username), None).await
}

/// Sets up a test database with one library.
/// Returns (db, library) for library-scoped scenarios.
pub async fn setup_with_library() -> Result<(DatabaseConnection, entities::library::Model)> {
    let db = setup_test_db().await?;
    let library = create_test_library(&db, "Test Library").await?;
    Ok((db, library))
}
