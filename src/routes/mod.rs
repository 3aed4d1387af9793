pub mod auth;
pub mod health;
pub mod home;
pub mod pages;

use sqlx::SqlitePool;

use crate::services::kma::KmaClient;

/// Shared application state for account and home endpoints.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub kma: KmaClient,
}
