use sqlx::SqlitePool;

use super::models::User;

/// Create the schema if it does not exist yet.
///
/// Intentionally not a migration framework: the app owns two small tables
/// and creates them idempotently at process start.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a new user. Fails with a unique-violation database error when the
/// username is already taken; the route layer maps that to 409.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, created_at)
         VALUES ($1, $2, $3)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Look up a user by username.
pub async fn find_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at
         FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Record a new login session.
pub async fn create_session(
    pool: &SqlitePool,
    token: &str,
    user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user_id)
        .bind(chrono::Utc::now())
        .execute(pool)
        .await?;
    Ok(())
}

/// Resolve the user behind a session token, if any.
pub async fn find_session_user(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.password_hash, u.created_at
         FROM users u
         JOIN sessions s ON s.user_id = u.id
         WHERE s.token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

/// Delete a session on logout. Deleting an unknown token is a no-op.
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}
