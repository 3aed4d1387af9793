//! Static page payloads: closet, upload, profile.
//!
//! These carry no logic; the frontend renders them as-is. Profile is the one
//! exception — it reports the logged-in username when a valid session cookie
//! accompanies the request.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::queries;
use crate::errors::AppError;
use crate::routes::auth::session_token_from_headers;
use crate::routes::AppState;

/// Fixed content for a static page.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageContent {
    /// Page identifier, e.g. "closet"
    pub slug: String,
    /// Display title
    pub title: String,
    /// Short description shown under the title
    pub description: String,
}

impl PageContent {
    fn new(slug: &str, title: &str, description: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Profile page payload; `username` is null for anonymous visitors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePage {
    #[serde(flatten)]
    pub page: PageContent,
    /// Username of the logged-in visitor, if any
    pub username: Option<String>,
}

/// Closet page content.
#[utoipa::path(
    get,
    path = "/api/v1/pages/closet",
    tag = "Pages",
    responses(
        (status = 200, description = "Closet page content", body = PageContent),
    )
)]
pub async fn closet() -> Json<PageContent> {
    Json(PageContent::new(
        "closet",
        "My Closet",
        "Browse the items you have saved",
    ))
}

/// Upload page content.
#[utoipa::path(
    get,
    path = "/api/v1/pages/upload",
    tag = "Pages",
    responses(
        (status = 200, description = "Upload page content", body = PageContent),
    )
)]
pub async fn upload() -> Json<PageContent> {
    Json(PageContent::new(
        "upload",
        "Add an Item",
        "Photograph a piece and add it to your closet",
    ))
}

/// Profile page content, with the visitor's username when logged in.
#[utoipa::path(
    get,
    path = "/api/v1/pages/profile",
    tag = "Pages",
    responses(
        (status = 200, description = "Profile page content", body = ProfilePage),
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfilePage>, AppError> {
    let username = match session_token_from_headers(&headers) {
        Some(token) => queries::find_session_user(&state.pool, &token)
            .await?
            .map(|u| u.username),
        None => None,
    };

    Ok(Json(ProfilePage {
        page: PageContent::new("profile", "Profile", "Your account at a glance"),
        username,
    }))
}
