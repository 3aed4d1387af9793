//! Home endpoint: current date plus a best-effort weather view.
//!
//! Weather trouble never turns into an error response here — the fetch
//! boundary degrades to the default view and the page always renders.

use axum::extract::State;
use axum::Json;
use chrono::{Datelike, Local, NaiveDateTime, Weekday};
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::AppState;
use crate::services::weather::{self, WeatherView};

/// Current-date fields for the home page header.
#[derive(Debug, Serialize, ToSchema)]
pub struct DateInfo {
    /// Four-digit year, e.g. "2025"
    pub year: String,
    /// Month and day, e.g. "12.14"
    pub date: String,
    /// Fixed weekday label, e.g. "Sun"
    pub weekday: String,
}

impl DateInfo {
    /// Build the display fields for a wall-clock instant.
    pub fn from_datetime(now: NaiveDateTime) -> Self {
        Self {
            year: format!("{:04}", now.year()),
            date: format!("{:02}.{:02}", now.month(), now.day()),
            weekday: weekday_label(now.weekday()).to_string(),
        }
    }
}

/// The fixed weekday label set.
fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Home page payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    pub date: DateInfo,
    pub weather: WeatherView,
}

/// Render the home payload: today's date and the current weather.
#[utoipa::path(
    get,
    path = "/api/v1/home",
    tag = "Home",
    responses(
        (status = 200, description = "Date and best-effort weather view", body = HomeResponse),
    )
)]
pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    let now = Local::now().naive_local();

    Json(HomeResponse {
        date: DateInfo::from_datetime(now),
        weather: weather::current_weather(&state.kma).await,
    })
}
