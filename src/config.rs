use std::time::Duration;

use crate::services::slot::SlotConvention;

/// Default bound on a single forecast request. The home endpoint degrades to
/// the fallback weather view rather than wait longer than this.
const DEFAULT_KMA_TIMEOUT_SECS: u64 = 5;

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub kma: KmaConfig,
}

/// Configuration for the KMA village forecast client.
///
/// Loaded once at startup and handed to the client at construction time —
/// no global mutable key/coordinate values.
#[derive(Debug, Clone)]
pub struct KmaConfig {
    pub base_url: String,
    pub service_key: String,
    /// Forecast grid X coordinate.
    pub nx: u32,
    /// Forecast grid Y coordinate.
    pub ny: u32,
    pub timeout: Duration,
    pub convention: SlotConvention,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://users.db?mode=rwc".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            kma: KmaConfig::from_env(),
        }
    }
}

impl KmaConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("KMA_BASE_URL").unwrap_or_else(|_| {
                "http://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getUltraSrtFcst"
                    .to_string()
            }),
            service_key: std::env::var("KMA_SERVICE_KEY").expect("KMA_SERVICE_KEY must be set"),
            nx: std::env::var("KMA_GRID_NX")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("KMA_GRID_NX must be a valid grid coordinate"),
            ny: std::env::var("KMA_GRID_NY")
                .unwrap_or_else(|_| "127".to_string())
                .parse()
                .expect("KMA_GRID_NY must be a valid grid coordinate"),
            timeout: Duration::from_secs(DEFAULT_KMA_TIMEOUT_SECS),
            convention: std::env::var("KMA_SLOT_CONVENTION")
                .ok()
                .map(|v| {
                    v.parse()
                        .expect("KMA_SLOT_CONVENTION must be 'issuance' or 'grid'")
                })
                .unwrap_or(SlotConvention::Issuance),
        }
    }
}
