// Closet Home API v0.1
use axum::routing::{get, post};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use closet_home_api::config::AppConfig;
use closet_home_api::db::queries;
use closet_home_api::routes::{self, AppState};
use closet_home_api::services::kma::KmaClient;

/// Maximum number of connections in the database pool.
const DB_POOL_MAX_CONNECTIONS: u32 = 5;

/// Closet Home API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Closet Home API",
        version = "0.1.0",
        description = "Personal closet web app backend. Provides account \
            registration and login with DB-backed sessions, static page \
            payloads, and a home view that pairs the current date with a \
            best-effort KMA village weather forecast.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Home", description = "Date and weather home view"),
        (name = "Auth", description = "Registration, login, logout"),
        (name = "Pages", description = "Static page payloads"),
    ),
    paths(
        routes::health::health_check,
        routes::home::home,
        routes::auth::register,
        routes::auth::login,
        routes::auth::logout,
        routes::pages::closet,
        routes::pages::upload,
        routes::pages::profile,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::home::HomeResponse,
            routes::home::DateInfo,
            closet_home_api::services::weather::WeatherView,
            routes::auth::Credentials,
            routes::auth::RegisterResponse,
            routes::auth::LoginResponse,
            routes::pages::PageContent,
            routes::pages::ProfilePage,
            closet_home_api::errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "closet_home_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Set up database connection pool
    let pool = SqlitePoolOptions::new()
        .max_connections(DB_POOL_MAX_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Create the schema if absent (no migration framework for two tables)
    queries::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    tracing::info!("Database schema ready");

    // Create KMA forecast client
    let kma = KmaClient::new(config.kma.clone());

    // Build shared application state
    let app_state = AppState {
        pool: pool.clone(),
        kma,
    };

    // CORS — browser frontend posts JSON credentials
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    // Build router
    // App routes share AppState; the health check uses the pool directly.
    let app_routes = Router::new()
        .route("/api/v1/home", get(routes::home::home))
        .route("/api/v1/auth/register", post(routes::auth::register))
        .route("/api/v1/auth/login", post(routes::auth::login))
        .route("/api/v1/auth/logout", post(routes::auth::logout))
        .route("/api/v1/pages/closet", get(routes::pages::closet))
        .route("/api/v1/pages/upload", get(routes::pages::upload))
        .route("/api/v1/pages/profile", get(routes::pages::profile))
        .with_state(app_state);

    let health_routes = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .with_state(pool);

    let app = Router::new()
        .merge(health_routes)
        .merge(app_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
