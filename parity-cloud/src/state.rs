//! Application state for parity-cloud

use sqlx::PgPool;

use crate::cache::DbCache;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Tag-indexed cache for database reads
    pub cache: DbCache,
    /// JWT secret for merchant authentication
    pub jwt_secret: String,
    /// Public base URL of this service
    pub server_url: String,
}

impl AppState {
    /// Create a new AppState: connect the pool and run pending migrations
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            cache: DbCache::new(),
            jwt_secret: config.jwt_secret.clone(),
            server_url: config.server_url.clone(),
        })
    }
}
