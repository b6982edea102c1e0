use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::services::ImageService;
use crate::utils::AppError;

/// Server state — shared by every handler
///
/// Cheap to clone: the pool is internally reference-counted and the config
/// is small and immutable.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub images: ImageService,
}

impl ServerState {
    /// Open the database (running migrations) and build the state
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        let images = ImageService::new(&config.images_dir, &config.base_url);
        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            images,
        })
    }
}
