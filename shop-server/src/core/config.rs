/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    /// SQLite database file path
    pub database_path: String,
    /// Directory uploaded images are written to
    pub images_dir: String,
    /// Public base URL used to build image links
    pub base_url: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/shop.db".into()),
            images_dir: std::env::var("IMAGES_DIR")
                .unwrap_or_else(|_| "wwwroot/images".into()),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
