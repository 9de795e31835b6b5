use serde::{Deserialize, Serialize};

/// Static configuration loaded at startup.
///
/// Sections:
/// - server: bind address and worker count
/// - database: sea-orm connection
/// - object_store: S3 bucket for original/stamped PDFs
/// - tracking: public base URL, token key, QR rendering, API token
/// - logging: level, optional file output
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub object_store: ObjectStoreConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// Load from `config.toml` plus environment overrides.
    ///
    /// Priority: ENV > config.toml > defaults.
    /// ENV prefix `FL`, separator `__`, e.g. `FL__SERVER__PORT=9999`.
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("FL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite`, `mysql` or `postgres`.
    #[serde(default = "default_database_backend")]
    pub backend: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_database_backend(),
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Optional custom endpoint (minio and friends); path-style access is
    /// forced when set.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_secs: u64,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            signed_url_ttl_secs: default_signed_url_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Public base URL used when a request does not supply one.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Base64-encoded 32-byte key for tracking token encryption.
    #[serde(default)]
    pub token_key: String,
    /// Pixels per QR module in the stamped raster.
    #[serde(default = "default_qr_module_px")]
    pub qr_module_px: u32,
    /// Bearer token for the management API. Empty disables the API surface.
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_max_flyer_count")]
    pub max_flyer_count: u32,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            token_key: String::new(),
            qr_module_px: default_qr_module_px(),
            api_token: String::new(),
            max_flyer_count: default_max_flyer_count(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path; empty or unset logs to stdout.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            enable_rotation: false,
            max_backups: default_max_backups(),
            format: default_log_format(),
        }
    }
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_database_backend() -> String {
    "sqlite".to_string()
}

fn default_database_url() -> String {
    "sqlite://flyerlink.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_bucket() -> String {
    "qr-campaign-pdfs".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_signed_url_ttl() -> u64 {
    300
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_qr_module_px() -> u32 {
    8
}

fn default_max_flyer_count() -> u32 {
    500
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_backups() -> u32 {
    7
}

fn default_log_format() -> String {
    "text".to_string()
}
