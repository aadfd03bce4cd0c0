use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Full database connection URL, e.g. `sqlite://data/invport.db?mode=rwc`.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// CORS allowed origins; empty means allow any origin (development mode).
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    /// Attach the underlying error message to server-error responses.
    /// Disable in production-equivalent deployments.
    #[serde(default = "default_expose_error_detail")]
    pub expose_error_detail: bool,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            database_url: default_database_url(),
            data_dir: default_data_dir(),
            cors_allowed_origins: Vec::new(),
            expose_error_detail: default_expose_error_detail(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret; generated at startup (with a warning) when
    /// absent, which invalidates tokens across restarts.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_expire_secs")]
    pub token_expire_secs: u64,
    /// Bootstrap admin account, created on startup when missing.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expire_secs: default_token_expire_secs(),
            admin_username: default_admin_username(),
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
        }
    }
}

// ---- Seed file types (used by the `seed` CLI subcommand) ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub email: String,
    /// Plaintext in the seed file; hashed at import.
    pub password: String,
    #[serde(default)]
    pub role: Option<invport_common::types::Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedItem {
    #[serde(flatten)]
    pub item: invport_common::types::CreateItemRequest,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

fn default_http_port() -> u16 {
    5000
}

fn default_database_url() -> String {
    "sqlite://data/invport.db?mode=rwc".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_expose_error_detail() -> bool {
    true
}

fn default_token_expire_secs() -> u64 {
    86400
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_email() -> String {
    "admin@invport.local".to_string()
}

fn default_admin_password() -> String {
    "changeme".to_string()
}
