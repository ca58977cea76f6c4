//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Salt used when no `identity.ip_salt` is configured.
pub const DEFAULT_IP_SALT: &str = "default_salt_change_in_production";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Anonymous identity configuration.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Bearer token verification.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Text-generation provider.
    #[serde(default)]
    pub ai: AiConfig,
    /// View-count worker.
    #[serde(default)]
    pub views: ViewsConfig,
    /// Cross-origin settings.
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Anonymous identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Process-wide salt mixed into hashed IP addresses.
    #[serde(default = "default_ip_salt")]
    pub ip_salt: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            ip_salt: default_ip_salt(),
        }
    }
}

impl IdentityConfig {
    /// Whether the built-in salt is still in use.
    #[must_use]
    pub fn uses_default_salt(&self) -> bool {
        self.ip_salt == DEFAULT_IP_SALT
    }
}

/// JWT signing algorithm accepted from the identity provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JwtAlgorithm {
    /// Shared-secret HMAC.
    #[default]
    Hs256,
    /// RSA public key.
    Rs256,
}

/// Bearer token verification configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Signing algorithm.
    #[serde(default)]
    pub algorithm: JwtAlgorithm,
    /// HMAC secret (HS256).
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// PEM-encoded public key (RS256).
    #[serde(default)]
    pub jwt_public_key: Option<String>,
    /// Expected `iss` claim.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Expected `aud` claim.
    #[serde(default)]
    pub audience: Option<String>,
}

/// Text-generation provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Base URL of an `OpenAI`-compatible API.
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    /// API key. Generation endpoints fail with an upstream error when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Chat model name.
    #[serde(default = "default_ai_model")]
    pub model: String,
    /// Token budget for full-post generation.
    #[serde(default = "default_ai_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            api_key: None,
            model: default_ai_model(),
            max_tokens: default_ai_max_tokens(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

/// View-count worker configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    /// Capacity of the pending-increment queue.
    #[serde(default = "default_views_queue")]
    pub queue_capacity: usize,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_views_queue(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Empty allows any origin.
    #[serde(default = "default_cors_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_max_connections() -> u32 {
    25
}

const fn default_min_connections() -> u32 {
    5
}

fn default_ip_salt() -> String {
    DEFAULT_IP_SALT.to_string()
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

const fn default_ai_max_tokens() -> u32 {
    3000
}

const fn default_ai_timeout() -> u64 {
    60
}

const fn default_views_queue() -> usize {
    1000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `QUILL_ENV`)
    /// 4. Environment variables with `QUILL__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("QUILL_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("QUILL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("QUILL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
