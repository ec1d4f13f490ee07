/// Configuration management
///
/// Everything is environment-driven; `Config::from_env` deserializes the
/// process environment once at startup and the result is passed around
/// immutably from there.
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    pub database_url: String,

    /// Token signing secret. The default exists for local development
    /// only and triggers a startup warning.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// Signing algorithm identifier. Only HS256 is supported; anything
    /// else is a startup error, not a silent fallback.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_setpwd_token_expire_minutes")]
    pub setpwd_token_expire_minutes: i64,
    #[serde(default = "default_pbkdf2_rounds")]
    pub pbkdf2_rounds: u32,

    /// Base URL the set-password link points at.
    #[serde(default = "default_frontend_base_url")]
    pub frontend_base_url: String,
    /// Directory uploaded study images are stored under.
    #[serde(default = "default_media_root")]
    pub media_root: String,
    /// Remote classifier endpoint; unset means mock scoring.
    #[serde(default)]
    pub model_endpoint_url: Option<String>,

    // SMTP transport; empty host leaves mail delivery unconfigured.
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default)]
    pub from_email: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_secret_key() -> String {
    "change-me".to_string()
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    120
}

fn default_setpwd_token_expire_minutes() -> i64 {
    60
}

fn default_pbkdf2_rounds() -> u32 {
    29_000
}

fn default_frontend_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Clinical Records".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Startup sanity checks. Fails hard on an unsupported algorithm and
    /// warns when the development signing secret is still in place.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.algorithm != "HS256" {
            anyhow::bail!(
                "unsupported signing algorithm '{}': only HS256 is supported",
                self.algorithm
            );
        }
        if self.secret_key == default_secret_key() {
            tracing::warn!("SECRET_KEY is the development default; override it in production");
        }
        Ok(())
    }
}
