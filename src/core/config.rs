use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::features::address::selector::CascadePolicy;
use crate::shared::constants::{SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub dataset: DatasetConfig,
    pub search: SearchConfig,
    pub cascade: CascadeConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Where the address reference tables are loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    /// Base URL serving `api_province.json`, `api_amphure.json`, `api_tambon.json`
    Http(String),
    /// Local directory holding the same three files
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub location: DatasetLocation,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

/// Postal code handling when the cascade above it changes
#[derive(Debug, Clone)]
pub struct CascadeConfig {
    pub clear_postal_code_on_province_change: bool,
    pub clear_postal_code_on_sub_district_clear: bool,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            dataset: DatasetConfig::from_env()?,
            search: SearchConfig::from_env()?,
            cascade: CascadeConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatasetConfig {
    const DEFAULT_BASE_URL: &'static str =
        "https://raw.githubusercontent.com/kongvut/thai-province-data/master";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        // A local directory takes precedence over the download URL
        let location = match env::var("ADDRESS_DATA_DIR").ok().filter(|s| !s.is_empty()) {
            Some(dir) => DatasetLocation::Directory(PathBuf::from(dir)),
            None => DatasetLocation::Http(
                env::var("ADDRESS_DATA_BASE_URL")
                    .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
            ),
        };

        let timeout_secs = env::var("ADDRESS_DATA_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "ADDRESS_DATA_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            location,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SearchConfig {
    pub fn from_env() -> Result<Self, String> {
        let default_limit = env::var("SEARCH_DEFAULT_LIMIT")
            .unwrap_or_else(|_| SEARCH_DEFAULT_LIMIT.to_string())
            .parse::<usize>()
            .map_err(|_| "SEARCH_DEFAULT_LIMIT must be a valid number".to_string())?;

        let max_limit = env::var("SEARCH_MAX_LIMIT")
            .unwrap_or_else(|_| SEARCH_MAX_LIMIT.to_string())
            .parse::<usize>()
            .map_err(|_| "SEARCH_MAX_LIMIT must be a valid number".to_string())?;

        if default_limit == 0 || default_limit > max_limit {
            return Err(
                "SEARCH_DEFAULT_LIMIT must be between 1 and SEARCH_MAX_LIMIT".to_string(),
            );
        }

        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    /// Clamp a requested limit to the configured bounds
    pub fn limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: SEARCH_DEFAULT_LIMIT,
            max_limit: SEARCH_MAX_LIMIT,
        }
    }
}

impl CascadeConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            clear_postal_code_on_province_change: bool_var(
                "CLEAR_POSTAL_CODE_ON_PROVINCE_CHANGE",
            )?,
            clear_postal_code_on_sub_district_clear: bool_var(
                "CLEAR_POSTAL_CODE_ON_SUB_DISTRICT_CLEAR",
            )?,
        })
    }

    pub fn policy(&self) -> CascadePolicy {
        CascadePolicy {
            clear_postal_code_on_province_change: self.clear_postal_code_on_province_change,
            clear_postal_code_on_sub_district_clear: self.clear_postal_code_on_sub_district_clear,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Prapa Address API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Thai address resolution for the village water utility console".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

fn bool_var(name: &str) -> Result<bool, String> {
    match env::var(name) {
        Ok(value) => parse_bool(&value).ok_or_else(|| format!("{} must be true or false", name)),
        Err(_) => Ok(false),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
