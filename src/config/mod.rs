use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub token: TokenConfig,
    pub routes: RouteConfig,
    pub paths: PathConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Parameters of the stored credential and its symmetric envelope.
///
/// The key and IV must match what the backend used to seal the token. They
/// are shipped with every client, so nothing decoded with them can be
/// trusted for authorization; the server re-checks every mutating call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub cipher_key: String,
    pub cipher_iv_hex: String,
    pub credential_name: String,
    pub expiry_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Route a denied detail view falls back to; `{id}` is replaced with the
    /// trailing segment of the current path.
    pub read_only_template: String,
    pub fallback_route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub login: String,
    pub resource_collection: String,
    pub resource_item: String,
    pub resource_status: String,
    pub user_password: String,
}

pub const DEFAULT_CIPHER_KEY: &str = "InnoHubAdminConsoleTokenKey2023!";
pub const ZERO_IV_HEX: &str = "00000000000000000000000000000000";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("INNOHUB_API_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("INNOHUB_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("INNOHUB_USER_AGENT") {
            self.api.user_agent = v;
        }

        // Token overrides
        if let Ok(v) = env::var("INNOHUB_TOKEN_KEY") {
            self.token.cipher_key = v;
        }
        if let Ok(v) = env::var("INNOHUB_TOKEN_IV") {
            self.token.cipher_iv_hex = v;
        }
        if let Ok(v) = env::var("INNOHUB_CREDENTIAL_NAME") {
            self.token.credential_name = v;
        }
        if let Ok(v) = env::var("INNOHUB_CREDENTIAL_EXPIRY_DAYS") {
            self.token.expiry_days = v.parse().unwrap_or(self.token.expiry_days);
        }

        // Route overrides
        if let Ok(v) = env::var("INNOHUB_READ_ONLY_ROUTE") {
            self.routes.read_only_template = v;
        }
        if let Ok(v) = env::var("INNOHUB_FALLBACK_ROUTE") {
            self.routes.fallback_route = v;
        }

        // Path overrides
        if let Ok(v) = env::var("INNOHUB_PATH_LOGIN") {
            self.paths.login = v;
        }
        if let Ok(v) = env::var("INNOHUB_PATH_COLLECTION") {
            self.paths.resource_collection = v;
        }
        if let Ok(v) = env::var("INNOHUB_PATH_ITEM") {
            self.paths.resource_item = v;
        }
        if let Ok(v) = env::var("INNOHUB_PATH_STATUS") {
            self.paths.resource_status = v;
        }
        if let Ok(v) = env::var("INNOHUB_PATH_PASSWORD") {
            self.paths.user_password = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_secs: 30,
                user_agent: format!("innohub-admin/{}", env!("CARGO_PKG_VERSION")),
            },
            token: TokenConfig::default(),
            routes: RouteConfig::default(),
            paths: PathConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging-api.innohub.example.com".to_string(),
                timeout_secs: 15,
                user_agent: format!("innohub-admin/{}", env!("CARGO_PKG_VERSION")),
            },
            token: TokenConfig {
                expiry_days: 3,
                ..TokenConfig::default()
            },
            routes: RouteConfig::default(),
            paths: PathConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.innohub.example.com".to_string(),
                timeout_secs: 10,
                user_agent: format!("innohub-admin/{}", env!("CARGO_PKG_VERSION")),
            },
            token: TokenConfig {
                expiry_days: 3,
                ..TokenConfig::default()
            },
            routes: RouteConfig::default(),
            paths: PathConfig::default(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            cipher_key: DEFAULT_CIPHER_KEY.to_string(),
            cipher_iv_hex: ZERO_IV_HEX.to_string(),
            credential_name: "innohub_token".to_string(),
            expiry_days: 7,
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            read_only_template: "/ideas/view/{id}".to_string(),
            fallback_route: "/".to_string(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            login: "/api/auth/login".to_string(),
            resource_collection: "/api/{resource}".to_string(),
            resource_item: "/api/{resource}/{id}".to_string(),
            resource_status: "/api/{resource}/{id}/status".to_string(),
            user_password: "/api/users/{id}/password".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
