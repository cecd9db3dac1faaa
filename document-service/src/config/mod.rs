use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub store: StoreConfig,
    pub module_policy: ModulePolicy,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// What create does when `moduleId` matches no module.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModulePolicy {
    /// Reject the request with 422.
    #[default]
    Strict,
    /// Create the document without a module.
    Lenient,
}

impl ModulePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModulePolicy::Strict => "strict",
            ModulePolicy::Lenient => "lenient",
        }
    }

    /// Decide the module reference to store for a create request.
    ///
    /// `found` is the result of looking up `requested` in the store.
    pub fn resolve(self, requested: i32, found: Option<i32>) -> Result<Option<i32>, AppError> {
        match (found, self) {
            (Some(id), _) => Ok(Some(id)),
            (None, ModulePolicy::Strict) => Err(AppError::UnprocessableEntity(anyhow::anyhow!(
                "Module {} does not exist",
                requested
            ))),
            (None, ModulePolicy::Lenient) => {
                tracing::warn!(
                    module_id = requested,
                    "Module not found, creating document without a module"
                );
                Ok(None)
            }
        }
    }
}

impl DocumentConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("postgres"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let database = match backend {
            StoreBackend::Postgres => Some(DatabaseConfig {
                url: get_env("DATABASE_URL", None, is_prod)?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "10", is_prod)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", "1", is_prod)?,
            }),
            StoreBackend::Memory => None,
        };

        Ok(DocumentConfig {
            common: common_config,
            service_name: get_env("SERVICE_NAME", Some("document-service"), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: std::env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            store: StoreConfig { backend, database },
            module_policy: get_env("MODULE_POLICY", Some("strict"), is_prod)?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            allowed_origins: split_origins(&get_env("ALLOWED_ORIGINS", Some("*"), is_prod)?),
        })
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl std::str::FromStr for ModulePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ModulePolicy::Strict),
            "lenient" => Ok(ModulePolicy::Lenient),
            _ => Err(format!("Invalid module policy: {}", s)),
        }
    }
}

fn parse_env(key: &str, default: &str, is_prod: bool) -> Result<u32, AppError> {
    get_env(key, Some(default), is_prod)?
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} must be a number: {}", key, e)))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
