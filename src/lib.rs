//! Task Manager
//!
//! A task-tracking backend: users create tasks, assign them to other users,
//! tag them with labels, and move them through named workflow statuses.
//! Tasks are filtered by composable optional dimensions, updated through
//! sparse three-state payloads, and protected by referential guards on
//! delete.

pub mod api;
pub mod auth;
pub mod domain;
pub mod seed;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub auth: AuthYamlConfig,
    pub admin: AdminYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Auth configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthYamlConfig {
    /// JWT signing secret (HS256). Override the default outside development.
    pub jwt_secret: String,
    /// JWT token lifetime in seconds (default: 28800 = 8h)
    pub jwt_expiry_secs: u64,
}

impl Default for AuthYamlConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "task-manager-dev-secret-change-me!".into(),
            jwt_expiry_secs: 28800,
        }
    }
}

/// Seed account created on first start when the store is empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminYamlConfig {
    pub email: String,
    pub password: String,
}

impl Default for AdminYamlConfig {
    fn default() -> Self {
        Self {
            email: "admin@example.com".into(),
            password: "qwerty".into(),
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env
    /// vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file
    /// doesn't exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or(yaml.auth.jwt_secret),
            jwt_expiry_secs: std::env::var("JWT_EXPIRY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.auth.jwt_expiry_secs),
            admin_email: std::env::var("ADMIN_EMAIL").unwrap_or(yaml.admin.email),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or(yaml.admin.password),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any
    /// failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Shared application state
// ============================================================================

/// Shared application state: the entity store and the runtime config.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn store::EntityStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state backed by a fresh in-memory store.
    pub fn new(config: Config) -> Self {
        Self::with_store(Arc::new(store::MemoryStore::new()), config)
    }

    /// Create application state over an existing store.
    pub fn with_store(store: Arc<dyn store::EntityStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn tasks(&self) -> domain::TaskService {
        domain::TaskService::new(self.store.clone())
    }

    pub fn users(&self) -> domain::UserService {
        domain::UserService::new(self.store.clone())
    }

    pub fn statuses(&self) -> domain::StatusService {
        domain::StatusService::new(self.store.clone())
    }

    pub fn labels(&self) -> domain::LabelService {
        domain::LabelService::new(self.store.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
