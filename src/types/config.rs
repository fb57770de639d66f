//! Configuration structures.
//!
//! Configuration is loaded from command-line flags and environment variables.
//! The signing key itself is never part of `Config`; it is read separately so
//! the config tree can be logged.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default ActionKit API root.
pub const DEFAULT_BASE_URL: &str = "https://actionkit.useparagon.com";

/// Global bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote ActionKit service.
    #[serde(default)]
    pub actionkit: ActionKitConfig,

    /// Credential issuance.
    #[serde(default)]
    pub credential: CredentialConfig,

    /// Schema translation rules.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Tool set construction.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Stdio server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Remote ActionKit service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionKitConfig {
    /// API root, without trailing slash.
    pub base_url: String,

    /// Project whose actions are exposed.
    pub project_id: String,

    /// Timeout applied to every outbound request.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ActionKitConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: String::new(),
            request_timeout: Duration::from_secs(30),
            user_agent: "actionkit-app/1.0".to_string(),
        }
    }
}

/// Credential issuance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Subject the credential is issued for.
    pub subject: String,

    /// Validity window (default: 7 days).
    #[serde(with = "humantime_serde")]
    pub validity: Duration,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            subject: String::new(),
            validity: Duration::from_secs(60 * 60 * 24 * 7),
        }
    }
}

/// How the string length limit is applied to `string` and `object` properties.
///
/// The default is `Max`, which departs from the catalog's literal
/// `length(255)` rule: under `Exact`, a required string property only accepts
/// values of exactly 255 characters, so short values such as `"x"` would be
/// rejected. Select `Exact` for literal parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StringLengthMode {
    /// At most `string_max_len` characters.
    #[default]
    Max,
    /// Exactly `string_max_len` characters.
    Exact,
}

/// Schema translation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Length limit for `string` and `object` properties.
    pub string_max_len: usize,

    /// How `string_max_len` is enforced.
    pub string_length_mode: StringLengthMode,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            string_max_len: 255,
            string_length_mode: StringLengthMode::Max,
        }
    }
}

/// What the bridge does with a descriptor it cannot register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuildPolicy {
    /// Abort construction; no tool set is produced.
    #[default]
    Abort,
    /// Skip the descriptor with a warning and keep going.
    Skip,
}

/// Tool set construction configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    pub policy: BuildPolicy,
}

/// Stdio server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported in `initialize`.
    pub name: String,

    /// Version reported in `initialize`.
    pub version: String,

    /// Maximum accepted size of one request line in bytes.
    pub max_line_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "actionkit-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_line_bytes: 5 * 1024 * 1024,
        }
    }
}
