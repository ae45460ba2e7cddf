//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr};

use clap::{Args, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "blogwire";
const ENV_PREFIX: &str = "BLOGWIRE";
const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
const DEFAULT_GRAPHQL_PATH: &str = "api/graphql";
const DEFAULT_REFRESH_PATH: &str = "api/token/refresh";
const DEFAULT_LOGIN_PATH: &str = "api/login";
const DEFAULT_REGISTER_PATH: &str = "api/register";
const DEFAULT_TOKEN_FILE: &str = ".blogwire/tokens.json";

/// Configuration overrides shared by every command of the CLI.
#[derive(Debug, Args, Default, Clone)]
pub struct ConfigArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "BLOGWIRE_CONFIG_FILE", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// Override the API base URL, e.g. <https://blog.example.com/>.
    #[arg(long = "api-base-url", env = "BLOGWIRE_API_BASE_URL", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Override the file used to persist access and refresh tokens.
    #[arg(long = "token-file", env = "BLOGWIRE_TOKEN_FILE", value_name = "PATH", global = true)]
    pub token_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved client settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Always ends with `/` so relative paths join beneath it.
    pub base_url: Url,
    pub graphql_path: String,
    pub refresh_path: String,
    pub login_path: String,
    pub register_path: String,
}

impl ApiSettings {
    /// Settings for `base_url` with every endpoint at its default path.
    pub fn for_base_url(base_url: &str) -> Result<Self, LoadError> {
        build_api_settings(RawApiSettings {
            base_url: Some(base_url.to_string()),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub store: TokenStoreKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStoreKind {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(args: &ConfigArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = args.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(args);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    auth: RawAuthSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    graphql_path: Option<String>,
    refresh_path: Option<String>,
    login_path: Option<String>,
    register_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    store: Option<String>,
    token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ConfigArgs) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(path) = overrides.token_file.as_ref() {
            self.auth.token_file = Some(path.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { api, auth, logging } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            auth: build_auth_settings(auth)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_url = api
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let mut base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("api.base_url", format!("failed to parse: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "api.base_url",
            format!("unsupported scheme `{}`", base_url.scheme()),
        ));
    }
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url.set_query(None);
    base_url.set_fragment(None);

    Ok(ApiSettings {
        base_url,
        graphql_path: endpoint_path(api.graphql_path, DEFAULT_GRAPHQL_PATH, "api.graphql_path")?,
        refresh_path: endpoint_path(api.refresh_path, DEFAULT_REFRESH_PATH, "api.refresh_path")?,
        login_path: endpoint_path(api.login_path, DEFAULT_LOGIN_PATH, "api.login_path")?,
        register_path: endpoint_path(
            api.register_path,
            DEFAULT_REGISTER_PATH,
            "api.register_path",
        )?,
    })
}

fn endpoint_path(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    let path = value.unwrap_or_else(|| default.to_string());
    let trimmed = path.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(LoadError::invalid(key, "path must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let store = match auth.store.as_deref().map(str::trim) {
        None | Some("file") => {
            let path = auth
                .token_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));
            if path.as_os_str().is_empty() {
                return Err(LoadError::invalid(
                    "auth.token_file",
                    "path must not be empty",
                ));
            }
            TokenStoreKind::File(path)
        }
        Some("memory") => TokenStoreKind::Memory,
        Some(other) => {
            return Err(LoadError::invalid(
                "auth.store",
                format!("expected `file` or `memory`, got `{other}`"),
            ));
        }
    };

    Ok(AuthSettings { store })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[cfg(test)]
mod tests;
