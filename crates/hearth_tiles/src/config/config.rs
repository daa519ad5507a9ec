use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use super::diagnostics::format_diagnostics;
use super::diagnostics::Diagnostic;
use super::diagnostics::Error;
use super::diagnostics::LoadError;
use super::diagnostics::ValidationError;
use super::diagnostics::Warning;
use super::partial::MergedConfig;
use super::partial::PartialConfig;
use super::partial::PartialTile;
use crate::card::resolve;
use crate::card::ResolvedCardConfig;
use crate::card::CARD_TYPE;
use crate::entity::entity_domain;
use crate::entity::UPDATE_ENTITY_DOMAINS;

pub const DEFAULT_LISTEN: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8565;

#[derive(Debug, Default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub api: ApiConfig,
    /// Tiles keyed by id, already resolved.
    pub tiles: BTreeMap<String, ResolvedCardConfig>,
}

// LogLevel needs Deserialize because it's used in PartialLoggingConfig with toml::Spanned
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: LogLevel,

    /// Per-target levels, e.g. `"hearth_tiles::api" = "debug"`
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Subscriber filter for this config.
    pub fn filter(&self) -> Targets {
        Targets::new()
            .with_default(LevelFilter::from(self.level))
            .with_targets(
                self.overrides
                    .iter()
                    .map(|(target, level)| (target.clone(), LevelFilter::from(*level))),
            )
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{}", format_diagnostics(.0))]
    Invalid(Vec<Diagnostic>),
}

impl Config {
    /// Load configuration from multiple TOML files with import resolution
    ///
    /// Files are merged first-wins; conflicts, validation errors and warnings
    /// are all collected before anything is reported.
    ///
    /// Returns Ok((Config, diagnostics)) where diagnostics contains warnings.
    /// Only returns Err if there are actual errors (not just warnings).
    pub fn from_files(paths: &[PathBuf]) -> Result<(Self, Vec<Diagnostic>), ConfigError> {
        let configs = PartialConfig::load_with_imports(paths)?;

        let (merged, diagnostics) = PartialConfig::merge(configs);

        Self::from_merged(merged, diagnostics)
    }

    /// Convert a merged partial config, validating every tile
    pub fn from_merged(
        merged: MergedConfig,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<(Self, Vec<Diagnostic>), ConfigError> {
        let logging = match merged.logging {
            Some(partial) => LoggingConfig {
                level: partial.level.map(|s| s.into_inner()).unwrap_or_default(),
                overrides: partial
                    .overrides
                    .map(|hm| hm.into_iter().map(|(k, v)| (k, v.into_inner())).collect())
                    .unwrap_or_default(),
            },
            None => LoggingConfig::default(),
        };

        let api = match merged.api {
            Some(partial) => ApiConfig {
                listen: partial
                    .listen
                    .map(|s| s.into_inner())
                    .unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
                port: partial.port.map(|s| s.into_inner()).unwrap_or(DEFAULT_PORT),
            },
            None => ApiConfig::default(),
        };

        if api.port == 0 {
            diagnostics.push(Diagnostic::Error(Error::Validation(ValidationError {
                field_path: "api.port".to_string(),
                message: "port must not be 0".to_string(),
                location: None,
            })));
        }

        let mut tiles = BTreeMap::new();
        for (key, tile) in merged.tiles {
            diagnostics.extend(Self::validate_tile(&key, &tile));
            tiles.insert(key, resolve(tile.config));
        }

        let has_errors = diagnostics.iter().any(|d| d.is_error());

        if has_errors {
            Err(ConfigError::Invalid(diagnostics))
        } else {
            Ok((
                Config {
                    logging,
                    api,
                    tiles,
                },
                diagnostics,
            ))
        }
    }

    /// Check one tile; problems that still leave a usable tile are warnings
    fn validate_tile(key: &str, tile: &PartialTile) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let location = Some(tile.location.clone());

        let expected_type = format!("custom:{}", CARD_TYPE);
        if let Some(card_type) = tile.config.card_type.as_deref() {
            if card_type != expected_type {
                diagnostics.push(Diagnostic::Error(Error::Validation(ValidationError {
                    field_path: format!("tiles.{}.type", key),
                    message: format!(
                        "unsupported card type '{}', expected '{}'",
                        card_type, expected_type
                    ),
                    location: location.clone(),
                })));
            }
        }

        match tile.config.entity.as_deref() {
            None | Some("") => {
                diagnostics.push(Diagnostic::Warning(Warning::TileWithoutEntity {
                    tile: key.to_string(),
                    location,
                }));
            }
            Some(entity) if !UPDATE_ENTITY_DOMAINS.contains(&entity_domain(entity)) => {
                diagnostics.push(Diagnostic::Warning(Warning::NotAnUpdateEntity {
                    tile: key.to_string(),
                    entity: entity.to_string(),
                    location,
                }));
            }
            Some(_) => {}
        }

        diagnostics
    }

    pub fn tile(&self, id: &str) -> Option<&ResolvedCardConfig> {
        self.tiles.get(id)
    }
}
