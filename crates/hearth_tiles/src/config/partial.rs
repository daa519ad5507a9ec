use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use super::diagnostics::Diagnostic;
use super::diagnostics::Error;
use super::diagnostics::LoadError;
use super::diagnostics::MergeError;
use super::diagnostics::SourceInfo;
use super::diagnostics::SourceLocation;
use super::diagnostics::Warning;
use super::LogLevel;
use crate::card::CardConfig;

#[derive(Debug, Default, Deserialize)]
pub struct PartialConfig {
    #[serde(default)]
    pub imports: Vec<String>,

    pub logging: Option<PartialLoggingConfig>,
    pub api: Option<PartialApiConfig>,
    pub tiles: Option<HashMap<String, toml::Spanned<CardConfig>>>,

    /// Source information for error reporting (not serialized)
    #[serde(skip)]
    pub source: Option<SourceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialLoggingConfig {
    pub level: Option<toml::Spanned<LogLevel>>,
    pub overrides: Option<HashMap<String, toml::Spanned<LogLevel>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialApiConfig {
    pub listen: Option<toml::Spanned<String>>,
    pub port: Option<toml::Spanned<u16>>,
}

/// A tile as it came out of the merge, still tied to where it was written.
#[derive(Debug, Clone)]
pub struct PartialTile {
    pub config: CardConfig,
    pub location: SourceLocation,
}

/// Result of merging every loaded file.
#[derive(Debug, Default)]
pub struct MergedConfig {
    pub imports: Vec<String>,
    pub logging: Option<PartialLoggingConfig>,
    pub api: Option<PartialApiConfig>,
    pub tiles: HashMap<String, PartialTile>,
}

/// First-wins slot that records a conflict when written twice.
fn merge_field<T>(
    slot: &mut Option<(T, SourceLocation)>,
    value: T,
    location: SourceLocation,
    field_path: &str,
    message: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let Some((_, prev_loc)) = slot.as_ref() {
        diagnostics.push(Diagnostic::Error(Error::Merge(MergeError {
            field_path: field_path.to_string(),
            message: message.to_string(),
            conflicts: vec![prev_loc.clone(), location],
        })));
    } else {
        *slot = Some((value, location));
    }
}

impl PartialConfig {
    /// Load a single config file without processing imports
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut config: PartialConfig = toml::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            error: e,
        })?;

        config.source = Some(SourceInfo {
            file_path: path.to_path_buf(),
            content,
        });

        Ok(config)
    }

    /// Load config files with import resolution
    ///
    /// Each config file is loaded, then its imports are recursively processed.
    /// Cycle detection prevents infinite loops.
    ///
    /// Returns a Vec of all loaded configs in order (imports first, then parent)
    pub fn load_with_imports(paths: &[PathBuf]) -> Result<Vec<Self>, LoadError> {
        let mut visited = HashSet::new();
        let mut all_configs = Vec::new();

        for path in paths {
            Self::load_recursive(path, &mut visited, &mut all_configs)?;
        }

        Ok(all_configs)
    }

    fn load_recursive(
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        configs: &mut Vec<Self>,
    ) -> Result<(), LoadError> {
        let canonical_path = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        if visited.contains(&canonical_path) {
            return Err(LoadError::ImportCycle {
                path: canonical_path.clone(),
                cycle: visited.iter().cloned().collect(),
            });
        }

        visited.insert(canonical_path.clone());

        let config = Self::from_file(path)?;
        tracing::debug!("Loaded config file {}", path.display());

        // Imports first (depth-first), relative to the importing file
        for import_path in &config.imports {
            let import_path_buf = PathBuf::from(import_path);

            let resolved_path = if import_path_buf.is_absolute() {
                import_path_buf
            } else {
                let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
                parent_dir.join(import_path_buf)
            };

            Self::load_recursive(&resolved_path, visited, configs)?;
        }

        configs.push(config);

        // Sibling branches may import the same file
        visited.remove(&canonical_path);

        Ok(())
    }

    /// Merge multiple partial configs together
    ///
    /// Uses first-wins semantics: the first occurrence of a field is kept.
    /// Conflicts (same field or same tile defined in multiple configs) are
    /// collected as errors but merging continues so all of them are reported
    /// at once. Tiles are merged as a whole; a tile is never assembled from
    /// pieces of different files.
    ///
    /// Returns (merged, diagnostics) where diagnostics may contain warnings and errors
    pub fn merge<I>(configs: I) -> (MergedConfig, Vec<Diagnostic>)
    where
        I: IntoIterator<Item = Self>,
    {
        let mut diagnostics = Vec::new();
        let mut imports = Vec::new();

        let mut logging_seen = false;
        let mut level = None;
        let mut overrides: HashMap<String, (toml::Spanned<LogLevel>, SourceLocation)> =
            HashMap::new();
        let mut api_seen = false;
        let mut listen = None;
        let mut port = None;
        let mut tiles: HashMap<String, PartialTile> = HashMap::new();

        for config in configs {
            imports.extend(config.imports.iter().cloned());

            let source_info = config.source.clone().unwrap_or_else(|| SourceInfo {
                file_path: PathBuf::from("<unknown>"),
                content: String::new(),
            });

            let is_empty = config.logging.is_none()
                && config.api.is_none()
                && config.tiles.is_none()
                && config.imports.is_empty();

            if is_empty {
                diagnostics.push(Diagnostic::Warning(Warning::EmptyConfig {
                    file_path: source_info.file_path.clone(),
                }));
            }

            if let Some(logging) = config.logging {
                logging_seen = true;

                if let Some(value) = logging.level {
                    let location = SourceLocation::new(&source_info, value.span());
                    merge_field(
                        &mut level,
                        value,
                        location,
                        "logging.level",
                        "Logging level defined in multiple config files",
                        &mut diagnostics,
                    );
                }

                for (key, value) in logging.overrides.unwrap_or_default() {
                    let location = SourceLocation::new(&source_info, value.span());
                    if let Some((_, prev_loc)) = overrides.get(&key) {
                        diagnostics.push(Diagnostic::Error(Error::Merge(MergeError {
                            field_path: format!("logging.overrides.{}", key),
                            message: format!(
                                "Logging override for '{}' defined in multiple config files",
                                key
                            ),
                            conflicts: vec![prev_loc.clone(), location],
                        })));
                    } else {
                        overrides.insert(key, (value, location));
                    }
                }
            }

            if let Some(api) = config.api {
                api_seen = true;

                if let Some(value) = api.listen {
                    let location = SourceLocation::new(&source_info, value.span());
                    merge_field(
                        &mut listen,
                        value,
                        location,
                        "api.listen",
                        "API listen address defined in multiple config files",
                        &mut diagnostics,
                    );
                }

                if let Some(value) = api.port {
                    let location = SourceLocation::new(&source_info, value.span());
                    merge_field(
                        &mut port,
                        value,
                        location,
                        "api.port",
                        "API port defined in multiple config files",
                        &mut diagnostics,
                    );
                }
            }

            for (key, value) in config.tiles.unwrap_or_default() {
                let location = SourceLocation::new(&source_info, value.span());

                if let Some(prev) = tiles.get(&key) {
                    diagnostics.push(Diagnostic::Error(Error::Merge(MergeError {
                        field_path: format!("tiles.{}", key),
                        message: format!("Tile '{}' defined in multiple config files", key),
                        conflicts: vec![prev.location.clone(), location],
                    })));
                } else {
                    tiles.insert(
                        key,
                        PartialTile {
                            config: value.into_inner(),
                            location,
                        },
                    );
                }
            }
        }

        let logging = logging_seen.then(|| PartialLoggingConfig {
            level: level.map(|(value, _)| value),
            overrides: Some(
                overrides
                    .into_iter()
                    .map(|(key, (value, _))| (key, value))
                    .collect(),
            ),
        });

        let api = api_seen.then(|| PartialApiConfig {
            listen: listen.map(|(value, _)| value),
            port: port.map(|(value, _)| value),
        });

        let merged = MergedConfig {
            imports,
            logging,
            api,
            tiles,
        };

        (merged, diagnostics)
    }
}
