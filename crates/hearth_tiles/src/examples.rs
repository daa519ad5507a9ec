//! # Tile Configuration and Presentation Examples
//!
//! Doc tests showing how tile configs are loaded and checked, and what the
//! presenter produces for them. File paths in diagnostics depend on the temp
//! directory, so the examples assert on the stable parts of the output.
//!
//! ## Defaults
//!
//! A tile only needs an entity. Tap and hold fall back to opening the more
//! info dialog; double tap stays unbound:
//!
//! ```
//! use hearth_tiles::card::ActionConfig;
//! use hearth_tiles::Config;
//! use std::fs;
//!
//! let temp_dir = tempfile::tempdir().unwrap();
//! let config_path = temp_dir.path().join("tiles.toml");
//! fs::write(
//!     &config_path,
//!     r#"
//! [tiles.router]
//! entity = "update.router"
//! "#,
//! )
//! .unwrap();
//!
//! let (config, diagnostics) = Config::from_files(&[config_path]).unwrap();
//! assert!(diagnostics.is_empty());
//!
//! let router = config.tile("router").unwrap();
//! assert_eq!(router.tap_action, Some(ActionConfig::more_info()));
//! assert_eq!(router.hold_action, Some(ActionConfig::more_info()));
//! assert_eq!(router.double_tap_action, None);
//! ```
//!
//! ## Presenting
//!
//! The host supplies entity states as JSON, either keyed by entity id or as a
//! list of state objects. A running installation is reported as `on` with a
//! truthy `in_progress`:
//!
//! ```
//! use hearth_tiles::card::CardConfig;
//! use hearth_tiles::card::INSTALLING_COLOR;
//! use hearth_tiles::EntityStates;
//!
//! let states: EntityStates = serde_json::from_str(
//!     r#"{
//!         "update.router": {
//!             "state": "on",
//!             "attributes": {
//!                 "friendly_name": "Router",
//!                 "in_progress": true,
//!                 "supported_features": 1
//!             }
//!         }
//!     }"#,
//! )
//! .unwrap();
//!
//! let config = hearth_tiles::resolve(CardConfig {
//!     entity: Some("update.router".to_string()),
//!     show_buttons_control: Some(true),
//!     collapsible_controls: Some(true),
//!     ..Default::default()
//! });
//!
//! let descriptor = hearth_tiles::present(Some(&states), &config).unwrap();
//! assert_eq!(descriptor.display_name, "Router");
//! assert!(descriptor.is_installing);
//! assert_eq!(descriptor.color, INSTALLING_COLOR);
//!
//! // Buttons stay visible while installing but can't be pressed
//! assert!(descriptor.show_controls);
//! assert!(descriptor.controls.iter().all(|button| button.disabled));
//! ```
//!
//! ## Tile Warnings
//!
//! A tile without an entity, or pointing at an entity outside the update
//! domain, still loads but produces a warning:
//!
//! ```
//! use hearth_tiles::{format_diagnostics, Config};
//! use std::fs;
//!
//! let temp_dir = tempfile::tempdir().unwrap();
//! let config_path = temp_dir.path().join("tiles.toml");
//! fs::write(
//!     &config_path,
//!     r#"
//! [tiles.placeholder]
//! name = "Nothing yet"
//!
//! [tiles.cpu]
//! entity = "sensor.cpu_temperature"
//! "#,
//! )
//! .unwrap();
//!
//! let (config, diagnostics) = Config::from_files(&[config_path]).unwrap();
//! assert_eq!(config.tiles.len(), 2);
//! assert_eq!(diagnostics.len(), 2);
//! assert!(diagnostics.iter().all(|d| d.is_warning()));
//!
//! let output = format_diagnostics(&diagnostics);
//! println!("{}", output);
//! assert!(output.contains("Tile 'placeholder' has no entity"));
//! assert!(output.contains("'sensor.cpu_temperature', which is not an update entity"));
//! ```
//!
//! ## Merge Conflicts
//!
//! Tiles merge as a whole. Defining the same tile in two files keeps the
//! first definition and reports a conflict:
//!
//! ```
//! use hearth_tiles::Config;
//! use std::fs;
//!
//! let temp_dir = tempfile::tempdir().unwrap();
//!
//! let base_path = temp_dir.path().join("base.toml");
//! fs::write(
//!     &base_path,
//!     r#"
//! [tiles.router]
//! entity = "update.router"
//! "#,
//! )
//! .unwrap();
//!
//! let override_path = temp_dir.path().join("override.toml");
//! fs::write(
//!     &override_path,
//!     r#"
//! [tiles.router]
//! entity = "update.modem"
//! "#,
//! )
//! .unwrap();
//!
//! let error = Config::from_files(&[base_path, override_path]).unwrap_err();
//! let message = error.to_string();
//! println!("{}", message);
//! assert!(message.contains("Merge conflict in field 'tiles.router'"));
//! ```
//!
//! ## Validation Errors
//!
//! A card type other than this tile's is rejected:
//!
//! ```
//! use hearth_tiles::Config;
//! use std::fs;
//!
//! let temp_dir = tempfile::tempdir().unwrap();
//! let config_path = temp_dir.path().join("tiles.toml");
//! fs::write(
//!     &config_path,
//!     r#"
//! [tiles.router]
//! type = "custom:light-tile"
//! entity = "update.router"
//! "#,
//! )
//! .unwrap();
//!
//! let error = Config::from_files(&[config_path]).unwrap_err();
//! let message = error.to_string();
//! println!("{}", message);
//! assert!(message.contains("Validation error in 'tiles.router.type'"));
//! assert!(message.contains("expected 'custom:update-tile'"));
//! ```
//!
//! ## Empty Config Warning
//!
//! ```
//! use hearth_tiles::{format_diagnostics, Config};
//! use std::fs;
//!
//! let temp_dir = tempfile::tempdir().unwrap();
//! let empty_path = temp_dir.path().join("empty.toml");
//! fs::write(&empty_path, "# Just a comment\n").unwrap();
//!
//! let (config, diagnostics) = Config::from_files(&[empty_path]).unwrap();
//! assert!(config.tiles.is_empty());
//!
//! let output = format_diagnostics(&diagnostics);
//! assert!(output.starts_with("Warning: Config file"));
//! assert!(output.contains("is empty and has no effect"));
//! ```
