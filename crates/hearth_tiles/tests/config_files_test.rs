use std::fs;

use hearth_tiles::card::ActionConfig;
use hearth_tiles::card::Layout;
use hearth_tiles::Config;
use hearth_tiles::EntityStates;
use tempfile::TempDir;

#[test]
fn test_tiles_from_files_present_end_to_end() {
    let temp_dir = TempDir::new().unwrap();

    let base = temp_dir.path().join("base.toml");
    fs::write(
        &base,
        r#"
imports = ["tiles.toml"]

[logging]
level = "warn"
"#,
    )
    .unwrap();

    fs::write(
        temp_dir.path().join("tiles.toml"),
        r#"
[tiles.router]
entity = "update.router"
name = "Router firmware"
layout = "horizontal"
show_buttons_control = true
collapsible_controls = true
hold_action = { action = "none" }

[tiles.nas]
entity = "update.nas"
icon = "mdi:nas"
"#,
    )
    .unwrap();

    let (config, diagnostics) = Config::from_files(&[base]).unwrap();
    assert!(diagnostics.is_empty(), "unexpected: {:?}", diagnostics);
    assert_eq!(config.tiles.len(), 2);

    let router = config.tile("router").unwrap();
    assert_eq!(router.hold_action, Some(ActionConfig::noop()));
    assert_eq!(router.layout, Some(Layout::Horizontal));

    let states: EntityStates = serde_json::from_str(
        r#"[
            {"entity_id": "update.router", "state": "off",
             "attributes": {"friendly_name": "Router", "supported_features": 1}},
            {"entity_id": "update.nas", "state": "on",
             "attributes": {"friendly_name": "NAS", "supported_features": 1}}
        ]"#,
    )
    .unwrap();

    let router = hearth_tiles::present(Some(&states), router).unwrap();
    assert_eq!(router.display_name, "Router firmware");
    assert!(!router.show_controls, "collapsed while up to date");
    assert!(!router.controls_fill);
    assert!(!router.action_bindings.has_hold);

    let nas = hearth_tiles::present(Some(&states), config.tile("nas").unwrap()).unwrap();
    assert_eq!(nas.display_name, "NAS");
    assert_eq!(nas.icon, "mdi:nas");
    assert!(!nas.show_controls, "buttons not enabled for this tile");
    assert!(nas.action_bindings.has_hold);
}

#[test]
fn test_tile_conflict_across_files() {
    let temp_dir = TempDir::new().unwrap();

    let first = temp_dir.path().join("first.toml");
    fs::write(&first, "[tiles.router]\nentity = \"update.router\"\n").unwrap();
    let second = temp_dir.path().join("second.toml");
    fs::write(&second, "[tiles.router]\nentity = \"update.modem\"\n").unwrap();

    let err = Config::from_files(&[first, second]).unwrap_err().to_string();
    assert!(err.contains("Merge conflict in field 'tiles.router'"));
}
