use hearth_tiles::card::resolve;
use hearth_tiles::card::CardConfig;
use hearth_tiles::card::Presenter;
use hearth_tiles::card::INSTALLING_COLOR;
use hearth_tiles::card::MUTED_COLOR;
use hearth_tiles::card::UPDATE_AVAILABLE_COLOR;
use hearth_tiles::entity::SupportedFeatures;
use hearth_tiles::EntitySnapshot;
use hearth_tiles::EntityStates;
use hearth_tiles::StateCategory;
use serde_json::json;

fn tile(show_buttons_control: bool, collapsible_controls: bool) -> CardConfig {
    CardConfig {
        entity: Some("update.router".to_string()),
        show_buttons_control: Some(show_buttons_control),
        collapsible_controls: Some(collapsible_controls),
        ..Default::default()
    }
}

fn states(state: &str, attributes: serde_json::Value) -> EntityStates {
    serde_json::from_value(json!({
        "update.router": {"state": state, "attributes": attributes}
    }))
    .unwrap()
}

#[test]
fn test_update_available_shows_controls() {
    let states = states(
        "on",
        json!({
            "friendly_name": "Router",
            "latest_version": "2.4.1",
            "installed_version": "2.3.0",
            "supported_features": 1
        }),
    );
    let descriptor = hearth_tiles::present(Some(&states), &resolve(tile(true, false))).unwrap();

    assert!(descriptor.show_controls);
    assert_eq!(descriptor.color, UPDATE_AVAILABLE_COLOR);
    assert!(!descriptor.is_installing);

    insta::assert_snapshot!(serde_json::to_string_pretty(&descriptor).unwrap(), @r###"
    {
      "entity_id": "update.router",
      "state": "on",
      "display_name": "Router",
      "state_display": "2.4.1",
      "icon": "mdi:package-up",
      "picture": null,
      "color": [
        255,
        152,
        0
      ],
      "is_installing": false,
      "is_available": true,
      "show_controls": true,
      "controls": [
        {
          "button": "skip",
          "icon": "mdi:cancel",
          "disabled": false,
          "service_call": {
            "domain": "update",
            "service": "skip",
            "entity_id": "update.router"
          }
        },
        {
          "button": "install",
          "icon": "mdi:cellphone-arrow-down",
          "disabled": false,
          "service_call": {
            "domain": "update",
            "service": "install",
            "entity_id": "update.router"
          }
        }
      ],
      "controls_fill": true,
      "action_bindings": {
        "has_hold": true,
        "has_double_click": false
      },
      "appearance": {
        "layout": "default",
        "fill_container": false,
        "primary_info": "name",
        "secondary_info": "state",
        "icon_type": "icon"
      }
    }
    "###);
}

#[test]
fn test_installing_color_regardless_of_control_flags() {
    let states = states(
        "on",
        json!({"in_progress": 60, "supported_features": 5}),
    );

    for show in [false, true] {
        for collapsible in [false, true] {
            let descriptor =
                hearth_tiles::present(Some(&states), &resolve(tile(show, collapsible))).unwrap();
            assert!(descriptor.is_installing);
            assert_eq!(descriptor.color, INSTALLING_COLOR);
            assert_eq!(descriptor.icon, "mdi:package-down");
            assert_eq!(descriptor.state_display, "Installing (60%)");
            // Installing counts as active, so only show_buttons_control matters
            assert_eq!(descriptor.show_controls, show);
            assert!(descriptor.controls.iter().all(|b| b.disabled));
        }
    }
}

#[test]
fn test_unavailable_is_muted_and_hidden() {
    let states = states("unavailable", json!({"supported_features": 1}));

    let descriptor = hearth_tiles::present(Some(&states), &resolve(tile(true, true))).unwrap();
    assert!(!descriptor.is_available);
    assert!(!descriptor.show_controls);
    assert!(descriptor.controls.is_empty());
    assert_eq!(descriptor.color, MUTED_COLOR);
}

#[test]
fn test_unrecognized_state_falls_back_to_unknown() {
    let states = states("exploded", json!({"supported_features": 1}));

    let descriptor = hearth_tiles::present(Some(&states), &resolve(tile(true, true))).unwrap();
    assert_eq!(descriptor.state, StateCategory::Unknown);
    assert_eq!(descriptor.color, MUTED_COLOR);
    assert!(descriptor.is_available);
    assert!(!descriptor.show_controls);
    assert_eq!(descriptor.state_display, "Unknown");
}

#[test]
fn test_repeated_presentation_is_stable() {
    let presenter = Presenter::new();
    let config = resolve(tile(true, false));
    let entity = EntitySnapshot::new("update.router", StateCategory::UpdateAvailable)
        .with_features(SupportedFeatures::INSTALL);

    let first = presenter.present_entity(&entity, &config);
    let second = presenter.present_entity(&entity, &config);
    assert_eq!(first, second);
}

#[test]
fn test_presenting_from_threads() {
    let config = resolve(tile(true, false));
    let states = states("on", json!({"supported_features": 1}));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| hearth_tiles::present(Some(&states), &config)))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().unwrap().show_controls);
        }
    });
}
