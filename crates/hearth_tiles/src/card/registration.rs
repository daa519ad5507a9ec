//! How the tile announces itself to the host.

use serde::Serialize;

use super::CardConfig;
use crate::entity::entity_domain;
use crate::entity::UPDATE_ENTITY_DOMAINS;

pub const CARD_TYPE: &str = "update-tile";

/// Layout height of the tile in host grid units. Fixed.
pub const CARD_SIZE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardInfo {
    #[serde(rename = "type")]
    pub card_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CARD_INFO: CardInfo = CardInfo {
    card_type: CARD_TYPE,
    name: "Update Tile",
    description: "Tile for update entity",
};

/// Starter config for a freshly added tile, pointing at the first update
/// entity among `entity_ids` (if any).
pub fn stub_config<'a>(entity_ids: impl IntoIterator<Item = &'a str>) -> CardConfig {
    let entity = entity_ids
        .into_iter()
        .find(|id| UPDATE_ENTITY_DOMAINS.contains(&entity_domain(id)))
        .map(str::to_string);

    CardConfig {
        card_type: Some(format!("custom:{CARD_TYPE}")),
        entity,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityStates;

    #[test]
    fn test_stub_picks_first_update_entity() {
        let ids = ["light.kitchen", "update.router", "update.nas", "sensor.cpu"];
        let stub = stub_config(ids);
        assert_eq!(stub.card_type.as_deref(), Some("custom:update-tile"));
        assert_eq!(stub.entity.as_deref(), Some("update.router"));
    }

    #[test]
    fn test_stub_follows_host_order() {
        let states: EntityStates = serde_json::from_str(
            r#"[
                {"entity_id": "light.kitchen", "state": "on"},
                {"entity_id": "update.zigbee", "state": "off"},
                {"entity_id": "update.alpine", "state": "on"}
            ]"#,
        )
        .unwrap();
        let stub = stub_config(states.entity_ids());
        assert_eq!(stub.entity.as_deref(), Some("update.zigbee"));
    }

    #[test]
    fn test_stub_without_update_entities() {
        let stub = stub_config(["light.kitchen", "updater.legacy"]);
        assert_eq!(stub.entity, None);
        assert_eq!(stub.card_type.as_deref(), Some("custom:update-tile"));
    }

    #[test]
    fn test_stub_leaves_actions_unset() {
        let stub = stub_config(std::iter::empty());
        assert_eq!(stub.tap_action, None);
        assert_eq!(stub.hold_action, None);
    }
}
