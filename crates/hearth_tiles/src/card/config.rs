use std::ops::Deref;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::ActionConfig;
use super::IconType;
use super::Info;
use super::Layout;

/// User-authored tile configuration. Every field may be missing.
///
/// Keys the tile does not know about are kept in `extra` and survive
/// resolution untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    /// Entity id of the update entity to show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    // Appearance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_container: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_info: Option<Info>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_info: Option<Info>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<IconType>,

    // Older appearance flags, superseded by the fields above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_name: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_state: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_icon: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_entity_picture: Option<bool>,

    // Actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_tap_action: Option<ActionConfig>,

    // Controls
    /// Hide the install/skip row while the entity is inactive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsible_controls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_buttons_control: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A [`CardConfig`] whose tap and hold actions are guaranteed to be set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedCardConfig(CardConfig);

impl ResolvedCardConfig {
    pub fn into_inner(self) -> CardConfig {
        self.0
    }

    pub fn collapsible_controls(&self) -> bool {
        self.0.collapsible_controls.unwrap_or(false)
    }

    pub fn show_buttons_control(&self) -> bool {
        self.0.show_buttons_control.unwrap_or(false)
    }
}

impl Deref for ResolvedCardConfig {
    type Target = CardConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<CardConfig> for ResolvedCardConfig {
    fn from(raw: CardConfig) -> Self {
        resolve(raw)
    }
}

/// Fill in the default tap and hold actions.
///
/// Only a missing action is replaced; an explicit one, `none` included, is
/// kept as written.
pub fn resolve(raw: CardConfig) -> ResolvedCardConfig {
    let mut config = raw;
    config.tap_action.get_or_insert_with(ActionConfig::more_info);
    config.hold_action.get_or_insert_with(ActionConfig::more_info);
    ResolvedCardConfig(config)
}
