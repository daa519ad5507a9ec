use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumString;

use super::CardConfig;

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Layout {
    #[default]
    Default,
    Horizontal,
    Vertical,
}

/// What goes in the primary or secondary text line.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Info {
    #[default]
    Name,
    State,
    LastChanged,
    LastUpdated,
    None,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IconType {
    #[default]
    Icon,
    EntityPicture,
    None,
}

/// Fully resolved appearance options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Appearance {
    pub layout: Layout,
    pub fill_container: bool,
    pub primary_info: Info,
    pub secondary_info: Info,
    pub icon_type: IconType,
}

/// Resolve appearance options, honouring the older boolean flags
/// (`vertical`, `hide_name`, `hide_state`, `hide_icon`, `use_entity_picture`)
/// when the newer fields are not set.
pub fn compute_appearance(config: &CardConfig) -> Appearance {
    let flag = |value: Option<bool>| value.unwrap_or(false);

    Appearance {
        layout: config.layout.unwrap_or(if flag(config.vertical) {
            Layout::Vertical
        } else {
            Layout::Default
        }),
        fill_container: flag(config.fill_container),
        primary_info: config.primary_info.unwrap_or(if flag(config.hide_name) {
            Info::None
        } else {
            Info::Name
        }),
        secondary_info: config.secondary_info.unwrap_or(if flag(config.hide_state) {
            Info::None
        } else {
            Info::State
        }),
        icon_type: config.icon_type.unwrap_or(if flag(config.use_entity_picture) {
            IconType::EntityPicture
        } else if flag(config.hide_icon) {
            IconType::None
        } else {
            IconType::Icon
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let appearance = compute_appearance(&CardConfig::default());
        assert_eq!(
            appearance,
            Appearance {
                layout: Layout::Default,
                fill_container: false,
                primary_info: Info::Name,
                secondary_info: Info::State,
                icon_type: IconType::Icon,
            }
        );
    }

    #[test]
    fn test_legacy_flags() {
        let config = CardConfig {
            vertical: Some(true),
            hide_name: Some(true),
            hide_state: Some(true),
            hide_icon: Some(true),
            ..Default::default()
        };
        let appearance = compute_appearance(&config);
        assert_eq!(appearance.layout, Layout::Vertical);
        assert_eq!(appearance.primary_info, Info::None);
        assert_eq!(appearance.secondary_info, Info::None);
        assert_eq!(appearance.icon_type, IconType::None);
    }

    #[test]
    fn test_entity_picture_flag_beats_hide_icon() {
        let config = CardConfig {
            use_entity_picture: Some(true),
            hide_icon: Some(true),
            ..Default::default()
        };
        assert_eq!(compute_appearance(&config).icon_type, IconType::EntityPicture);
    }

    #[test]
    fn test_explicit_fields_win_over_legacy_flags() {
        let config = CardConfig {
            layout: Some(Layout::Horizontal),
            vertical: Some(true),
            icon_type: Some(IconType::Icon),
            use_entity_picture: Some(true),
            ..Default::default()
        };
        let appearance = compute_appearance(&config);
        assert_eq!(appearance.layout, Layout::Horizontal);
        assert_eq!(appearance.icon_type, IconType::Icon);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("entity-picture".parse::<IconType>().unwrap(), IconType::EntityPicture);
        assert_eq!(Info::LastChanged.to_string(), "last-changed");
    }
}
