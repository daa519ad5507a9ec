//! Derives what the tile should look like from a snapshot and a config.
//!
//! Everything here is a pure function of its inputs. The host calls
//! [`present`] again whenever the entity state or the configuration changes
//! and throws the previous descriptor away.

use std::fmt;

use serde::Serialize;

use super::compute_appearance;
use super::update_buttons;
use super::ActionBindings;
use super::Appearance;
use super::ControlButton;
use super::Layout;
use super::ResolvedCardConfig;
use crate::entity::EntityIcons;
use crate::entity::EntitySnapshot;
use crate::entity::EntityStates;
use crate::entity::StateCategory;
use crate::entity::StateIcons;
use crate::entity::SupportedFeatures;

/// An RGB color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.0, self.1, self.2)
    }
}

/// Installation running.
pub const INSTALLING_COLOR: Rgb = Rgb(33, 150, 243);
/// An update is waiting to be installed.
pub const UPDATE_AVAILABLE_COLOR: Rgb = Rgb(255, 152, 0);
/// Nothing to do.
pub const UP_TO_DATE_COLOR: Rgb = Rgb(76, 175, 80);
/// Unavailable or unknown.
pub const MUTED_COLOR: Rgb = Rgb(158, 158, 158);

/// Color for a state. A running installation wins over everything else.
pub fn state_color(state: StateCategory, is_installing: bool) -> Rgb {
    if is_installing {
        return INSTALLING_COLOR;
    }
    match state {
        StateCategory::Installing => INSTALLING_COLOR,
        StateCategory::UpdateAvailable => UPDATE_AVAILABLE_COLOR,
        StateCategory::UpToDate => UP_TO_DATE_COLOR,
        StateCategory::Unavailable | StateCategory::Unknown => MUTED_COLOR,
    }
}

/// Whether the install/skip row is shown.
///
/// Needs `show_buttons_control` and an entity that can install. With
/// `collapsible_controls` the row is additionally hidden while the entity is
/// inactive; collapsing never shows a row that would otherwise be hidden.
pub fn controls_visible(config: &ResolvedCardConfig, entity: &EntitySnapshot) -> bool {
    (!config.collapsible_controls() || entity.is_active())
        && config.show_buttons_control()
        && entity.supports(SupportedFeatures::INSTALL)
}

/// Text for the secondary line describing the update state.
pub fn state_display(entity: &EntitySnapshot) -> String {
    match entity.state {
        StateCategory::Installing => match entity.progress() {
            Some(percent) if entity.supports(SupportedFeatures::PROGRESS) => {
                format!("Installing ({percent}%)")
            }
            _ => "Installing".to_string(),
        },
        StateCategory::UpdateAvailable => entity
            .latest_version()
            .map(str::to_string)
            .unwrap_or_else(|| "Update available".to_string()),
        StateCategory::UpToDate => {
            let skipped = entity.skipped_version();
            if skipped.is_some() && skipped == entity.latest_version() {
                "Skipped".to_string()
            } else {
                "Up-to-date".to_string()
            }
        }
        StateCategory::Unavailable => "Unavailable".to_string(),
        StateCategory::Unknown => "Unknown".to_string(),
    }
}

/// Everything a renderer needs for one frame of the tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationDescriptor {
    pub entity_id: String,
    pub state: StateCategory,
    pub display_name: String,
    pub state_display: String,
    pub icon: String,
    /// Shown instead of the icon when set.
    pub picture: Option<String>,
    pub color: Rgb,
    /// Drives the pulse animation on the icon.
    pub is_installing: bool,
    pub is_available: bool,
    pub show_controls: bool,
    /// Empty unless `show_controls` is set.
    pub controls: Vec<ControlButton>,
    /// Buttons stretch to fill the row except in the horizontal layout.
    pub controls_fill: bool,
    pub action_bindings: ActionBindings,
    pub appearance: Appearance,
}

/// Presenter parameterised over the icon lookup.
#[derive(Debug, Clone, Default)]
pub struct Presenter<I = StateIcons> {
    icons: I,
}

impl Presenter<StateIcons> {
    pub fn new() -> Self {
        Self { icons: StateIcons }
    }
}

impl<I: EntityIcons> Presenter<I> {
    pub fn with_icons(icons: I) -> Self {
        Self { icons }
    }

    /// Look up the configured entity and present it.
    ///
    /// `None` means there is nothing to show yet: the host has no states,
    /// the tile has no entity, or the entity has no snapshot.
    pub fn present(
        &self,
        states: Option<&EntityStates>,
        config: &ResolvedCardConfig,
    ) -> Option<PresentationDescriptor> {
        let Some(states) = states else {
            tracing::trace!("host states not ready");
            return None;
        };
        let Some(entity_id) = config.entity.as_deref() else {
            tracing::trace!("tile has no entity configured");
            return None;
        };
        let Some(entity) = states.get(entity_id) else {
            tracing::trace!(entity_id, "no state for entity");
            return None;
        };
        Some(self.present_entity(entity, config))
    }

    /// Present a snapshot that is already in hand.
    pub fn present_entity(
        &self,
        entity: &EntitySnapshot,
        config: &ResolvedCardConfig,
    ) -> PresentationDescriptor {
        let appearance = compute_appearance(config);

        let display_name = non_empty(config.name.as_deref())
            .or_else(|| non_empty(entity.friendly_name()))
            .unwrap_or_default()
            .to_string();

        let icon = match non_empty(config.icon.as_deref()) {
            Some(icon) => icon.to_string(),
            None => self.icons.default_icon(entity),
        };

        let is_installing = entity.is_installing();
        let show_controls = controls_visible(config, entity);

        PresentationDescriptor {
            entity_id: entity.entity_id.clone(),
            state: entity.state,
            display_name,
            state_display: state_display(entity),
            icon,
            picture: self.icons.entity_picture(entity, appearance.icon_type),
            color: state_color(entity.state, is_installing),
            is_installing,
            is_available: entity.is_available(),
            show_controls,
            controls: if show_controls {
                update_buttons(entity)
            } else {
                Vec::new()
            },
            controls_fill: appearance.layout != Layout::Horizontal,
            action_bindings: ActionBindings::from_config(config),
            appearance,
        }
    }
}

/// [`Presenter::present`] with the stock icon table.
pub fn present(
    states: Option<&EntityStates>,
    config: &ResolvedCardConfig,
) -> Option<PresentationDescriptor> {
    Presenter::new().present(states, config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
