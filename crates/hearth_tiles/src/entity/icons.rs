use super::EntitySnapshot;
use super::StateCategory;
use crate::card::IconType;

/// Icon used for entities of a domain the lookup does not know.
const DEFAULT_DOMAIN_ICON: &str = "mdi:bookmark";

/// Icon and picture lookup for an entity.
///
/// The presenter only asks for these; hosts with their own icon tables plug
/// in a different implementation.
pub trait EntityIcons: Send + Sync {
    /// Fallback icon for the entity's current state.
    fn default_icon(&self, entity: &EntitySnapshot) -> String;

    /// Picture URL to show instead of an icon, if any.
    fn entity_picture(&self, entity: &EntitySnapshot, icon_type: IconType) -> Option<String>;
}

/// Stock state-to-icon table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateIcons;

impl EntityIcons for StateIcons {
    fn default_icon(&self, entity: &EntitySnapshot) -> String {
        let icon = match (entity.domain(), entity.state) {
            ("update", StateCategory::Installing) => "mdi:package-down",
            ("update", StateCategory::UpdateAvailable) => "mdi:package-up",
            ("update", _) => "mdi:package",
            _ => DEFAULT_DOMAIN_ICON,
        };
        icon.to_string()
    }

    fn entity_picture(&self, entity: &EntitySnapshot, icon_type: IconType) -> Option<String> {
        if icon_type != IconType::EntityPicture {
            return None;
        }
        entity.entity_picture().map(str::to_string)
    }
}
