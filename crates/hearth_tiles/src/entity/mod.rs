mod icons;
mod update;

pub use icons::EntityIcons;
pub use icons::StateIcons;
pub use update::entity_domain;
pub use update::EntitySnapshot;
pub use update::EntityStates;
pub use update::StateCategory;
pub use update::SupportedFeatures;
pub use update::UPDATE_ENTITY_DOMAINS;
