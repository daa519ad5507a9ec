pub mod api;
pub mod card;
pub mod config;
pub mod entity;

#[cfg(doc)]
pub mod examples;

pub use card::present;
pub use card::resolve;
pub use card::CardConfig;
pub use card::PresentationDescriptor;
pub use card::ResolvedCardConfig;
pub use config::format_diagnostics;
pub use config::Config;
pub use config::Diagnostic;
pub use config::LogLevel;
pub use entity::EntitySnapshot;
pub use entity::EntityStates;
pub use entity::StateCategory;
