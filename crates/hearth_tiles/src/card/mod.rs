//! The update tile: configuration resolution and presentation.

mod action;
mod appearance;
mod config;
mod controls;
mod editor;
mod presenter;
mod registration;

pub use action::action_for;
pub use action::handle_action;
pub use action::has_action;
pub use action::ActionBindings;
pub use action::ActionConfig;
pub use action::ActionDispatcher;
pub use action::ActionKind;
pub use action::DispatchError;
pub use action::DispatchRequest;
pub use action::Gesture;
pub use action::ServiceCall;
pub use appearance::compute_appearance;
pub use appearance::Appearance;
pub use appearance::IconType;
pub use appearance::Info;
pub use appearance::Layout;
pub use config::resolve;
pub use config::CardConfig;
pub use config::ResolvedCardConfig;
pub use controls::buttons_disabled;
pub use controls::press;
pub use controls::update_buttons;
pub use controls::ControlButton;
pub use controls::UpdateButton;
pub use editor::config_editor;
pub use editor::EditorField;
pub use editor::EditorSchema;
pub use editor::Selector;
pub use presenter::controls_visible;
pub use presenter::present;
pub use presenter::state_color;
pub use presenter::state_display;
pub use presenter::PresentationDescriptor;
pub use presenter::Presenter;
pub use presenter::Rgb;
pub use presenter::INSTALLING_COLOR;
pub use presenter::MUTED_COLOR;
pub use presenter::UPDATE_AVAILABLE_COLOR;
pub use presenter::UP_TO_DATE_COLOR;
pub use registration::stub_config;
pub use registration::CardInfo;
pub use registration::CARD_INFO;
pub use registration::CARD_SIZE;
pub use registration::CARD_TYPE;
