//! Tap/hold/double-tap action descriptors and the dispatch seam.
//!
//! The tile never performs an action itself. It decides which descriptor a
//! gesture maps to and hands it to an [`ActionDispatcher`] owned by the host.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

use super::ResolvedCardConfig;

/// The `action` key of an action descriptor.
///
/// Kinds the tile has no special handling for are carried as `Other` so a
/// config written for a newer host still loads and round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Open the host's detail dialog for the entity.
    MoreInfo,
    Toggle,
    PerformAction,
    CallService,
    Navigate,
    Url,
    Assist,
    /// Explicitly do nothing. Distinct from an unset action, which gets a
    /// default when the config is resolved.
    None,
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MoreInfo => "more-info",
            Self::Toggle => "toggle",
            Self::PerformAction => "perform-action",
            Self::CallService => "call-service",
            Self::Navigate => "navigate",
            Self::Url => "url",
            Self::Assist => "assist",
            Self::None => "none",
            Self::Other(kind) => kind,
        }
    }

    /// Kinds that act on the tile's own entity.
    pub fn needs_entity(&self) -> bool {
        matches!(self, Self::MoreInfo | Self::Toggle)
    }
}

impl From<String> for ActionKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "more-info" => Self::MoreInfo,
            "toggle" => Self::Toggle,
            "perform-action" => Self::PerformAction,
            "call-service" => Self::CallService,
            "navigate" => Self::Navigate,
            "url" => Self::Url,
            "assist" => Self::Assist,
            "none" => Self::None,
            _ => Self::Other(kind),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens when the user interacts with the tile: a kind plus whatever
/// parameters came with it (`navigation_path`, `confirmation`, `haptic`, ...).
///
/// Parameters are kept as written; the tile never drops or rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub action: ActionKind,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ActionConfig {
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            params: Map::new(),
        }
    }

    pub fn more_info() -> Self {
        Self::new(ActionKind::MoreInfo)
    }

    pub fn noop() -> Self {
        Self::new(ActionKind::None)
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn is_noop(&self) -> bool {
        self.action == ActionKind::None
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// A user gesture on the tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Gesture {
    Tap,
    Hold,
    DoubleTap,
}

/// True when the action is set and is not the explicit no-op.
pub fn has_action(action: Option<&ActionConfig>) -> bool {
    action.is_some_and(|action| !action.is_noop())
}

/// Which optional gestures the host should listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActionBindings {
    pub has_hold: bool,
    pub has_double_click: bool,
}

impl ActionBindings {
    pub fn from_config(config: &ResolvedCardConfig) -> Self {
        Self {
            has_hold: has_action(config.hold_action.as_ref()),
            has_double_click: has_action(config.double_tap_action.as_ref()),
        }
    }
}

/// A service call on the entity's own domain, e.g. `update.install`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub entity_id: String,
}

impl ServiceCall {
    pub fn new(domain: &str, service: &str, entity_id: &str) -> Self {
        Self {
            domain: domain.to_string(),
            service: service.to_string(),
            entity_id: entity_id.to_string(),
        }
    }
}

/// Something the host is asked to perform on behalf of the tile.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchRequest<'a> {
    Action {
        entity_id: Option<&'a str>,
        gesture: Gesture,
        action: &'a ActionConfig,
    },
    Service(ServiceCall),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{gesture} action '{action}' needs an entity but the tile has none")]
    MissingEntity { gesture: Gesture, action: String },

    #[error("dispatcher rejected request: {0}")]
    Rejected(String),
}

/// Host-side sink that actually performs actions.
pub trait ActionDispatcher {
    fn dispatch(&self, request: DispatchRequest<'_>) -> Result<(), DispatchError>;
}

/// The action bound to a gesture, if it does anything.
pub fn action_for(config: &ResolvedCardConfig, gesture: Gesture) -> Option<&ActionConfig> {
    let action = match gesture {
        Gesture::Tap => config.tap_action.as_ref(),
        Gesture::Hold => config.hold_action.as_ref(),
        Gesture::DoubleTap => config.double_tap_action.as_ref(),
    };
    action.filter(|action| !action.is_noop())
}

/// Forward the action bound to `gesture` to the dispatcher.
///
/// Returns `Ok(false)` when the gesture has nothing bound.
pub fn handle_action(
    config: &ResolvedCardConfig,
    gesture: Gesture,
    dispatcher: &dyn ActionDispatcher,
) -> Result<bool, DispatchError> {
    let Some(action) = action_for(config, gesture) else {
        tracing::trace!(%gesture, "no action bound");
        return Ok(false);
    };

    let entity_id = config.entity.as_deref();
    if entity_id.is_none() && action.action.needs_entity() {
        return Err(DispatchError::MissingEntity {
            gesture,
            action: action.action.to_string(),
        });
    }

    tracing::debug!(%gesture, action = %action.action, ?entity_id, "dispatching action");
    dispatcher.dispatch(DispatchRequest::Action {
        entity_id,
        gesture,
        action,
    })?;
    Ok(true)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::card::resolve;
    use crate::card::CardConfig;

    /// Dispatcher that remembers what it was asked to do.
    #[derive(Default)]
    pub(crate) struct RecordingDispatcher {
        pub(crate) actions: Mutex<Vec<(Gesture, ActionConfig)>>,
        pub(crate) services: Mutex<Vec<ServiceCall>>,
    }

    impl ActionDispatcher for RecordingDispatcher {
        fn dispatch(&self, request: DispatchRequest<'_>) -> Result<(), DispatchError> {
            match request {
                DispatchRequest::Action {
                    gesture, action, ..
                } => self.actions.lock().unwrap().push((gesture, action.clone())),
                DispatchRequest::Service(call) => self.services.lock().unwrap().push(call),
            }
            Ok(())
        }
    }

    #[test]
    fn test_parse_action_kinds() {
        let action: ActionConfig = serde_json::from_value(json!({"action": "more-info"})).unwrap();
        assert_eq!(action, ActionConfig::more_info());

        let action: ActionConfig = serde_json::from_value(json!({"action": "none"})).unwrap();
        assert!(action.is_noop());

        let action: ActionConfig = serde_json::from_value(json!({
            "action": "perform-action",
            "perform_action": "update.install",
            "data": {"backup": true}
        }))
        .unwrap();
        assert_eq!(action.action, ActionKind::PerformAction);
        assert_eq!(action.param_str("perform_action"), Some("update.install"));
        assert_eq!(action.params["data"], json!({"backup": true}));

        let action: ActionConfig = serde_json::from_value(json!({
            "action": "navigate",
            "navigation_path": "/config/updates"
        }))
        .unwrap();
        assert_eq!(
            action,
            ActionConfig::new(ActionKind::Navigate).with_param("navigation_path", "/config/updates")
        );
    }

    #[test]
    fn test_unrecognized_kind_is_kept() {
        let raw = json!({
            "action": "fire-dom-event",
            "browser_mod": {"service": "browser_mod.popup"}
        });
        let action: ActionConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(action.action, ActionKind::Other("fire-dom-event".to_string()));
        assert!(has_action(Some(&action)));
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);
    }

    #[test]
    fn test_extra_parameters_round_trip() {
        let raw = json!({
            "action": "toggle",
            "confirmation": {"text": "Sure?"},
            "haptic": "success"
        });
        let action: ActionConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(action.action, ActionKind::Toggle);
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);
    }

    #[test]
    fn test_missing_kind_fails_to_parse() {
        let result: Result<ActionConfig, _> =
            serde_json::from_value(json!({"navigation_path": "/config"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_has_action() {
        assert!(!has_action(None));
        assert!(!has_action(Some(&ActionConfig::noop())));
        assert!(has_action(Some(&ActionConfig::more_info())));
        assert!(has_action(Some(&ActionConfig::new(ActionKind::Toggle))));
    }

    #[test]
    fn test_gesture_names() {
        assert_eq!(Gesture::DoubleTap.to_string(), "double_tap");
        assert_eq!("hold".parse::<Gesture>().unwrap(), Gesture::Hold);
    }

    #[test]
    fn test_handle_action_dispatches_bound_action() {
        let config = resolve(CardConfig {
            entity: Some("update.router".to_string()),
            ..Default::default()
        });
        let dispatcher = RecordingDispatcher::default();

        assert!(handle_action(&config, Gesture::Tap, &dispatcher).unwrap());
        assert!(handle_action(&config, Gesture::Hold, &dispatcher).unwrap());
        assert!(!handle_action(&config, Gesture::DoubleTap, &dispatcher).unwrap());

        let actions = dispatcher.actions.lock().unwrap();
        assert_eq!(
            *actions,
            vec![
                (Gesture::Tap, ActionConfig::more_info()),
                (Gesture::Hold, ActionConfig::more_info())
            ]
        );
    }

    #[test]
    fn test_handle_action_skips_noop() {
        let config = resolve(CardConfig {
            entity: Some("update.router".to_string()),
            tap_action: Some(ActionConfig::noop()),
            ..Default::default()
        });
        let dispatcher = RecordingDispatcher::default();

        assert!(!handle_action(&config, Gesture::Tap, &dispatcher).unwrap());
        assert!(dispatcher.actions.lock().unwrap().is_empty());
    }

    #[test]
    fn test_more_info_without_entity_is_an_error() {
        let config = resolve(CardConfig::default());
        let dispatcher = RecordingDispatcher::default();

        let err = handle_action(&config, Gesture::Tap, &dispatcher).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::MissingEntity {
                gesture: Gesture::Tap,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "tap action 'more-info' needs an entity but the tile has none"
        );
    }

    #[test]
    fn test_navigate_without_entity_is_fine() {
        let config = resolve(CardConfig {
            tap_action: Some(
                ActionConfig::new(ActionKind::Navigate)
                    .with_param("navigation_path", "/config/updates"),
            ),
            ..Default::default()
        });
        let dispatcher = RecordingDispatcher::default();

        assert!(handle_action(&config, Gesture::Tap, &dispatcher).unwrap());
    }

    #[test]
    fn test_unrecognized_kind_is_dispatched() {
        let hold: ActionConfig =
            serde_json::from_value(json!({"action": "fire-dom-event", "haptic": "light"})).unwrap();
        let config = resolve(CardConfig {
            hold_action: Some(hold.clone()),
            ..Default::default()
        });
        let dispatcher = RecordingDispatcher::default();

        assert!(handle_action(&config, Gesture::Hold, &dispatcher).unwrap());
        assert_eq!(*dispatcher.actions.lock().unwrap(), vec![(Gesture::Hold, hold)]);
    }
}
