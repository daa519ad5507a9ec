//! Install/skip button row.

use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;
use strum::IntoEnumIterator;

use super::ActionDispatcher;
use super::DispatchError;
use super::DispatchRequest;
use super::ServiceCall;
use crate::entity::EntitySnapshot;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpdateButton {
    Skip,
    Install,
}

impl UpdateButton {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Skip => "mdi:cancel",
            Self::Install => "mdi:cellphone-arrow-down",
        }
    }

    /// Service on the entity's domain this button calls.
    pub fn service(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Install => "install",
        }
    }

    pub fn service_call(self, entity: &EntitySnapshot) -> ServiceCall {
        ServiceCall::new(entity.domain(), self.service(), &entity.entity_id)
    }
}

/// One rendered button of the control row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlButton {
    pub button: UpdateButton,
    pub icon: &'static str,
    pub disabled: bool,
    pub service_call: ServiceCall,
}

/// Buttons are only usable while there is an update waiting and nothing is
/// being installed yet.
pub fn buttons_disabled(entity: &EntitySnapshot) -> bool {
    !entity.is_active() || entity.is_installing()
}

/// The control row for an entity, in display order.
pub fn update_buttons(entity: &EntitySnapshot) -> Vec<ControlButton> {
    let disabled = buttons_disabled(entity);
    UpdateButton::iter()
        .map(|button| ControlButton {
            button,
            icon: button.icon(),
            disabled,
            service_call: button.service_call(entity),
        })
        .collect()
}

/// Forward a button press to the dispatcher.
///
/// Returns `Ok(false)` without dispatching when the button is disabled.
pub fn press(
    button: UpdateButton,
    entity: &EntitySnapshot,
    dispatcher: &dyn ActionDispatcher,
) -> Result<bool, DispatchError> {
    if buttons_disabled(entity) {
        tracing::debug!(
            entity_id = %entity.entity_id,
            %button,
            "ignoring press on disabled button"
        );
        return Ok(false);
    }

    let call = button.service_call(entity);
    tracing::debug!(
        entity_id = %entity.entity_id,
        "calling {}.{}",
        call.domain,
        call.service
    );
    dispatcher.dispatch(DispatchRequest::Service(call))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::action::tests::RecordingDispatcher;
    use crate::entity::StateCategory;

    #[test]
    fn test_buttons_enabled_when_update_available() {
        let entity = EntitySnapshot::new("update.router", StateCategory::UpdateAvailable);
        let buttons = update_buttons(&entity);

        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].button, UpdateButton::Skip);
        assert_eq!(buttons[1].button, UpdateButton::Install);
        assert!(buttons.iter().all(|b| !b.disabled));
        assert_eq!(
            buttons[1].service_call,
            ServiceCall::new("update", "install", "update.router")
        );
    }

    #[test]
    fn test_buttons_disabled_otherwise() {
        for state in [
            StateCategory::Installing,
            StateCategory::UpToDate,
            StateCategory::Unavailable,
            StateCategory::Unknown,
        ] {
            let entity = EntitySnapshot::new("update.router", state);
            assert!(
                update_buttons(&entity).iter().all(|b| b.disabled),
                "state {state}"
            );
        }
    }

    #[test]
    fn test_press_dispatches_service_call() {
        let entity = EntitySnapshot::new("update.router", StateCategory::UpdateAvailable);
        let dispatcher = RecordingDispatcher::default();

        assert!(press(UpdateButton::Skip, &entity, &dispatcher).unwrap());
        assert_eq!(
            *dispatcher.services.lock().unwrap(),
            vec![ServiceCall::new("update", "skip", "update.router")]
        );
    }

    #[test]
    fn test_press_on_disabled_button_does_nothing() {
        let entity = EntitySnapshot::new("update.router", StateCategory::Installing);
        let dispatcher = RecordingDispatcher::default();

        assert!(!press(UpdateButton::Install, &entity, &dispatcher).unwrap());
        assert!(dispatcher.services.lock().unwrap().is_empty());
    }
}
