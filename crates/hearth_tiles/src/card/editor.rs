//! Description of the tile's configuration form.
//!
//! Hosts only need this when a user opens the editor, so the schema is built
//! on first request and shared for the rest of the process.

use std::sync::LazyLock;

use serde::Serialize;

use crate::entity::UPDATE_ENTITY_DOMAINS;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "selector", rename_all = "snake_case")]
pub enum Selector {
    Entity { domains: &'static [&'static str] },
    Text,
    Icon,
    Boolean,
    Select { options: &'static [&'static str] },
    Action,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub selector: Selector,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorSchema {
    pub fields: Vec<EditorField>,
}

impl EditorSchema {
    pub fn field(&self, name: &str) -> Option<&EditorField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

static EDITOR_SCHEMA: LazyLock<EditorSchema> = LazyLock::new(|| {
    tracing::debug!("building update tile editor schema");
    build_schema()
});

/// The editor schema, built on first use.
pub fn config_editor() -> &'static EditorSchema {
    &EDITOR_SCHEMA
}

fn build_schema() -> EditorSchema {
    let field = |name, label, selector| EditorField {
        name,
        label,
        selector,
    };

    EditorSchema {
        fields: vec![
            field(
                "entity",
                "Entity",
                Selector::Entity {
                    domains: UPDATE_ENTITY_DOMAINS,
                },
            ),
            field("name", "Name", Selector::Text),
            field("icon", "Icon", Selector::Icon),
            field(
                "layout",
                "Layout",
                Selector::Select {
                    options: &["default", "horizontal", "vertical"],
                },
            ),
            field("fill_container", "Fill container", Selector::Boolean),
            field(
                "primary_info",
                "Primary information",
                Selector::Select {
                    options: &["name", "state", "last-changed", "last-updated", "none"],
                },
            ),
            field(
                "secondary_info",
                "Secondary information",
                Selector::Select {
                    options: &["name", "state", "last-changed", "last-updated", "none"],
                },
            ),
            field(
                "icon_type",
                "Icon type",
                Selector::Select {
                    options: &["icon", "entity-picture", "none"],
                },
            ),
            field("show_buttons_control", "Control buttons?", Selector::Boolean),
            field(
                "collapsible_controls",
                "Collapse controls when off",
                Selector::Boolean,
            ),
            field("tap_action", "Tap action", Selector::Action),
            field("hold_action", "Hold action", Selector::Action),
            field("double_tap_action", "Double tap action", Selector::Action),
        ],
    }
}
