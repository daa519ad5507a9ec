//! Update entity snapshots as delivered by the host.
//!
//! The host hands over Home Assistant style state objects (`state` string plus
//! an `attributes` map). Everything the tile needs is derived from those once,
//! when the snapshot is built, so presenting is a plain lookup afterwards.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

/// Entity domains the update tile knows how to present.
pub const UPDATE_ENTITY_DOMAINS: &[&str] = &["update"];

/// Domain part of an entity id (`update.router` -> `update`).
pub fn entity_domain(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map_or(entity_id, |(domain, _)| domain)
}

bitflags! {
    /// Capabilities advertised by an update entity through `supported_features`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SupportedFeatures: u64 {
        const INSTALL          = 1 << 0;
        const SPECIFIC_VERSION = 1 << 1;
        const PROGRESS         = 1 << 2;
        const BACKUP           = 1 << 3;
        const RELEASE_NOTES    = 1 << 4;
    }
}

/// State category of an update entity.
///
/// Parsing is total: anything that is not a recognized state string becomes
/// [`StateCategory::Unknown`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StateCategory {
    /// A newer version is available.
    #[strum(to_string = "on", serialize = "update_available", serialize = "update-available")]
    #[serde(rename = "on")]
    UpdateAvailable,

    /// The installed version is the latest one.
    #[strum(to_string = "off", serialize = "up_to_date", serialize = "up-to-date")]
    #[serde(rename = "off")]
    UpToDate,

    /// An installation is running.
    #[strum(to_string = "installing")]
    Installing,

    #[strum(to_string = "unavailable")]
    Unavailable,

    #[strum(to_string = "unknown")]
    Unknown,
}

impl StateCategory {
    /// Parse a raw state string, falling back to `Unknown`.
    pub fn from_raw(state: &str) -> Self {
        state.parse().unwrap_or(Self::Unknown)
    }

    /// Active means there is something to act on: an update waiting or one
    /// being installed.
    pub fn is_active(self) -> bool {
        matches!(self, Self::UpdateAvailable | Self::Installing)
    }
}

/// Wire form of a host state object.
#[derive(Debug, Clone, Deserialize)]
struct HaStateObject {
    #[serde(default)]
    entity_id: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
}

/// Immutable view of one update entity for a single render.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "HaStateObject")]
pub struct EntitySnapshot {
    pub entity_id: String,
    pub state: StateCategory,
    pub attributes: Map<String, Value>,
    pub supported_features: SupportedFeatures,
}

impl From<HaStateObject> for EntitySnapshot {
    fn from(raw: HaStateObject) -> Self {
        Self::from_ha_state(
            raw.entity_id,
            raw.state.as_deref().unwrap_or("unknown"),
            raw.attributes,
        )
    }
}

impl EntitySnapshot {
    /// Build a snapshot with no attributes and no supported features.
    pub fn new(entity_id: impl Into<String>, state: StateCategory) -> Self {
        Self {
            entity_id: entity_id.into(),
            state,
            attributes: Map::new(),
            supported_features: SupportedFeatures::empty(),
        }
    }

    /// Build a snapshot from a raw host state string and attribute map.
    ///
    /// The host reports a running installation as state `on` with a truthy
    /// `in_progress` attribute; that combination is folded into
    /// [`StateCategory::Installing`]. `supported_features` is read from the
    /// attribute of the same name.
    pub fn from_ha_state(
        entity_id: impl Into<String>,
        state: &str,
        attributes: Map<String, Value>,
    ) -> Self {
        let mut category = StateCategory::from_raw(state);
        if category == StateCategory::UpdateAvailable
            && attributes.get("in_progress").is_some_and(is_truthy)
        {
            category = StateCategory::Installing;
        }

        let supported_features = attributes
            .get("supported_features")
            .and_then(|v| v.as_u64())
            .map(SupportedFeatures::from_bits_truncate)
            .unwrap_or_default();

        Self {
            entity_id: entity_id.into(),
            state: category,
            attributes,
            supported_features,
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_features(mut self, features: SupportedFeatures) -> Self {
        self.supported_features = features;
        self
    }

    pub fn domain(&self) -> &str {
        entity_domain(&self.entity_id)
    }

    /// String attribute, if present and a string.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.attribute_str("friendly_name")
    }

    pub fn entity_picture(&self) -> Option<&str> {
        self.attribute_str("entity_picture")
    }

    pub fn latest_version(&self) -> Option<&str> {
        self.attribute_str("latest_version")
    }

    pub fn skipped_version(&self) -> Option<&str> {
        self.attribute_str("skipped_version")
    }

    pub fn is_available(&self) -> bool {
        self.state != StateCategory::Unavailable
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_installing(&self) -> bool {
        self.state == StateCategory::Installing
    }

    pub fn supports(&self, feature: SupportedFeatures) -> bool {
        self.supported_features.contains(feature)
    }

    /// Installation progress in percent, when the entity reports one.
    ///
    /// Older integrations put the percentage directly in `in_progress`, newer
    /// ones use `update_percentage`.
    pub fn progress(&self) -> Option<u8> {
        ["update_percentage", "in_progress"]
            .iter()
            .filter_map(|key| self.attributes.get(*key))
            .find_map(|v| match v {
                Value::Number(n) => n.as_f64(),
                _ => None,
            })
            .map(|p| p.clamp(0.0, 100.0).round() as u8)
    }
}

/// JavaScript-style truthiness for attribute values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accepted layouts for a batch of host states: either an object keyed by
/// entity id or the flat list the host's state API returns.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatesRepr {
    Map(OrderedStates),
    List(Vec<EntitySnapshot>),
}

/// Object form of a states batch, kept in the order the host wrote it.
struct OrderedStates(Vec<(String, EntitySnapshot)>);

impl<'de> Deserialize<'de> for OrderedStates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedStatesVisitor;

        impl<'de> Visitor<'de> for OrderedStatesVisitor {
            type Value = OrderedStates;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of entity id to state object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(OrderedStates(entries))
            }
        }

        deserializer.deserialize_map(OrderedStatesVisitor)
    }
}

/// Host-provided snapshots keyed by entity id, refreshed every render tick.
///
/// Lookups go through the map; iteration follows the order the host
/// delivered the entities in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "StatesRepr")]
pub struct EntityStates {
    states: BTreeMap<String, EntitySnapshot>,
    order: Vec<String>,
}

impl From<StatesRepr> for EntityStates {
    fn from(repr: StatesRepr) -> Self {
        match repr {
            StatesRepr::Map(OrderedStates(entries)) => entries
                .into_iter()
                .map(|(id, mut snapshot)| {
                    if snapshot.entity_id.is_empty() {
                        snapshot.entity_id = id;
                    }
                    snapshot
                })
                .collect(),
            StatesRepr::List(list) => list.into_iter().collect(),
        }
    }
}

impl FromIterator<EntitySnapshot> for EntityStates {
    fn from_iter<T: IntoIterator<Item = EntitySnapshot>>(iter: T) -> Self {
        let mut states = Self::default();
        for snapshot in iter {
            states.insert(snapshot);
        }
        states
    }
}

impl EntityStates {
    /// Add or replace a snapshot. A replaced entity keeps its position.
    pub fn insert(&mut self, snapshot: EntitySnapshot) {
        let entity_id = snapshot.entity_id.clone();
        if self.states.insert(entity_id.clone(), snapshot).is_none() {
            self.order.push(entity_id);
        }
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntitySnapshot> {
        self.states.get(entity_id)
    }

    /// All known entity ids, in delivery order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
