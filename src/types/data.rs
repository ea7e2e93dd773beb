//! Static game data: maps, events, pages and common events

use crate::types::command::{Command, ensure_terminated};
use crate::types::ids::{CommonEventId, EventId, MapId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata string table of an event definition (tag name -> value)
pub type MetaTable = BTreeMap<String, String>;

/// How an event page is started
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Started explicitly by the player
    #[default]
    Action,
    /// Started on the map interpreter whenever it is idle
    Autorun,
    /// Runs continuously on its own interpreter
    Parallel,
}

/// Variable threshold condition of a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableCondition {
    pub name: String,
    pub at_least: i64,
}

/// Conditions under which a page becomes active
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PageConditions {
    /// Variable that must be non-zero
    #[serde(default)]
    pub switch: Option<String>,
    #[serde(default)]
    pub variable: Option<VariableCondition>,
}

/// One conditional variant of an event's script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EventPage {
    #[serde(default)]
    pub conditions: PageConditions,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub list: Vec<Command>,
}

impl EventPage {
    pub fn new(trigger: Trigger, list: Vec<Command>) -> Self {
        Self {
            conditions: PageConditions::default(),
            trigger,
            list,
        }
    }

    pub fn with_conditions(mut self, conditions: PageConditions) -> Self {
        self.conditions = conditions;
        self
    }
}

/// Static definition of a map event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventData {
    pub id: EventId,
    #[serde(default)]
    pub name: String,
    /// Parsed metadata markers
    #[serde(default)]
    pub meta: MetaTable,
    #[serde(default)]
    pub pages: Vec<EventPage>,
}

impl EventData {
    pub fn new(id: impl Into<EventId>, pages: Vec<EventPage>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            meta: MetaTable::new(),
            pages,
        }
    }

    pub fn with_meta(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(tag.into(), value.into());
        self
    }
}

/// A shared routine not tied to any map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommonEvent {
    pub id: CommonEventId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub list: Vec<Command>,
}

impl CommonEvent {
    pub fn new(id: impl Into<CommonEventId>, list: Vec<Command>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            list,
        }
    }
}

/// Static definition of a map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapData {
    pub id: MapId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub events: Vec<EventData>,
}

impl MapData {
    pub fn new(id: impl Into<MapId>, events: Vec<EventData>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            events,
        }
    }
}

/// All static data the runtime reads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Database {
    #[serde(default)]
    pub common_events: Vec<CommonEvent>,
    #[serde(default)]
    pub maps: Vec<MapData>,
}

impl Database {
    /// Build a database, terminating every instruction list
    pub fn new(common_events: Vec<CommonEvent>, maps: Vec<MapData>) -> Self {
        Self { common_events, maps }.normalized()
    }

    /// Guarantee that every list ends with a top-level terminator
    pub fn normalized(mut self) -> Self {
        for common_event in &mut self.common_events {
            ensure_terminated(&mut common_event.list);
        }
        for page in self
            .maps
            .iter_mut()
            .flat_map(|map| map.events.iter_mut())
            .flat_map(|event| event.pages.iter_mut())
        {
            ensure_terminated(&mut page.list);
        }
        self
    }

    pub fn common_event(&self, id: CommonEventId) -> Option<&CommonEvent> {
        self.common_events.iter().find(|common_event| common_event.id == id)
    }

    pub fn map(&self, id: MapId) -> Option<&MapData> {
        self.maps.iter().find(|map| map.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_new_terminates_lists() {
        let database = Database::new(
            vec![CommonEvent::new(1, vec![Command::text(0, "shared")])],
            vec![MapData::new(
                1,
                vec![EventData::new(
                    1,
                    vec![EventPage::new(Trigger::Action, Vec::new())],
                )],
            )],
        );

        let common = database.common_event(CommonEventId::new(1)).unwrap();
        assert_eq!(common.list.len(), 2);
        let page = &database.map(MapId::new(1)).unwrap().events[0].pages[0];
        assert_eq!(page.list, vec![Command::end(0)]);
    }

    #[test]
    fn lookups_return_none_for_unknown_ids() {
        let database = Database::default();
        assert!(database.common_event(CommonEventId::new(5)).is_none());
        assert!(database.map(MapId::new(1)).is_none());
    }

    #[test]
    fn event_data_parses_from_json() {
        let json = r#"{
            "id": 3,
            "name": "Chest",
            "meta": {"EvTp": "aaa"},
            "pages": [
                {"trigger": "parallel", "list": [{"code": "wait", "frames": 2}]},
                {"conditions": {"switch": "opened"}, "list": []}
            ]
        }"#;
        let event: EventData = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, EventId::new(3));
        assert_eq!(event.meta.get("EvTp").map(String::as_str), Some("aaa"));
        assert_eq!(event.pages[0].trigger, Trigger::Parallel);
        assert_eq!(event.pages[1].trigger, Trigger::Action);
        assert_eq!(event.pages[1].conditions.switch.as_deref(), Some("opened"));
    }
}
