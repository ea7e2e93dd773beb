//! The active map and its events

use crate::engine::InterceptHost;
use crate::runtime::{SessionError, Variables, event::MapEvent};
use crate::types::{
    command::Command,
    data::Database,
    ids::{CommonEventId, EventId, MapId},
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The currently loaded map
#[derive(Debug, Clone)]
pub struct GameMap {
    map_id: MapId,
    database: Arc<Database>,
    events: BTreeMap<EventId, MapEvent>,
}

impl GameMap {
    /// Materialise every event of `map_id`, classifying each by `tag_name`
    pub fn setup(
        database: Arc<Database>,
        map_id: MapId,
        tag_name: &str,
    ) -> Result<Self, SessionError> {
        let map = database
            .map(map_id)
            .ok_or(SessionError::MapNotFound { map_id })?;
        let events = map
            .events
            .iter()
            .map(|data| (data.id, MapEvent::new(Arc::new(data.clone()), tag_name)))
            .collect();

        Ok(Self {
            map_id,
            database,
            events,
        })
    }

    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn event(&self, event_id: EventId) -> Option<&MapEvent> {
        self.events.get(&event_id)
    }

    pub fn events(&self) -> impl Iterator<Item = &MapEvent> {
        self.events.values()
    }

    pub fn remove_event(&mut self, event_id: EventId) -> Option<MapEvent> {
        self.events.remove(&event_id)
    }

    /// Re-evaluate page conditions of every event
    pub fn refresh(&mut self, variables: &Variables) {
        for event in self.events.values_mut() {
            if event.refresh(variables) {
                log::trace!(
                    "[Map] Event {} switched to page {:?}",
                    event.id(),
                    event.page_index()
                );
            }
        }
    }
}

impl InterceptHost for GameMap {
    type Event = MapEvent;

    fn current_map_id(&self) -> MapId {
        self.map_id
    }

    fn event(&self, event_id: EventId) -> Option<&MapEvent> {
        self.events.get(&event_id)
    }

    fn common_event_list(&self, id: CommonEventId) -> Option<&[Command]> {
        self.database
            .common_event(id)
            .map(|common_event| common_event.list.as_slice())
    }
}
