//! Live map events

use crate::classify::find_meta_value;
use crate::engine::InterceptTarget;
use crate::runtime::Variables;
use crate::types::{
    command::Command,
    data::{EventData, EventPage, PageConditions, Trigger},
    ids::EventId,
};
use std::sync::Arc;

/// A materialised event on the current map
#[derive(Debug, Clone)]
pub struct MapEvent {
    data: Arc<EventData>,
    /// Read once from the definition's metadata, never recomputed
    event_type: Option<String>,
    page_index: Option<usize>,
}

impl MapEvent {
    pub fn new(data: Arc<EventData>, tag_name: &str) -> Self {
        let event_type = find_meta_value(&data.meta, tag_name);
        Self {
            data,
            event_type,
            page_index: None,
        }
    }

    pub fn id(&self) -> EventId {
        self.data.id
    }

    pub fn definition(&self) -> &EventData {
        &self.data
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    /// 0-based index of the active page
    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }

    pub fn page(&self) -> Option<&EventPage> {
        self.page_index.and_then(|index| self.data.pages.get(index))
    }

    pub fn trigger(&self) -> Option<Trigger> {
        self.page().map(|page| page.trigger)
    }

    /// Instruction list of the active page, empty when no page is active
    pub fn list(&self) -> &[Command] {
        self.page().map(|page| page.list.as_slice()).unwrap_or(&[])
    }

    /// Select the last page whose conditions hold; returns whether it changed
    pub fn refresh(&mut self, variables: &Variables) -> bool {
        let page_index = self
            .data
            .pages
            .iter()
            .rposition(|page| meets_conditions(&page.conditions, variables));
        let changed = page_index != self.page_index;
        self.page_index = page_index;
        changed
    }
}

fn meets_conditions(conditions: &PageConditions, variables: &Variables) -> bool {
    if let Some(switch) = &conditions.switch {
        if variables.get(switch) == 0 {
            return false;
        }
    }
    if let Some(condition) = &conditions.variable {
        if variables.get(&condition.name) < condition.at_least {
            return false;
        }
    }
    true
}

impl InterceptTarget for MapEvent {
    fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    fn page_number(&self) -> u32 {
        self.page_index.map_or(0, |index| index as u32 + 1)
    }
}
