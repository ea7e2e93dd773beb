//! Execution trace recorded by interpreters

use crate::types::{
    ids::{CommonEventId, EventId, MapId},
    rule::Timing,
};
use serde::{Deserialize, Serialize};

/// What happened
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceRecord {
    /// A text command ran
    Text { text: String },
    /// An interceptor rule pushed its common event
    Intercepted {
        timing: Timing,
        rule_index: usize,
        common_event_id: CommonEventId,
    },
    /// A transfer was reserved
    Transfer { to: MapId },
}

/// One trace line with the context that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceEntry {
    pub map_id: MapId,
    pub event_id: EventId,
    pub depth: u32,
    pub record: TraceRecord,
}

impl TraceEntry {
    pub fn text(&self) -> Option<&str> {
        match &self.record {
            TraceRecord::Text { text } => Some(text),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[map {} event {} depth {}] ",
            self.map_id, self.event_id, self.depth
        )?;
        match &self.record {
            TraceRecord::Text { text } => write!(f, "{text}"),
            TraceRecord::Intercepted {
                timing,
                rule_index,
                common_event_id,
            } => write!(
                f,
                "<{timing}> rule #{} -> common event {common_event_id}",
                rule_index + 1
            ),
            TraceRecord::Transfer { to } => write!(f, "transfer to map {to}"),
        }
    }
}
