//! Identifier value objects for maps, events and common events

use serde::{Deserialize, Serialize};

/// Macro to implement common traits for numeric identifier types
macro_rules! impl_id_wrapper {
    ($type:ident) => {
        impl $type {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $type {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Identifier of a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(u32);

impl_id_wrapper!(MapId);

/// Identifier of an event placed on a map
///
/// Id `0` is used by executions that are not bound to any map event
/// (for example a reserved common event) and never resolves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(u32);

impl_id_wrapper!(EventId);

impl EventId {
    /// The id used by executions without an owning map event
    pub const NONE: EventId = EventId(0);
}

/// Identifier of a common event (shared routine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommonEventId(u32);

impl_id_wrapper!(CommonEventId);
