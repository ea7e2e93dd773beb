//! Core types shared by the engine, the runtime and the loaders
//!
//! - Identifiers for maps, events and common events
//! - Instruction lists executed by interpreters
//! - Static game data (maps, event pages, common events)
//! - Interceptor rules

pub mod command;
pub mod data;
pub mod ids;
pub mod rule;

pub use command::{Command, CommandKind, Comparison};
pub use data::{
    CommonEvent, Database, EventData, EventPage, MapData, MetaTable, PageConditions, Trigger,
    VariableCondition,
};
pub use ids::{CommonEventId, EventId, MapId};
pub use rule::{InterceptorRule, NONE_EVENT_TYPE, Timing};
