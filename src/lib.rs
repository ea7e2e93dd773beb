//! # event-interceptor
//!
//! Runs a shared common event automatically right before or right after a
//! map event executes. Events are classified by a metadata marker
//! (`<EvTp:aaa>` by default) and an ordered rule table maps classification,
//! timing, page and parallel conditions to the common event to run. The first
//! matching rule wins and its common event runs as a nested execution bound
//! to the same event.
//!
//! The [`engine`] holds the decision logic and talks to its host through
//! small traits. The [`runtime`] module is a complete reference host that
//! calls the engine at both hook points.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use event_interceptor::{
//!     Command, CommonEvent, Database, EventData, EventId, EventPage, Interceptor,
//!     InterceptorConfig, MapData, MapId, Session, Trigger,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = InterceptorConfig::from_json(
//!     r#"{
//!         "tagName": "EvTp",
//!         "interceptorList": [{"tagValue": "aaa", "timing": "start", "commonEventId": 5}]
//!     }"#,
//! )?;
//! let database = Database::new(
//!     vec![CommonEvent::new(5, vec![Command::text(0, "shared prologue")])],
//!     vec![MapData::new(
//!         1,
//!         vec![EventData::new(
//!             1,
//!             vec![EventPage::new(Trigger::Action, vec![Command::text(0, "hello")])],
//!         )
//!         .with_meta("EvTp", "aaa")],
//!     )],
//! );
//!
//! let mut session = Session::new(Arc::new(database), Interceptor::new(config), MapId::new(1))?;
//! session.start_event(EventId::new(1))?;
//! session.run_until_idle(10);
//!
//! let lines: Vec<_> = session.trace().iter().filter_map(|entry| entry.text()).collect();
//! assert_eq!(lines, ["shared prologue", "hello"]);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod engine;
pub mod infrastructure;
pub mod lint;
pub mod runtime;
pub mod types;

pub use config::{ConfigError, DEFAULT_TAG_NAME, InterceptorConfig};
pub use engine::{
    ExecutionContext, InterceptHost, InterceptSubject, InterceptTarget, Interception,
    Interceptor, SkipReason,
};
pub use lint::{LintIssue, LintLevel, LintResult, lint};
pub use runtime::{GameMap, MapEvent, Session, SessionError, TraceEntry, TraceRecord};
pub use types::{
    Command, CommandKind, CommonEvent, CommonEventId, Comparison, Database, EventData, EventId,
    EventPage, InterceptorRule, MapData, MapId, NONE_EVENT_TYPE, PageConditions, Timing, Trigger,
};
