//! Reference host runtime
//!
//! A single-threaded, tick-driven interpreter for map events. It calls the
//! interception engine explicitly at its two hook points: after an
//! interpreter is set up for a fresh run, and when the terminator of the
//! top-level list runs with nothing after it.

use crate::engine::Interceptor;
use crate::types::{
    data::{Database, Trigger},
    ids::{CommonEventId, EventId, MapId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod event;
pub mod interpreter;
pub mod map;
pub mod trace;


pub use event::MapEvent;
pub use interpreter::{Interpreter, InterpreterKind, MAX_DEPTH};
pub use map::GameMap;
pub use trace::{TraceEntry, TraceRecord};

/// Errors raised by session setup and explicit requests
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Map {map_id} does not exist")]
    MapNotFound { map_id: MapId },

    #[error("Event {event_id} does not exist on the current map")]
    EventNotFound { event_id: EventId },

    #[error("Event {event_id} has no active page")]
    NoActivePage { event_id: EventId },

    #[error("Event {event_id} runs in parallel and cannot be started")]
    NotStartable { event_id: EventId },

    #[error("Common event {id} does not exist")]
    CommonEventNotFound { id: CommonEventId },
}

/// Game variables; unset variables read as 0
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Variables {
    values: HashMap<String, i64>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> i64 {
        self.values.get(name).copied().unwrap_or(0)
    }

    pub fn set(&mut self, name: &str, value: i64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn add(&mut self, name: &str, value: i64) {
        *self.values.entry(name.to_string()).or_insert(0) += value;
    }
}

/// Everything an interpreter touches while it runs
pub(crate) struct World<'a> {
    pub(crate) map: &'a GameMap,
    pub(crate) interceptor: &'a Interceptor,
    pub(crate) variables: &'a mut Variables,
    pub(crate) trace: &'a mut Vec<TraceEntry>,
    pub(crate) transfer: &'a mut Option<MapId>,
    pub(crate) refresh_requested: &'a mut bool,
}

#[derive(Debug, Clone)]
struct ParallelSlot {
    event_id: EventId,
    page_index: usize,
    interpreter: Interpreter,
}

/// Host session: the active map, its interpreters and game state
#[derive(Debug, Clone)]
pub struct Session {
    interceptor: Interceptor,
    database: Arc<Database>,
    map: GameMap,
    interpreter: Interpreter,
    parallels: Vec<ParallelSlot>,
    variables: Variables,
    trace: Vec<TraceEntry>,
    pending_transfer: Option<MapId>,
    refresh_requested: bool,
    starting_event: Option<EventId>,
    reserved_common_event: Option<CommonEventId>,
}

impl Session {
    /// Load `map_id` and select each event's initial page
    pub fn new(
        database: Arc<Database>,
        interceptor: Interceptor,
        map_id: MapId,
    ) -> Result<Self, SessionError> {
        let map = GameMap::setup(Arc::clone(&database), map_id, interceptor.tag_name())?;
        let mut session = Self {
            interceptor,
            database,
            map,
            interpreter: Interpreter::new(InterpreterKind::Map),
            parallels: Vec::new(),
            variables: Variables::new(),
            trace: Vec::new(),
            pending_transfer: None,
            refresh_requested: false,
            starting_event: None,
            reserved_common_event: None,
        };
        session.refresh();
        Ok(session)
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Set a variable from outside the interpreters; pages refresh next tick
    pub fn set_variable(&mut self, name: &str, value: i64) {
        self.variables.set(name, value);
        self.refresh_requested = true;
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn take_trace(&mut self) -> Vec<TraceEntry> {
        std::mem::take(&mut self.trace)
    }

    /// Queue a player-started event on the map interpreter
    pub fn start_event(&mut self, event_id: EventId) -> Result<(), SessionError> {
        let event = self
            .map
            .event(event_id)
            .ok_or(SessionError::EventNotFound { event_id })?;
        match event.trigger() {
            None => Err(SessionError::NoActivePage { event_id }),
            Some(Trigger::Parallel) => Err(SessionError::NotStartable { event_id }),
            Some(_) => {
                self.starting_event = Some(event_id);
                Ok(())
            }
        }
    }

    /// Queue a common event on the map interpreter, not bound to any event
    pub fn reserve_common_event(&mut self, id: CommonEventId) -> Result<(), SessionError> {
        if self.database.common_event(id).is_none() {
            return Err(SessionError::CommonEventNotFound { id });
        }
        self.reserved_common_event = Some(id);
        Ok(())
    }

    /// Drop a live event; running executions for it stay on the stack
    pub fn remove_event(&mut self, event_id: EventId) -> Option<MapEvent> {
        self.parallels.retain(|slot| slot.event_id != event_id);
        self.map.remove_event(event_id)
    }

    /// Whether the map interpreter has work running or queued
    pub fn is_busy(&self) -> bool {
        self.interpreter.is_running()
            || self.starting_event.is_some()
            || self.reserved_common_event.is_some()
            || self.pending_transfer.is_some()
    }

    /// One host tick
    pub fn update(&mut self) {
        if self.refresh_requested {
            self.refresh();
        }
        self.update_interpreters();
        if let Some(map_id) = self.pending_transfer.take() {
            self.perform_transfer(map_id);
        }
    }

    /// Tick until the map interpreter is idle; returns the ticks used
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.is_busy() {
            self.update();
            ticks += 1;
        }
        ticks
    }

    fn refresh(&mut self) {
        self.refresh_requested = false;
        self.map.refresh(&self.variables);
        self.sync_parallels();
    }

    /// Keep one interpreter per event whose active page runs in parallel
    fn sync_parallels(&mut self) {
        let mut previous = std::mem::take(&mut self.parallels);
        for event in self.map.events() {
            let Some(page_index) = event.page_index() else {
                continue;
            };
            if event.trigger() != Some(Trigger::Parallel) {
                continue;
            }
            let existing = previous
                .iter()
                .position(|slot| slot.event_id == event.id() && slot.page_index == page_index);
            let slot = match existing {
                Some(position) => previous.swap_remove(position),
                None => ParallelSlot {
                    event_id: event.id(),
                    page_index,
                    interpreter: Interpreter::new(InterpreterKind::Parallel),
                },
            };
            self.parallels.push(slot);
        }
    }

    fn update_interpreters(&mut self) {
        let mut world = World {
            map: &self.map,
            interceptor: &self.interceptor,
            variables: &mut self.variables,
            trace: &mut self.trace,
            transfer: &mut self.pending_transfer,
            refresh_requested: &mut self.refresh_requested,
        };

        if !self.interpreter.is_running() {
            setup_starting_event(
                &mut self.interpreter,
                &mut world,
                &mut self.starting_event,
                &mut self.reserved_common_event,
            );
        }
        self.interpreter.update(&mut world);

        let map = world.map;
        for slot in &mut self.parallels {
            let Some(event) = map.event(slot.event_id) else {
                continue;
            };
            if !slot.interpreter.is_running() {
                slot.interpreter.setup(event.list(), slot.event_id, &mut world);
            }
            slot.interpreter.update(&mut world);
        }
    }

    /// Switch maps, discarding every running execution of the old map
    ///
    /// Clearing the interpreters here means no context outlives its map, so
    /// the engine's inactive-map guard never triggers through a session.
    fn perform_transfer(&mut self, map_id: MapId) {
        match GameMap::setup(Arc::clone(&self.database), map_id, self.interceptor.tag_name()) {
            Ok(map) => {
                log::info!("[Transfer] Map {} -> {}", self.map.map_id(), map_id);
                self.map = map;
                self.interpreter.clear();
                self.parallels.clear();
                self.starting_event = None;
                self.refresh();
            }
            Err(err) => {
                log::warn!(
                    "[Transfer] {}; staying on map {}",
                    err,
                    self.map.map_id()
                );
            }
        }
    }
}

/// Pick the next execution for an idle map interpreter
fn setup_starting_event(
    interpreter: &mut Interpreter,
    world: &mut World<'_>,
    starting_event: &mut Option<EventId>,
    reserved_common_event: &mut Option<CommonEventId>,
) {
    let map = world.map;
    if let Some(id) = reserved_common_event.take() {
        if let Some(common_event) = map.database().common_event(id) {
            interpreter.setup(&common_event.list, EventId::NONE, world);
            return;
        }
    }

    if let Some(event_id) = starting_event.take() {
        if let Some(event) = map.event(event_id) {
            interpreter.setup(event.list(), event_id, world);
            return;
        }
    }

    if let Some(event) = map
        .events()
        .find(|event| event.trigger() == Some(Trigger::Autorun))
    {
        interpreter.setup(event.list(), event.id(), world);
    }
}
