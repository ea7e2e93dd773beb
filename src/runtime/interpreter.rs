//! Instruction list interpreter with the interception hook points

use crate::engine::{ExecutionContext, Interception};
use crate::runtime::{
    World,
    trace::{TraceEntry, TraceRecord},
};
use crate::types::{
    command::{Command, CommandKind},
    ids::{EventId, MapId},
    rule::Timing,
};
use std::collections::HashMap;

/// Nesting limit for child executions; the top level is depth 0
pub const MAX_DEPTH: u32 = 100;

/// Which role an interpreter plays for its map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterKind {
    /// The map's primary interpreter
    Map,
    /// A parallel event's own interpreter
    Parallel,
    /// A nested execution pushed by a parent
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitMode {
    None,
    Transfer,
}

/// Executes one instruction list, suspending for nested children
#[derive(Debug, Clone)]
pub struct Interpreter {
    kind: InterpreterKind,
    depth: u32,
    map_id: MapId,
    event_id: EventId,
    /// `None` when idle; an empty list still counts as loaded
    list: Option<Vec<Command>>,
    index: usize,
    indent: u32,
    /// Result of the last `If` per indent level
    branch: HashMap<u32, bool>,
    wait_count: u32,
    wait_mode: WaitMode,
    child: Option<Box<Interpreter>>,
}

impl Interpreter {
    pub fn new(kind: InterpreterKind) -> Self {
        Self::with_depth(kind, 0)
    }

    fn with_depth(kind: InterpreterKind, depth: u32) -> Self {
        Self {
            kind,
            depth,
            map_id: MapId::new(0),
            event_id: EventId::NONE,
            list: None,
            index: 0,
            indent: 0,
            branch: HashMap::new(),
            wait_count: 0,
            wait_mode: WaitMode::None,
            child: None,
        }
    }

    pub fn kind(&self) -> InterpreterKind {
        self.kind
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn child(&self) -> Option<&Interpreter> {
        self.child.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.list.is_some()
    }

    pub fn clear(&mut self) {
        self.list = None;
        self.index = 0;
        self.indent = 0;
        self.branch.clear();
        self.wait_count = 0;
        self.wait_mode = WaitMode::None;
        self.child = None;
    }

    fn load(&mut self, map_id: MapId, list: &[Command], event_id: EventId) {
        self.clear();
        self.map_id = map_id;
        self.event_id = event_id;
        self.list = Some(list.to_vec());
    }

    /// Start a fresh run of `list`, then fire the start hook
    pub(crate) fn setup(&mut self, list: &[Command], event_id: EventId, world: &mut World<'_>) {
        self.load(world.map.map_id(), list, event_id);
        let interception =
            world
                .interceptor
                .try_intercept(self, world.map, event_id, Timing::Start);
        self.record_interception(interception, Timing::Start, world);
    }

    pub(crate) fn update(&mut self, world: &mut World<'_>) {
        while self.is_running() {
            if self.update_child(world) || self.update_wait(world) {
                break;
            }
            self.execute_command(world);
        }
    }

    fn update_child(&mut self, world: &mut World<'_>) -> bool {
        if let Some(child) = self.child.as_mut() {
            child.update(world);
            if child.is_running() {
                return true;
            }
            self.child = None;
        }
        false
    }

    fn update_wait(&mut self, world: &World<'_>) -> bool {
        if self.wait_mode == WaitMode::Transfer {
            if world.transfer.is_some() {
                return true;
            }
            self.wait_mode = WaitMode::None;
        }
        if self.wait_count > 0 {
            self.wait_count -= 1;
            return true;
        }
        false
    }

    fn execute_command(&mut self, world: &mut World<'_>) {
        let Some(command) = self.current(self.index).cloned() else {
            self.terminate();
            return;
        };
        self.indent = command.indent;
        self.run_command(&command.kind, world);
        self.index += 1;
    }

    fn terminate(&mut self) {
        self.list = None;
        self.index = 0;
        self.child = None;
    }

    fn run_command(&mut self, kind: &CommandKind, world: &mut World<'_>) {
        match kind {
            CommandKind::Text { text } => {
                world.trace.push(self.trace_entry(TraceRecord::Text { text: text.clone() }));
            }
            CommandKind::SetVariable { name, value } => {
                world.variables.set(name, *value);
                *world.refresh_requested = true;
            }
            CommandKind::AddVariable { name, value } => {
                world.variables.add(name, *value);
                *world.refresh_requested = true;
            }
            CommandKind::If {
                variable,
                cmp,
                value,
            } => {
                let result = cmp.evaluate(world.variables.get(variable), *value);
                self.branch.insert(self.indent, result);
                if !result {
                    self.skip_branch();
                }
            }
            CommandKind::Else => {
                if self.branch.get(&self.indent) != Some(&false) {
                    self.skip_branch();
                }
            }
            CommandKind::BranchEnd => {}
            CommandKind::CallCommonEvent { id } => {
                match world.map.database().common_event(*id) {
                    Some(common_event) => self.setup_child(&common_event.list, self.event_id),
                    None => log::warn!("[Interpreter] Common event {} does not exist", id),
                }
            }
            CommandKind::Wait { frames } => {
                self.wait_count = *frames;
            }
            CommandKind::Transfer { map_id } => {
                world.trace.push(self.trace_entry(TraceRecord::Transfer { to: *map_id }));
                *world.transfer = Some(*map_id);
                self.wait_mode = WaitMode::Transfer;
            }
            CommandKind::End => self.command_end(world),
        }
    }

    /// Terminator: fires the finish hook only at the true end of the list
    fn command_end(&mut self, world: &mut World<'_>) {
        if self.current(self.index + 1).is_some() {
            return;
        }
        let interception =
            world
                .interceptor
                .try_intercept(self, world.map, self.event_id, Timing::Finish);
        self.record_interception(interception, Timing::Finish, world);
    }

    fn skip_branch(&mut self) {
        let indent = self.indent;
        while self
            .current(self.index + 1)
            .is_some_and(|next| next.indent > indent)
        {
            self.index += 1;
        }
    }

    fn current(&self, index: usize) -> Option<&Command> {
        self.list.as_ref().and_then(|list| list.get(index))
    }

    fn record_interception(&self, interception: Interception, timing: Timing, world: &mut World<'_>) {
        if let Interception::Dispatched {
            rule_index,
            common_event_id,
        } = interception
        {
            world.trace.push(self.trace_entry(TraceRecord::Intercepted {
                timing,
                rule_index,
                common_event_id,
            }));
        }
    }

    fn trace_entry(&self, record: TraceRecord) -> TraceEntry {
        TraceEntry {
            map_id: self.map_id,
            event_id: self.event_id,
            depth: self.depth,
            record,
        }
    }
}

impl ExecutionContext for Interpreter {
    fn depth(&self) -> u32 {
        self.depth
    }

    fn map_id(&self) -> MapId {
        self.map_id
    }

    fn is_map_interpreter(&self) -> bool {
        self.kind == InterpreterKind::Map
    }

    fn setup_child(&mut self, list: &[Command], event_id: EventId) {
        if self.depth + 1 >= MAX_DEPTH {
            log::warn!(
                "[Interpreter] Common event calls exceeded depth {} for event {}; call skipped",
                MAX_DEPTH,
                event_id
            );
            return;
        }
        let mut child = Interpreter::with_depth(InterpreterKind::Child, self.depth + 1);
        child.load(self.map_id, list, event_id);
        self.child = Some(Box::new(child));
    }
}
