//! Executable instruction lists

use crate::types::ids::{CommonEventId, MapId};
use serde::{Deserialize, Serialize};

/// A single instruction of an event page or common event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Command {
    /// Nesting level inside conditional blocks
    #[serde(default)]
    pub indent: u32,
    #[serde(flatten)]
    pub kind: CommandKind,
}

impl Command {
    pub fn new(indent: u32, kind: CommandKind) -> Self {
        Self { indent, kind }
    }

    pub fn text(indent: u32, text: impl Into<String>) -> Self {
        Self::new(indent, CommandKind::Text { text: text.into() })
    }

    pub fn end(indent: u32) -> Self {
        Self::new(indent, CommandKind::End)
    }

    /// Whether this is the terminator of the top-level list
    pub fn is_list_terminator(&self) -> bool {
        self.indent == 0 && self.kind == CommandKind::End
    }
}

/// Instruction payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum CommandKind {
    /// Show a line of text
    Text { text: String },
    /// Set variable value
    SetVariable { name: String, value: i64 },
    /// Add to variable value
    AddVariable { name: String, value: i64 },
    /// Conditional branch on a variable
    If {
        variable: String,
        cmp: Comparison,
        value: i64,
    },
    /// Alternative block of the preceding `If`
    Else,
    /// Closes an `If` block
    BranchEnd,
    /// Run a common event as a nested execution
    CallCommonEvent { id: CommonEventId },
    /// Suspend for a number of ticks
    Wait { frames: u32 },
    /// Move the player to another map
    Transfer { map_id: MapId },
    /// Terminator closing a block or the whole list
    End,
}

/// Comparison operators for conditional branches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Comparison {
    pub fn evaluate(self, current: i64, value: i64) -> bool {
        match self {
            Comparison::Equal => current == value,
            Comparison::NotEqual => current != value,
            Comparison::LessThan => current < value,
            Comparison::LessThanOrEqual => current <= value,
            Comparison::GreaterThan => current > value,
            Comparison::GreaterThanOrEqual => current >= value,
        }
    }
}

/// Append a top-level terminator unless the list already ends with one
pub fn ensure_terminated(list: &mut Vec<Command>) {
    if !list.last().is_some_and(Command::is_list_terminator) {
        list.push(Command::end(0));
    }
}
