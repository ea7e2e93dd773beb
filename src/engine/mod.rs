//! Interception engine
//!
//! Decides whether a configured rule applies to an event that is about to
//! start or has just finished, and if so pushes that rule's common event as
//! a nested execution bound to the same event.
//!
//! The engine owns no execution state. Hosts call
//! [`Interceptor::try_intercept`] from exactly two places:
//! - right after an interpreter has been set up for a fresh run
//!   ([`Timing::Start`])
//! - when the terminator of the top-level list runs and no instruction
//!   follows it ([`Timing::Finish`])

use crate::config::InterceptorConfig;
use crate::types::{
    command::Command,
    ids::{CommonEventId, EventId, MapId},
    rule::{InterceptorRule, NONE_EVENT_TYPE, Timing},
};

#[cfg(test)]
mod tests;

/// A live map event as seen by the engine
pub trait InterceptTarget {
    /// Classification cached at construction
    fn event_type(&self) -> Option<&str>;

    /// Current page as a 1-based number, `0` when no page is active
    fn page_number(&self) -> u32;
}

/// Host state the engine reads
pub trait InterceptHost {
    type Event: InterceptTarget;

    fn current_map_id(&self) -> MapId;

    /// Resolve a live event on the current map
    fn event(&self, event_id: EventId) -> Option<&Self::Event>;

    /// Instruction list of a common event, `None` when unassigned
    fn common_event_list(&self, id: CommonEventId) -> Option<&[Command]>;
}

/// The execution context an event runs in
pub trait ExecutionContext {
    /// `0` for a top-level execution
    fn depth(&self) -> u32;

    /// Map the context was set up on
    fn map_id(&self) -> MapId;

    /// Whether this is the map's primary (non-parallel) interpreter
    fn is_map_interpreter(&self) -> bool;

    /// Push a nested context at `depth() + 1` running `list` for `event_id`
    fn setup_child(&mut self, list: &[Command], event_id: EventId);
}

/// Everything the matching predicate looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptSubject<'a> {
    pub event_type: Option<&'a str>,
    pub page_number: u32,
    /// Driven by something other than the map's primary interpreter
    pub parallel: bool,
}

impl<'a> InterceptSubject<'a> {
    pub fn new(event: &'a impl InterceptTarget, context: &impl ExecutionContext) -> Self {
        Self {
            event_type: event.event_type(),
            page_number: event.page_number(),
            parallel: !context.is_map_interpreter(),
        }
    }
}

impl InterceptorRule {
    /// Whether this rule applies to `subject` at `timing`
    pub fn matches(&self, subject: &InterceptSubject<'_>, timing: Timing) -> bool {
        if self.timing != timing {
            return false;
        }
        if self.invalid_parallel && subject.parallel {
            return false;
        }
        if self.page_index > 0 && subject.page_number != self.page_index {
            return false;
        }
        match self.tag_value.as_deref() {
            None => subject.event_type != Some(NONE_EVENT_TYPE),
            Some(tag_value) => subject.event_type == Some(tag_value),
        }
    }
}

/// Why an interception did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The context is itself nested
    Nested { depth: u32 },
    /// The context belongs to a map that is no longer active
    InactiveMap { map_id: MapId },
    /// The event is not materialised on the current map
    MissingEvent,
    NoMatchingRule,
    /// The selected rule points at an unassigned common event
    MissingCommonEvent {
        rule_index: usize,
        common_event_id: CommonEventId,
    },
}

/// Result of a hook invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    Dispatched {
        rule_index: usize,
        common_event_id: CommonEventId,
    },
    Skipped(SkipReason),
}

impl Interception {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Interception::Dispatched { .. })
    }
}

/// Rule table plus the hook entry point
#[derive(Debug, Clone, Default)]
pub struct Interceptor {
    config: InterceptorConfig,
}

impl Interceptor {
    pub fn new(config: InterceptorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterceptorConfig {
        &self.config
    }

    pub fn tag_name(&self) -> &str {
        &self.config.tag_name
    }

    pub fn rules(&self) -> &[InterceptorRule] {
        &self.config.interceptor_list
    }

    /// First rule matching `subject`, with its position in the list
    pub fn select(
        &self,
        subject: &InterceptSubject<'_>,
        timing: Timing,
    ) -> Option<(usize, &InterceptorRule)> {
        self.rules()
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(subject, timing))
    }

    /// Hook entry point: dispatch the first matching rule's common event
    pub fn try_intercept<C, H>(
        &self,
        context: &mut C,
        host: &H,
        event_id: EventId,
        timing: Timing,
    ) -> Interception
    where
        C: ExecutionContext,
        H: InterceptHost,
    {
        let interception = self.evaluate(context, host, event_id, timing);
        match interception {
            Interception::Dispatched {
                rule_index,
                common_event_id,
            } => {
                log::debug!(
                    "[Intercept] {} rule {} runs common event {} for event {} on map {}",
                    timing,
                    self.rules()[rule_index].label(rule_index),
                    common_event_id,
                    event_id,
                    context.map_id()
                );
            }
            Interception::Skipped(reason) => {
                log::trace!(
                    "[Intercept] {} skipped for event {}: {:?}",
                    timing,
                    event_id,
                    reason
                );
            }
        }
        interception
    }

    fn evaluate<C, H>(
        &self,
        context: &mut C,
        host: &H,
        event_id: EventId,
        timing: Timing,
    ) -> Interception
    where
        C: ExecutionContext,
        H: InterceptHost,
    {
        let depth = context.depth();
        if depth > 0 {
            return Interception::Skipped(SkipReason::Nested { depth });
        }
        if context.map_id() != host.current_map_id() {
            return Interception::Skipped(SkipReason::InactiveMap {
                map_id: context.map_id(),
            });
        }
        let Some(event) = host.event(event_id) else {
            return Interception::Skipped(SkipReason::MissingEvent);
        };

        let subject = InterceptSubject::new(event, &*context);
        let Some((rule_index, rule)) = self.select(&subject, timing) else {
            return Interception::Skipped(SkipReason::NoMatchingRule);
        };

        let common_event_id = rule.common_event_id;
        let Some(list) = host.common_event_list(common_event_id) else {
            return Interception::Skipped(SkipReason::MissingCommonEvent {
                rule_index,
                common_event_id,
            });
        };

        context.setup_child(list, event_id);
        Interception::Dispatched {
            rule_index,
            common_event_id,
        }
    }
}
