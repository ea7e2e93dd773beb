//! Tests for the interception engine

use super::*;
use std::collections::HashMap;

struct FakeEvent {
    event_type: Option<String>,
    page_number: u32,
}

impl InterceptTarget for FakeEvent {
    fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    fn page_number(&self) -> u32 {
        self.page_number
    }
}

struct FakeHost {
    map_id: MapId,
    events: HashMap<EventId, FakeEvent>,
    common_events: HashMap<CommonEventId, Vec<Command>>,
}

impl FakeHost {
    fn new() -> Self {
        let mut common_events = HashMap::new();
        for id in [5, 6] {
            common_events.insert(
                CommonEventId::new(id),
                vec![Command::text(0, format!("common {id}")), Command::end(0)],
            );
        }
        Self {
            map_id: MapId::new(1),
            events: HashMap::new(),
            common_events,
        }
    }

    fn with_event(mut self, id: u32, event_type: Option<&str>, page_number: u32) -> Self {
        self.events.insert(
            EventId::new(id),
            FakeEvent {
                event_type: event_type.map(str::to_string),
                page_number,
            },
        );
        self
    }
}

impl InterceptHost for FakeHost {
    type Event = FakeEvent;

    fn current_map_id(&self) -> MapId {
        self.map_id
    }

    fn event(&self, event_id: EventId) -> Option<&FakeEvent> {
        self.events.get(&event_id)
    }

    fn common_event_list(&self, id: CommonEventId) -> Option<&[Command]> {
        self.common_events.get(&id).map(Vec::as_slice)
    }
}

struct FakeContext {
    depth: u32,
    map_id: MapId,
    primary: bool,
    children: Vec<(Vec<Command>, EventId, u32)>,
}

impl FakeContext {
    fn top_level() -> Self {
        Self {
            depth: 0,
            map_id: MapId::new(1),
            primary: true,
            children: Vec::new(),
        }
    }
}

impl ExecutionContext for FakeContext {
    fn depth(&self) -> u32 {
        self.depth
    }

    fn map_id(&self) -> MapId {
        self.map_id
    }

    fn is_map_interpreter(&self) -> bool {
        self.primary
    }

    fn setup_child(&mut self, list: &[Command], event_id: EventId) {
        self.children.push((list.to_vec(), event_id, self.depth + 1));
    }
}

fn subject(event_type: Option<&str>, page_number: u32, parallel: bool) -> InterceptSubject<'_> {
    InterceptSubject {
        event_type,
        page_number,
        parallel,
    }
}

fn interceptor(rules: Vec<InterceptorRule>) -> Interceptor {
    Interceptor::new(InterceptorConfig::with_rules(rules))
}

#[test]
fn timing_is_a_hard_filter() {
    let rules = [
        InterceptorRule::new(Timing::Start, 5),
        InterceptorRule::new(Timing::Start, 5).with_tag("aaa"),
        InterceptorRule::new(Timing::Start, 5).on_page(1),
    ];
    for rule in &rules {
        for event_type in [None, Some("aaa"), Some("none")] {
            assert!(!rule.matches(&subject(event_type, 1, false), Timing::Finish));
        }
    }
}

#[test]
fn untagged_rule_skips_none_sentinel() {
    let rule = InterceptorRule::new(Timing::Finish, 5);
    assert!(!rule.matches(&subject(Some("none"), 1, false), Timing::Finish));
    assert!(rule.matches(&subject(None, 1, false), Timing::Finish));
    assert!(rule.matches(&subject(Some("aaa"), 1, false), Timing::Finish));
    // The sentinel is case sensitive
    assert!(rule.matches(&subject(Some("None"), 1, false), Timing::Finish));
}

#[test]
fn tagged_rule_requires_exact_classification() {
    let rule = InterceptorRule::new(Timing::Start, 5).with_tag("aaa");
    assert!(rule.matches(&subject(Some("aaa"), 1, false), Timing::Start));
    assert!(!rule.matches(&subject(None, 1, false), Timing::Start));
    assert!(!rule.matches(&subject(Some("aa"), 1, false), Timing::Start));
    assert!(!rule.matches(&subject(Some("AAA"), 1, false), Timing::Start));
}

#[test]
fn each_filter_flips_the_result_in_isolation() {
    let rule = InterceptorRule::new(Timing::Start, 5)
        .with_tag("aaa")
        .on_page(2)
        .skip_parallel();
    assert!(rule.matches(&subject(Some("aaa"), 2, false), Timing::Start));

    assert!(!rule.matches(&subject(Some("aaa"), 2, false), Timing::Finish));
    assert!(!rule.matches(&subject(Some("aaa"), 1, false), Timing::Start));
    assert!(!rule.matches(&subject(Some("aaa"), 2, true), Timing::Start));
    assert!(!rule.matches(&subject(Some("bbb"), 2, false), Timing::Start));
}

#[test]
fn page_zero_matches_any_page_including_no_page() {
    let rule = InterceptorRule::new(Timing::Start, 5);
    for page_number in [0, 1, 7] {
        assert!(rule.matches(&subject(None, page_number, false), Timing::Start));
    }
}

#[test]
fn parallel_events_match_unless_rule_opts_out() {
    let rule = InterceptorRule::new(Timing::Start, 5);
    assert!(rule.matches(&subject(None, 1, true), Timing::Start));
    assert!(!rule.skip_parallel().matches(&subject(None, 1, true), Timing::Start));
}

#[test]
fn first_matching_rule_wins() {
    let interceptor = interceptor(vec![
        InterceptorRule::new(Timing::Start, 6).with_tag("bbb"),
        InterceptorRule::new(Timing::Start, 5).with_tag("aaa"),
        InterceptorRule::new(Timing::Start, 6),
    ]);
    let host = FakeHost::new().with_event(1, Some("aaa"), 1);
    let mut context = FakeContext::top_level();

    let result = interceptor.try_intercept(&mut context, &host, EventId::new(1), Timing::Start);

    assert_eq!(
        result,
        Interception::Dispatched {
            rule_index: 1,
            common_event_id: CommonEventId::new(5),
        }
    );
    assert_eq!(context.children.len(), 1);
    let (list, event_id, depth) = &context.children[0];
    assert_eq!(list[0], Command::text(0, "common 5"));
    assert_eq!(*event_id, EventId::new(1));
    assert_eq!(*depth, 1);
}

#[test]
fn nested_context_never_intercepts() {
    let interceptor = interceptor(vec![InterceptorRule::new(Timing::Finish, 5)]);
    let host = FakeHost::new().with_event(1, None, 1);
    let mut context = FakeContext {
        depth: 1,
        ..FakeContext::top_level()
    };

    let result = interceptor.try_intercept(&mut context, &host, EventId::new(1), Timing::Finish);

    assert_eq!(result, Interception::Skipped(SkipReason::Nested { depth: 1 }));
    assert!(context.children.is_empty());
}

#[test]
fn inactive_map_context_is_skipped() {
    let interceptor = interceptor(vec![InterceptorRule::new(Timing::Finish, 5)]);
    let host = FakeHost::new().with_event(1, None, 1);
    let mut context = FakeContext {
        map_id: MapId::new(2),
        ..FakeContext::top_level()
    };

    let result = interceptor.try_intercept(&mut context, &host, EventId::new(1), Timing::Finish);

    assert_eq!(
        result,
        Interception::Skipped(SkipReason::InactiveMap {
            map_id: MapId::new(2)
        })
    );
    assert!(context.children.is_empty());
}

#[test]
fn unresolved_event_is_skipped() {
    let interceptor = interceptor(vec![InterceptorRule::new(Timing::Start, 5)]);
    let host = FakeHost::new();
    let mut context = FakeContext::top_level();

    let result = interceptor.try_intercept(&mut context, &host, EventId::NONE, Timing::Start);

    assert_eq!(result, Interception::Skipped(SkipReason::MissingEvent));
}

#[test]
fn no_matching_rule_is_skipped() {
    let interceptor = interceptor(vec![InterceptorRule::new(Timing::Start, 5).with_tag("aaa")]);
    let host = FakeHost::new().with_event(1, None, 1);
    let mut context = FakeContext::top_level();

    let result = interceptor.try_intercept(&mut context, &host, EventId::new(1), Timing::Start);

    assert_eq!(result, Interception::Skipped(SkipReason::NoMatchingRule));
    assert!(!result.is_dispatched());
}

#[test]
fn dangling_common_event_disables_rule_without_fallthrough() {
    let interceptor = interceptor(vec![
        InterceptorRule::new(Timing::Start, 99),
        InterceptorRule::new(Timing::Start, 5),
    ]);
    let host = FakeHost::new().with_event(1, None, 1);
    let mut context = FakeContext::top_level();

    let result = interceptor.try_intercept(&mut context, &host, EventId::new(1), Timing::Start);

    assert_eq!(
        result,
        Interception::Skipped(SkipReason::MissingCommonEvent {
            rule_index: 0,
            common_event_id: CommonEventId::new(99),
        })
    );
    assert!(context.children.is_empty());
}

#[test]
fn parallel_flag_comes_from_context() {
    let interceptor = interceptor(vec![
        InterceptorRule::new(Timing::Start, 5).skip_parallel(),
        InterceptorRule::new(Timing::Start, 6),
    ]);
    let host = FakeHost::new().with_event(1, None, 1);
    let mut context = FakeContext {
        primary: false,
        ..FakeContext::top_level()
    };

    let result = interceptor.try_intercept(&mut context, &host, EventId::new(1), Timing::Start);

    assert_eq!(
        result,
        Interception::Dispatched {
            rule_index: 1,
            common_event_id: CommonEventId::new(6),
        }
    );
}

#[test]
fn empty_rule_table_never_dispatches() {
    let interceptor = Interceptor::default();
    let host = FakeHost::new().with_event(1, Some("aaa"), 1);
    let mut context = FakeContext::top_level();

    for timing in [Timing::Start, Timing::Finish] {
        let result = interceptor.try_intercept(&mut context, &host, EventId::new(1), timing);
        assert_eq!(result, Interception::Skipped(SkipReason::NoMatchingRule));
    }
    assert_eq!(interceptor.tag_name(), "EvTp");
}
