//! End-to-end interception scenarios driven through the reference runtime

use event_interceptor::{
    Command, CommandKind, CommonEvent, CommonEventId, Database, EventData, EventId, EventPage,
    Interceptor, InterceptorConfig, InterceptorRule, MapData, MapId, PageConditions, Session,
    Timing, TraceEntry, TraceRecord, Trigger,
};
use std::sync::Arc;

fn common_events() -> Vec<CommonEvent> {
    vec![
        CommonEvent::new(5, vec![Command::text(0, "routine 5")]),
        CommonEvent::new(6, vec![Command::text(0, "routine 6")]),
    ]
}

fn session_with(events: Vec<EventData>, rules: Vec<InterceptorRule>) -> Session {
    let database = Database::new(common_events(), vec![MapData::new(1, events)]);
    let interceptor = Interceptor::new(InterceptorConfig::with_rules(rules));
    Session::new(Arc::new(database), interceptor, MapId::new(1)).unwrap()
}

fn run(session: &mut Session, event_id: u32) -> Vec<TraceEntry> {
    session.start_event(EventId::new(event_id)).unwrap();
    session.run_until_idle(20);
    session.take_trace()
}

fn dispatched(trace: &[TraceEntry]) -> Vec<(Timing, CommonEventId)> {
    trace
        .iter()
        .filter_map(|entry| match entry.record {
            TraceRecord::Intercepted {
                timing,
                common_event_id,
                ..
            } => Some((timing, common_event_id)),
            _ => None,
        })
        .collect()
}

fn text_depths(trace: &[TraceEntry]) -> Vec<(&str, u32)> {
    trace
        .iter()
        .filter_map(|entry| entry.text().map(|text| (text, entry.depth)))
        .collect()
}

fn scenario_rule() -> InterceptorRule {
    InterceptorRule::new(Timing::Start, 5).with_tag("aaa")
}

fn tagged_event(id: u32, tag: Option<&str>) -> EventData {
    let event = EventData::new(
        id,
        vec![EventPage::new(Trigger::Action, vec![Command::text(0, "own")])],
    );
    match tag {
        Some(tag) => event.with_meta("EvTp", tag),
        None => event,
    }
}

#[test]
fn scenario_a_tagged_event_runs_routine_as_child() {
    let mut session = session_with(vec![tagged_event(1, Some("aaa"))], vec![scenario_rule()]);

    let trace = run(&mut session, 1);

    assert_eq!(dispatched(&trace), vec![(Timing::Start, CommonEventId::new(5))]);
    assert_eq!(text_depths(&trace), vec![("routine 5", 1), ("own", 0)]);
    let routine = trace
        .iter()
        .find(|entry| entry.text() == Some("routine 5"))
        .unwrap();
    assert_eq!(routine.event_id, EventId::new(1));
}

#[test]
fn scenario_b_untagged_event_does_not_match_exact_rule() {
    let mut session = session_with(vec![tagged_event(1, None)], vec![scenario_rule()]);

    let trace = run(&mut session, 1);

    assert!(dispatched(&trace).is_empty());
    assert_eq!(text_depths(&trace), vec![("own", 0)]);
}

#[test]
fn scenario_c_sentinel_opts_out_of_untagged_finish_rule() {
    let mut session = session_with(
        vec![tagged_event(1, Some("none"))],
        vec![InterceptorRule::new(Timing::Finish, 5)],
    );

    let trace = run(&mut session, 1);

    assert!(dispatched(&trace).is_empty());
}

#[test]
fn scenario_d_page_restricted_finish_rule() {
    let page_two_only = PageConditions {
        switch: Some("second".to_string()),
        variable: None,
    };
    let event = EventData::new(
        1,
        vec![
            EventPage::new(Trigger::Action, vec![Command::text(0, "page 1")]),
            EventPage::new(Trigger::Action, vec![Command::text(0, "page 2")])
                .with_conditions(page_two_only),
        ],
    );
    let mut session = session_with(
        vec![event],
        vec![InterceptorRule::new(Timing::Finish, 6).on_page(2)],
    );

    let trace = run(&mut session, 1);
    assert_eq!(text_depths(&trace), vec![("page 1", 0)]);
    assert!(dispatched(&trace).is_empty());

    session.set_variable("second", 1);
    session.update();
    let trace = run(&mut session, 1);
    assert_eq!(text_depths(&trace), vec![("page 2", 0), ("routine 6", 1)]);
    assert_eq!(dispatched(&trace), vec![(Timing::Finish, CommonEventId::new(6))]);
}

#[test]
fn scenario_e_routine_end_never_retriggers() {
    // Routine 5 is itself shaped like an event script with nested blocks
    let database = Database::new(
        vec![CommonEvent::new(
            5,
            vec![
                Command::new(
                    0,
                    CommandKind::If {
                        variable: "x".to_string(),
                        cmp: event_interceptor::Comparison::Equal,
                        value: 0,
                    },
                ),
                Command::text(1, "routine body"),
                Command::end(1),
                Command::new(0, CommandKind::BranchEnd),
            ],
        )],
        vec![MapData::new(1, vec![tagged_event(1, None)])],
    );
    let interceptor = Interceptor::new(InterceptorConfig::with_rules(vec![
        InterceptorRule::new(Timing::Start, 5),
        InterceptorRule::new(Timing::Finish, 5),
    ]));
    let mut session = Session::new(Arc::new(database), interceptor, MapId::new(1)).unwrap();

    let trace = run(&mut session, 1);

    assert_eq!(
        dispatched(&trace),
        vec![
            (Timing::Start, CommonEventId::new(5)),
            (Timing::Finish, CommonEventId::new(5)),
        ]
    );
    assert_eq!(
        text_depths(&trace),
        vec![("routine body", 1), ("own", 0), ("routine body", 1)]
    );
}

#[test]
fn earlier_rule_wins_over_later_matching_rule() {
    let mut session = session_with(
        vec![tagged_event(1, Some("aaa"))],
        vec![
            InterceptorRule::new(Timing::Start, 6),
            scenario_rule(),
        ],
    );

    let trace = run(&mut session, 1);

    assert_eq!(dispatched(&trace), vec![(Timing::Start, CommonEventId::new(6))]);
    assert!(trace.iter().all(|entry| entry.text() != Some("routine 5")));
}

#[test]
fn start_and_finish_rules_both_apply_to_one_run() {
    let mut session = session_with(
        vec![tagged_event(1, Some("aaa"))],
        vec![
            scenario_rule(),
            InterceptorRule::new(Timing::Finish, 6).with_tag("aaa"),
        ],
    );

    let trace = run(&mut session, 1);

    assert_eq!(
        text_depths(&trace),
        vec![("routine 5", 1), ("own", 0), ("routine 6", 1)]
    );
}

#[test]
fn dangling_routine_reference_is_silently_inert() {
    let mut session = session_with(
        vec![tagged_event(1, Some("aaa"))],
        vec![InterceptorRule::new(Timing::Start, 77).with_tag("aaa")],
    );

    let trace = run(&mut session, 1);

    assert!(dispatched(&trace).is_empty());
    assert_eq!(text_depths(&trace), vec![("own", 0)]);
}

#[test]
fn repeated_runs_intercept_every_time() {
    let mut session = session_with(vec![tagged_event(1, Some("aaa"))], vec![scenario_rule()]);

    for _ in 0..3 {
        let trace = run(&mut session, 1);
        assert_eq!(dispatched(&trace).len(), 1);
    }
}
