use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ancora_core::config::Config;
use ancora_core::rule::{MatchBy, Rule};
use ancora_core::{EngineEvent, Rect};

use super::cycle::{movement_event, select_rule, with_retry};
use super::{Keeper, interval_for};

fn title_rule(name: &str, pattern: &str, monitor: usize) -> Rule {
    Rule {
        name: name.into(),
        title_pattern: pattern.into(),
        monitor: Some(monitor),
        ..Rule::default()
    }
}

// -- select_rule --

#[test]
fn first_matching_rule_in_order_wins() {
    let rules = vec![
        title_rule("a", "*notepad*", 0),
        title_rule("b", "*", 1),
    ];

    let rule = select_rule(&rules, 1, "Untitled - Notepad", String::new).unwrap();
    assert_eq!(rule.name, "a");

    let rule = select_rule(&rules, 1, "Calculator", String::new).unwrap();
    assert_eq!(rule.name, "b");
}

#[test]
fn handle_rules_beat_pattern_rules_regardless_of_order() {
    let mut captured = title_rule("captured", "*no match*", 1);
    captured.handle = Some(42);
    let rules = vec![title_rule("pattern", "*", 0), captured];

    let rule = select_rule(&rules, 42, "anything", String::new).unwrap();
    assert_eq!(rule.name, "captured");

    // Other handles fall through to the pattern rule.
    let rule = select_rule(&rules, 7, "anything", String::new).unwrap();
    assert_eq!(rule.name, "pattern");
}

#[test]
fn inactive_and_targetless_rules_never_match() {
    let mut inactive = title_rule("inactive", "*", 0);
    inactive.active = false;
    let mut targetless = title_rule("targetless", "*", 0);
    targetless.monitor = None;
    let rules = vec![inactive, targetless];

    assert!(select_rule(&rules, 1, "anything", String::new).is_none());
}

#[test]
fn process_lookup_runs_at_most_once() {
    let rules = vec![
        Rule {
            name: "p1".into(),
            process_pattern: "firefox".into(),
            match_by: MatchBy::Process,
            monitor: Some(0),
            ..Rule::default()
        },
        Rule {
            name: "p2".into(),
            process_pattern: "notepad".into(),
            match_by: MatchBy::Process,
            monitor: Some(1),
            ..Rule::default()
        },
    ];

    let mut lookups = 0;
    let rule = select_rule(&rules, 1, "ignored", || {
        lookups += 1;
        "notepad".into()
    })
    .unwrap();
    assert_eq!(rule.name, "p2");
    assert_eq!(lookups, 1);
}

#[test]
fn title_rules_never_trigger_a_process_lookup() {
    let rules = vec![title_rule("t", "*calc*", 0)];
    let rule = select_rule(&rules, 1, "Calculator", || {
        panic!("process name should not be resolved")
    });
    assert!(rule.is_some());
}

// -- movement tracking --

#[test]
fn movement_fires_only_when_the_rect_changed() {
    let before = Rect::new(0, 0, 800, 600);
    let after = Rect::new(40, 0, 800, 600);

    // First sighting establishes the baseline silently.
    assert!(movement_event(None, before, 1, "t").is_none());
    // Unchanged rect stays silent.
    assert!(movement_event(Some(before), before, 1, "t").is_none());

    let event = movement_event(Some(before), after, 1, "t").unwrap();
    assert_eq!(
        event,
        EngineEvent::Moved {
            handle: 1,
            title: "t".into(),
            rect: after,
        }
    );
}

// -- retries --

#[test]
fn transient_failure_is_retried_until_it_resolves() {
    let mut calls = 0;
    let result = with_retry(3, Duration::ZERO, || {
        calls += 1;
        if calls < 3 { Err("transient") } else { Ok(calls) }
    });
    assert_eq!(result, Some(3));
}

#[test]
fn retry_gives_up_after_the_bounded_attempts() {
    let mut calls = 0;
    let result = with_retry(3, Duration::ZERO, || -> Result<(), &str> {
        calls += 1;
        Err("still broken")
    });
    assert_eq!(result, None);
    assert_eq!(calls, 3);
}

// -- scheduler cadence --

#[test]
fn dormant_mode_stretches_the_interval() {
    assert_eq!(interval_for(500, 3, false), Duration::from_millis(500));
    assert_eq!(interval_for(500, 3, true), Duration::from_millis(1500));
    assert_eq!(interval_for(200, 1, true), Duration::from_millis(200));
}

// -- lifecycle --

#[test]
fn start_and_stop_are_idempotent() {
    let (tx, _rx) = mpsc::channel();
    let mut keeper = Keeper::new(Config::default(), Arc::new(Mutex::new(Vec::new())), tx);
    assert!(!keeper.is_running());

    keeper.start();
    keeper.start(); // already running: must not spawn a second thread
    assert!(keeper.is_running());

    keeper.stop();
    assert!(!keeper.is_running());
    keeper.stop(); // already stopped: must not hang or panic
    assert!(!keeper.is_running());
}
