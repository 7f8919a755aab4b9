use std::sync::Once;

use streamwatch_core::{reconcile, Action, BroadcastCandidate, LiveSet};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

fn candidate(id: &str) -> BroadcastCandidate {
    BroadcastCandidate {
        id: id.to_string(),
        game_id: "5093".to_string(),
        game_name: "Diddy Kong Racing DS".to_string(),
        title: format!("speedrun session {id}"),
        tags: vec!["speedrun".to_string()],
        broadcaster: format!("runner_{id}"),
        thumbnail_url: String::new(),
    }
}

/// Applies a batch of actions the way the monitoring loop does, with every
/// sink call succeeding: posts are confirmed with a fresh handle, retracts
/// remove their entry.
fn apply_all(live: &mut LiveSet, actions: Vec<Action>, next_handle: &mut u64) {
    for action in actions {
        match action {
            Action::Post(c) => {
                *next_handle += 1;
                live.insert(c.id, next_handle.to_string());
            }
            Action::Retract { stream_id, .. } => {
                live.remove(&stream_id);
            }
        }
    }
}

#[test]
fn newly_live_stream_emits_single_post() {
    init_logging();
    let live = LiveSet::new();
    let polled = vec![candidate("a")];

    let actions = reconcile(&live, &polled);
    assert_eq!(actions, vec![Action::Post(candidate("a"))]);
}

#[test]
fn unchanged_poll_emits_nothing() {
    init_logging();
    let mut live = LiveSet::new();
    let mut handle = 0;
    let polled = vec![candidate("a"), candidate("b")];

    let actions = reconcile(&live, &polled);
    apply_all(&mut live, actions, &mut handle);
    let before = live.clone();

    let actions = reconcile(&live, &polled);
    assert!(actions.is_empty());
    assert_eq!(live, before);
}

#[test]
fn continuously_live_stream_is_posted_exactly_once() {
    init_logging();
    let mut live = LiveSet::new();
    let mut handle = 0;
    let mut posts = 0;

    for _ in 0..5 {
        let polled = vec![candidate("a")];
        let actions = reconcile(&live, &polled);
        posts += actions
            .iter()
            .filter(|a| matches!(a, Action::Post(_)))
            .count();
        apply_all(&mut live, actions, &mut handle);
    }

    assert_eq!(posts, 1);
    assert_eq!(live.len(), 1);
}

#[test]
fn title_change_does_not_repost() {
    init_logging();
    let mut live = LiveSet::new();
    let mut handle = 0;
    let actions = reconcile(&live, &[candidate("a")]);
    apply_all(&mut live, actions, &mut handle);

    let mut renamed = candidate("a");
    renamed.title = "completely different title".to_string();

    assert!(reconcile(&live, &[renamed]).is_empty());
}

#[test]
fn absent_stream_is_retracted_once_and_removed() {
    init_logging();
    let mut live = LiveSet::new();
    live.insert("a".to_string(), "msg-1".to_string());

    let actions = reconcile(&live, &[]);
    assert_eq!(
        actions,
        vec![Action::Retract {
            stream_id: "a".to_string(),
            handle: "msg-1".to_string(),
        }]
    );

    let mut handle = 0;
    apply_all(&mut live, actions, &mut handle);
    assert!(live.is_empty());

    // The following poll has nothing left to retract.
    assert!(reconcile(&live, &[]).is_empty());
}

#[test]
fn reappearance_after_gap_is_a_new_session() {
    init_logging();
    let mut live = LiveSet::new();
    let mut handle = 0;

    // Poll 1: live.
    let actions = reconcile(&live, &[candidate("x")]);
    assert_eq!(actions.len(), 1);
    apply_all(&mut live, actions, &mut handle);
    let first_handle = live.entries().next().unwrap().handle;

    // Poll 2: absent.
    let actions = reconcile(&live, &[]);
    assert!(matches!(actions[0], Action::Retract { .. }));
    apply_all(&mut live, actions, &mut handle);

    // Poll 3: live again, posted with an independent handle.
    let actions = reconcile(&live, &[candidate("x")]);
    assert_eq!(actions, vec![Action::Post(candidate("x"))]);
    apply_all(&mut live, actions, &mut handle);
    let second_handle = live.entries().next().unwrap().handle;

    assert_ne!(first_handle, second_handle);
}

#[test]
fn mixed_delta_posts_and_retracts_disjoint_ids() {
    init_logging();
    let mut live = LiveSet::new();
    live.insert("stale".to_string(), "msg-1".to_string());
    live.insert("kept".to_string(), "msg-2".to_string());

    let polled = vec![candidate("kept"), candidate("fresh")];
    let actions = reconcile(&live, &polled);

    assert_eq!(
        actions,
        vec![
            Action::Post(candidate("fresh")),
            Action::Retract {
                stream_id: "stale".to_string(),
                handle: "msg-1".to_string(),
            },
        ]
    );
}

#[test]
fn duplicate_ids_in_one_poll_emit_a_single_post() {
    init_logging();
    let mut live = LiveSet::new();
    let polled = vec![candidate("a"), candidate("b"), candidate("a")];

    let actions = reconcile(&live, &polled);
    assert_eq!(
        actions,
        vec![Action::Post(candidate("a")), Action::Post(candidate("b"))]
    );

    // Applying the batch leaves one entry per stream, so no handle is
    // overwritten and orphaned.
    let mut handle = 0;
    apply_all(&mut live, actions, &mut handle);
    assert_eq!(live.len(), 2);
}

#[test]
fn failed_post_is_retried_next_poll() {
    init_logging();
    let mut live = LiveSet::new();

    // Poll 1: post emitted but the sink failed, so nothing was inserted.
    let actions = reconcile(&live, &[candidate("a")]);
    assert_eq!(actions.len(), 1);

    // Poll 2: still absent from the live set, posted again.
    let actions = reconcile(&live, &[candidate("a")]);
    assert_eq!(actions, vec![Action::Post(candidate("a"))]);

    let mut handle = 0;
    apply_all(&mut live, actions, &mut handle);
    assert!(live.contains("a"));
}
