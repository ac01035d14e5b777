use serde_json::json;

use swipe_deck::config::SwipeConfig;
use swipe_deck::models::{ItemKey, ItemRecord};
use swipe_deck::services::swipe::{
    reduce, CommitOutcome, DeckSession, DeckStatus, ExitTicket, PointerEvent, PointerKind,
    PointerOutcome, PointerTarget,
};

fn movie(id: i64, title: &str) -> ItemRecord {
    ItemRecord::from_value(json!({ "id": id, "title": title }))
}

fn press(session: &mut DeckSession, kind: PointerKind, pointer_id: i64, x: f64) -> PointerOutcome {
    let card_id = session.top_card().expect("deck has a top card").id();
    session
        .pointer(card_id, kind, &PointerEvent::new(pointer_id, x, 0.0), PointerTarget::Card)
        .unwrap()
}

/// Drags the top card by `dx` and releases it
fn swipe(session: &mut DeckSession, dx: f64) -> PointerOutcome {
    let card_id = session.top_card().expect("deck has a top card").id();
    let down = PointerEvent::new(1, 100.0, 100.0);
    let moved = PointerEvent::new(1, 100.0 + dx, 90.0);

    session
        .pointer(card_id, PointerKind::Down, &down, PointerTarget::Card)
        .unwrap();
    session
        .pointer(card_id, PointerKind::Move, &moved, PointerTarget::Card)
        .unwrap();
    session
        .pointer(card_id, PointerKind::Up, &moved, PointerTarget::Card)
        .unwrap()
}

/// Swipes the top card and lets its exit animation finish
fn swipe_and_finish(session: &mut DeckSession, dx: f64) -> CommitOutcome {
    match swipe(session, dx) {
        PointerOutcome::Committing { ticket, .. } => session.complete_exit(ticket),
        other => panic!("expected a commit, got {:?}", other),
    }
}

#[test]
fn test_like_then_dislike_exhausts_deck() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(1, "Playtime"), movie(2, "Mon Oncle")]);

    swipe_and_finish(&mut session, 180.0);
    assert!(!session.is_exhausted());

    let outcome = swipe_and_finish(&mut session, -180.0);
    assert_eq!(
        outcome,
        CommitOutcome::Recorded {
            sequence: 2,
            exhausted: true
        }
    );
    assert_eq!(session.status(), DeckStatus::Exhausted);

    let summary = session.summary().unwrap();
    let verdicts: Vec<(ItemKey, bool)> = summary
        .verdicts()
        .iter()
        .map(|v| (v.id.clone(), v.liked))
        .collect();
    assert_eq!(
        verdicts,
        vec![(ItemKey::Int(1), true), (ItemKey::Int(2), false)]
    );
}

#[test]
fn test_log_length_and_order_match_commits() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start((1..=5).map(|id| movie(id, "x")).collect());

    let directions = [200.0, -200.0, -150.0, 300.0, 121.0];
    for dx in directions {
        swipe_and_finish(&mut session, dx);
    }

    let entries = session.log().entries();
    assert_eq!(entries.len(), directions.len());
    let ids: Vec<Option<ItemKey>> = entries.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, (1..=5).map(|id| Some(ItemKey::Int(id))).collect::<Vec<_>>());
    let liked: Vec<bool> = entries.iter().map(|e| e.liked).collect();
    assert_eq!(liked, vec![true, false, false, true, true]);
    assert!(entries.windows(2).all(|w| w[0].sequence < w[1].sequence));
}

#[test]
fn test_repeated_id_last_action_wins() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(4, "Vertigo"), movie(4, "Vertigo (70mm)")]);

    swipe_and_finish(&mut session, -200.0);
    swipe_and_finish(&mut session, 200.0);

    let summary = session.summary().unwrap();
    assert_eq!(summary.len(), 1);
    let verdict = summary.get(&ItemKey::Int(4)).unwrap();
    assert!(verdict.liked);
    assert_eq!(verdict.item.title.as_deref(), Some("Vertigo (70mm)"));
}

#[test]
fn test_empty_batch_is_immediately_exhausted() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(Vec::new());

    assert!(session.is_exhausted());
    assert!(session.cards().is_empty());
    assert!(session.log().is_empty());
    assert!(session.summary().unwrap().is_empty());
}

#[test]
fn test_exact_threshold_is_a_snap_back() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(1, "Ikiru")]);

    let outcome = swipe(&mut session, 120.0);
    assert!(matches!(outcome, PointerOutcome::SnappedBack { .. }));
    assert!(session.log().is_empty());
    assert_eq!(session.cards().len(), 1);

    let outcome = swipe(&mut session, 120.5);
    assert!(matches!(outcome, PointerOutcome::Committing { liked: true, .. }));
}

#[test]
fn test_restart_discards_uncommitted_cards_silently() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(1, "a"), movie(2, "b"), movie(3, "c")]);
    swipe_and_finish(&mut session, 200.0);
    press(&mut session, PointerKind::Down, 1, 0.0);

    session.start(vec![movie(9, "z")]);

    assert!(session.log().is_empty());
    assert_eq!(session.cards().len(), 1);
    assert_eq!(session.status(), DeckStatus::Active);
    assert!(session.summary().is_none());
}

#[test]
fn test_duplicate_commit_appends_once() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(1, "a"), movie(2, "b")]);
    let card_id = session.top_card().unwrap().id();

    assert!(matches!(
        session.on_commit(card_id, true),
        CommitOutcome::Recorded { .. }
    ));
    assert_eq!(session.on_commit(card_id, true), CommitOutcome::Ignored);
    assert_eq!(session.log().len(), 1);
}

#[test]
fn test_second_release_during_exit_is_ignored() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(1, "a"), movie(2, "b")]);
    let card_id = session.top_card().unwrap().id();

    let ticket = match swipe(&mut session, 250.0) {
        PointerOutcome::Committing { ticket, .. } => ticket,
        other => panic!("expected a commit, got {:?}", other),
    };
    let again = session
        .pointer(card_id, PointerKind::Up, &PointerEvent::new(1, 400.0, 0.0), PointerTarget::Card)
        .unwrap();
    assert_eq!(again, PointerOutcome::Ignored);

    session.complete_exit(ticket);
    assert_eq!(session.complete_exit(ticket), CommitOutcome::Ignored);
    assert_eq!(session.log().len(), 1);
}

#[test]
fn test_ticket_for_foreign_session_is_ignored() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(1, "a")]);
    let card_id = session.top_card().unwrap().id();
    swipe(&mut session, 200.0);

    let forged = ExitTicket {
        session_id: uuid::Uuid::new_v4(),
        card_id,
    };
    assert_eq!(session.complete_exit(forged), CommitOutcome::Ignored);
    assert!(session.log().is_empty());
}

#[test]
fn test_control_press_does_not_start_drag() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(1, "a")]);
    let card_id = session.top_card().unwrap().id();

    let outcome = session
        .pointer(card_id, PointerKind::Down, &PointerEvent::new(1, 0.0, 0.0), PointerTarget::Control)
        .unwrap();
    assert_eq!(outcome, PointerOutcome::Ignored);

    let outcome = press(&mut session, PointerKind::Move, 1, 300.0);
    assert_eq!(outcome, PointerOutcome::Ignored);
}

#[test]
fn test_second_pointer_cannot_hijack_drag() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![movie(1, "a")]);

    press(&mut session, PointerKind::Down, 1, 0.0);
    assert_eq!(press(&mut session, PointerKind::Move, 2, 400.0), PointerOutcome::Ignored);
    assert_eq!(press(&mut session, PointerKind::Up, 2, 400.0), PointerOutcome::Ignored);

    press(&mut session, PointerKind::Move, 1, 30.0);
    let outcome = press(&mut session, PointerKind::LostCapture, 1, 0.0);
    assert!(matches!(outcome, PointerOutcome::SnappedBack { .. }));
}

#[test]
fn test_malformed_payload_still_records_decision() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![ItemRecord::from_value(json!(["not", "a", "movie"])), movie(2, "b")]);

    swipe_and_finish(&mut session, 200.0);
    swipe_and_finish(&mut session, 200.0);

    assert_eq!(session.log().len(), 2);
    assert_eq!(session.log().entries()[0].id, None);
    assert!(session.log().entries()[0].liked);

    let summary = session.summary().unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary, &reduce(session.log()));
}

#[test]
fn test_database_card_with_integer_runtime_gets_a_verdict() {
    let mut session = DeckSession::new(SwipeConfig::default());
    session.start(vec![
        ItemRecord::from_value(json!({
            "id": 5,
            "movie_id": 5,
            "title": "Ran",
            "runtime": 162,
            "showtimes": [{"showdate": "2026-10-22", "showtime": "6:30 PM", "cinema": "Film Forum"}]
        })),
        ItemRecord::from_value(json!({ "id": 6, "title": 404, "runtime": "98 min" })),
    ]);

    swipe_and_finish(&mut session, 200.0);
    swipe_and_finish(&mut session, -200.0);

    let summary = session.summary().unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary.get(&ItemKey::Int(5)).map(|v| v.liked), Some(true));
    assert_eq!(
        summary.get(&ItemKey::Int(5)).and_then(|v| v.item.title.as_deref()),
        Some("Ran")
    );
    assert_eq!(summary.get(&ItemKey::Int(6)).map(|v| v.liked), Some(false));
}
