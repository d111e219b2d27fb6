use piece_perfect_core::History;

#[test]
fn history_keeps_the_most_recent_states() {
    let mut history = History::new(20, 100.0);
    for i in 0..25 {
        assert!(history.save(i, i as f64 * 100.0));
    }
    assert_eq!(history.len(), 20);
    assert_eq!(history.cursor(), Some(19));
    assert_eq!(
        history.entries().copied().collect::<Vec<_>>(),
        (5..25).collect::<Vec<_>>()
    );
}

#[test]
fn undo_then_redo_returns_to_the_same_state() {
    let mut history = History::new(20, 0.0);
    for i in 0..6 {
        history.save(format!("s{i}"), i as f64);
    }
    for _ in 0..3 {
        history.undo();
    }
    assert_eq!(history.current().map(String::as_str), Some("s2"));
    assert!(history.can_redo());
    for _ in 0..3 {
        history.redo();
    }
    assert_eq!(history.current().map(String::as_str), Some("s5"));
    assert!(!history.can_redo());
    assert_eq!(history.len(), 6);
}

#[test]
fn undo_stops_at_the_first_entry() {
    let mut history = History::new(20, 0.0);
    history.save(1, 0.0);
    history.save(2, 1.0);
    assert_eq!(history.undo(), Some(&1));
    assert_eq!(history.undo(), None);
    assert_eq!(history.cursor(), Some(0));
}
