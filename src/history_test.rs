use super::*;
use crate::scene::{Element, ElementId, Scene};
use crate::viewport::Point;

/// A scene holding `n` rectangles with deterministic ids, so snapshots are
/// distinguishable by length and content.
fn scene_of(n: usize) -> Scene {
    let elements = (0..n)
        .map(|i| {
            let mut el = Element::rectangle(Point::new(0.0, 0.0));
            el.id = ElementId::new(format!("r{i}"));
            el
        })
        .collect();
    Scene::from_elements(elements)
}

fn history_with(len: usize) -> History {
    let mut h = History::new(scene_of(0));
    for i in 1..len {
        h.commit(scene_of(i));
    }
    h
}

#[test]
fn new_history_has_single_entry() {
    let h = History::default();
    assert_eq!(h.len(), 1);
    assert_eq!(h.step(), 0);
    assert!(!h.is_empty());
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn commit_moves_to_newest() {
    let mut h = History::new(scene_of(0));
    h.commit(scene_of(1));
    assert_eq!(h.len(), 2);
    assert_eq!(h.step(), 1);
    assert_eq!(h.current(), &scene_of(1));
}

#[test]
fn current_always_matches_last_commit() {
    let mut h = History::new(scene_of(0));
    for i in 1..120 {
        h.commit(scene_of(i % 7));
        assert_eq!(h.current(), &scene_of(i % 7));
        assert!(h.len() <= HISTORY_CAPACITY);
    }
}

#[test]
fn capacity_drops_oldest() {
    let mut h = history_with(HISTORY_CAPACITY + 5);
    assert_eq!(h.len(), HISTORY_CAPACITY);
    assert_eq!(h.step(), HISTORY_CAPACITY - 1);

    while h.undo() {}
    assert_eq!(h.current(), &scene_of(5));
}

#[test]
fn undo_and_redo_walk_the_list() {
    let mut h = history_with(3);
    assert!(h.undo());
    assert_eq!(h.current(), &scene_of(1));
    assert!(h.redo());
    assert_eq!(h.current(), &scene_of(2));
}

#[test]
fn undo_then_redo_restores_state() {
    let mut h = history_with(4);
    let before = h.current().clone();
    h.undo();
    h.redo();
    assert_eq!(h.current(), &before);
}

#[test]
fn undo_at_start_is_noop() {
    let mut h = History::new(scene_of(0));
    assert!(!h.undo());
    assert_eq!(h.step(), 0);
}

#[test]
fn redo_at_end_is_noop() {
    let mut h = history_with(2);
    assert!(!h.redo());
    assert_eq!(h.step(), 1);
}

#[test]
fn commit_after_undo_truncates_redo_branch() {
    // [h0,h1,h2,h3,h4] at step 2, commit S -> [h0,h1,h2,S] at step 3.
    let mut h = history_with(5);
    h.undo();
    h.undo();
    assert_eq!(h.step(), 2);

    let s = scene_of(9);
    h.commit(s.clone());
    assert_eq!(h.len(), 4);
    assert_eq!(h.step(), 3);
    assert_eq!(h.current(), &s);
    assert!(!h.can_redo());
    assert!(h.undo());
    assert_eq!(h.current(), &scene_of(2));
}

#[test]
fn with_capacity_never_below_one() {
    let mut h = History::with_capacity(scene_of(0), 0);
    h.commit(scene_of(1));
    assert_eq!(h.len(), 1);
    assert_eq!(h.current(), &scene_of(1));
}

#[test]
fn reset_discards_everything() {
    let mut h = history_with(6);
    h.reset(scene_of(2));
    assert_eq!(h.len(), 1);
    assert_eq!(h.step(), 0);
    assert_eq!(h.current(), &scene_of(2));
}
