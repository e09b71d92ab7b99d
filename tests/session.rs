//! End-to-end editing, persistence and draft recovery through the public API.

use std::sync::Arc;
use std::time::Duration;

use sketchpad::autosave::spawn_draft_autosave;
use sketchpad::consts::AUTOSAVE_DELAY;
use sketchpad::engine::Action;
use sketchpad::input::{Button, InputEvent, Key, Modifiers, Tool};
use sketchpad::measure::Side;
use sketchpad::scene::{ElementKind, Scene};
use sketchpad::session::{SessionError, SketchSession};
use sketchpad::storage::{DraftStore, FileDraftStore, ListFilter, MemoryRepository, SketchRepository};
use sketchpad::viewport::Point;

fn init_tracing() {
    drop(tracing_subscriber::fmt().with_test_writer().try_init());
}

fn press(session: &mut SketchSession, x: f64, y: f64) -> Vec<Action> {
    session.engine_mut().handle(InputEvent::PointerDown {
        screen: Point::new(x, y),
        button: Button::Primary,
        modifiers: Modifiers::default(),
    })
}

fn release(session: &mut SketchSession, x: f64, y: f64) -> Vec<Action> {
    session.engine_mut().handle(InputEvent::PointerUp {
        screen: Point::new(x, y),
        button: Button::Primary,
        modifiers: Modifiers::default(),
    })
}

fn drag(session: &mut SketchSession, from: Point, to: Point) {
    press(session, from.x, from.y);
    session.engine_mut().handle(InputEvent::PointerMove { screen: to, modifiers: Modifiers::default() });
    release(session, to.x, to.y);
}

#[test]
fn plan_round_trips_through_repository() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(MemoryRepository::new());
    let drafts = Arc::new(FileDraftStore::new(dir.path().join("draft.json")));
    let mut session = SketchSession::new(repo.clone(), drafts.clone());
    session.engine_mut().set_surface(800.0, 600.0);

    // Rectangle, then a label on its top edge.
    session.engine_mut().set_tool(Tool::CreateRectangle);
    press(&mut session, 0.0, 0.0);
    press(&mut session, 50.0, 40.0);
    release(&mut session, 50.0, 40.0);
    session.engine_mut().set_color("#f03e3e");
    session.engine_mut().begin_measurement(Side::Top).unwrap();
    session.engine_mut().confirm_measurement("12 m").unwrap();

    // Free text, typed and confirmed.
    session.engine_mut().set_tool(Tool::CreateText);
    let actions = press(&mut session, 300.0, 300.0);
    assert!(actions.iter().any(|a| matches!(a, Action::EditTextStarted { .. })));
    session.engine_mut().set_editing_draft("Entrance");
    session.engine_mut().confirm_editing();

    // Move the rectangle.
    drag(&mut session, Point::new(50.0, 40.0), Point::new(70.0, 60.0));

    let scene = session.engine().scene().clone();
    let kinds: Vec<ElementKind> = scene.iter().map(|el| el.kind()).collect();
    assert_eq!(kinds, vec![ElementKind::Rectangle, ElementKind::Measurement, ElementKind::Text]);
    assert_eq!(scene.elements()[0].position(), Point::new(20.0, 20.0));

    session.set_name("Festival grounds");
    session.set_linked_entity(Some(11));
    let id = session.save().unwrap();

    let summaries = session.list(ListFilter::Entity(11)).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Festival grounds");

    let mut other = SketchSession::new(repo.clone(), drafts);
    other.load(id).unwrap();
    assert_eq!(other.engine().scene(), &scene);
    assert_eq!(other.meta().linked_entity_id, Some(11));

    let stored = Scene::from_json(&repo.load(id).unwrap().elements).unwrap();
    assert_eq!(stored, scene);
}

#[test]
fn undo_redo_through_keyboard() {
    init_tracing();
    let mut session = SketchSession::new(
        Arc::new(MemoryRepository::new()),
        Arc::new(sketchpad::storage::MemoryDraftStore::new()),
    );
    session.engine_mut().set_tool(Tool::CreateRectangle);
    press(&mut session, 0.0, 0.0);
    let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };

    session.engine_mut().handle(InputEvent::KeyDown { key: Key::new("z"), modifiers: ctrl });
    assert!(session.engine().scene().is_empty());
    session.engine_mut().handle(InputEvent::KeyDown { key: Key::new("y"), modifiers: ctrl });
    assert_eq!(session.engine().scene().len(), 1);
}

#[test]
fn save_without_name_touches_nothing() {
    init_tracing();
    let repo = Arc::new(MemoryRepository::new());
    let mut session = SketchSession::new(repo.clone(), Arc::new(sketchpad::storage::MemoryDraftStore::new()));
    session.engine_mut().set_tool(Tool::CreateRectangle);
    press(&mut session, 0.0, 0.0);
    assert!(matches!(session.save(), Err(SessionError::MissingName)));
    assert!(repo.list(ListFilter::All).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn autosaved_draft_is_offered_after_restart() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let drafts = Arc::new(FileDraftStore::new(dir.path().join("draft.json")));
    let repo = Arc::new(MemoryRepository::new());

    let (tx, task) = spawn_draft_autosave(drafts.clone(), AUTOSAVE_DELAY);
    let mut session = SketchSession::new(repo.clone(), drafts.clone());
    session.set_name("Unsaved plan");
    session.engine_mut().set_tool(Tool::CreateRectangle);
    let actions = press(&mut session, 10.0, 10.0);
    if actions.contains(&Action::SceneChanged) {
        assert!(session.notify_autosave(&tx));
    }

    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    tokio::time::advance(AUTOSAVE_DELAY + Duration::from_millis(1)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    drop(tx);
    task.await.unwrap();
    assert!(drafts.load().unwrap().is_some());

    // A fresh editor finds and restores the draft.
    let mut restarted = SketchSession::new(repo, drafts.clone());
    let draft = restarted.offer_draft().unwrap().unwrap();
    restarted.restore_draft(draft);
    assert_eq!(restarted.engine().scene().len(), 1);
    assert_eq!(restarted.meta().name, "Unsaved plan");

    // Saving clears it.
    restarted.save().unwrap();
    assert!(drafts.load().unwrap().is_none());
}
