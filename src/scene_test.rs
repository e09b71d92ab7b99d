#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn rect_at(id: &str, x: f64, y: f64, w: f64, h: f64) -> Element {
    let mut el = Element::rectangle(Point::new(x, y));
    el.id = ElementId::new(id);
    if let Shape::Rectangle(rect) = &mut el.shape {
        rect.width = w;
        rect.height = h;
    }
    el
}

fn text_at(id: &str, x: f64, y: f64, content: &str) -> Element {
    let mut el = Element::text(Point::new(x, y));
    el.id = ElementId::new(id);
    if let Shape::Text(text) = &mut el.shape {
        text.text = content.to_owned();
    }
    el
}

// =============================================================
// ElementId
// =============================================================

#[test]
fn generated_ids_carry_kind_prefix() {
    let id = ElementId::generate(ElementKind::Measurement);
    assert!(id.as_str().starts_with("measurement-"));
}

#[test]
fn generated_ids_are_unique() {
    let a = ElementId::generate(ElementKind::Rectangle);
    let b = ElementId::generate(ElementKind::Rectangle);
    assert_ne!(a, b);
}

#[test]
fn id_display_is_raw_string() {
    assert_eq!(ElementId::new("rect-17").to_string(), "rect-17");
}

// =============================================================
// Constructors
// =============================================================

#[test]
fn rectangle_defaults() {
    let el = Element::rectangle(Point::new(50.0, 50.0));
    assert_eq!(el.kind(), ElementKind::Rectangle);
    assert_eq!(el.position(), Point::new(50.0, 50.0));
    let rect = el.as_rect().unwrap();
    assert_eq!(rect.width, 100.0);
    assert_eq!(rect.height, 80.0);
    assert_eq!(rect.fill, DEFAULT_RECT_FILL);
    assert_eq!(rect.stroke, DEFAULT_RECT_STROKE);
    assert!(el.as_text().is_none());
}

#[test]
fn text_starts_with_placeholder() {
    let el = Element::text(Point::new(1.0, 2.0));
    assert_eq!(el.kind(), ElementKind::Text);
    assert_eq!(el.as_text().unwrap().text, TEXT_PLACEHOLDER);
    assert!(el.as_rect().is_none());
}

#[test]
fn measurement_keeps_literal_value() {
    let el = Element::measurement(Point::new(0.0, 0.0), " 5.5 m ");
    assert_eq!(el.kind(), ElementKind::Measurement);
    let text = el.as_text().unwrap();
    assert_eq!(text.text, " 5.5 m ");
    assert_eq!(text.color, MEASUREMENT_COLOR);
    assert_eq!(text.font_size, MEASUREMENT_FONT_SIZE);
}

#[test]
fn kind_is_text_covers_measurements() {
    assert!(ElementKind::Text.is_text());
    assert!(ElementKind::Measurement.is_text());
    assert!(!ElementKind::Rectangle.is_text());
}

// =============================================================
// Patches
// =============================================================

#[test]
fn apply_moves_any_kind() {
    let mut el = text_at("t", 0.0, 0.0, "hi");
    assert!(el.apply(&ElementPatch::position(Point::new(4.0, 5.0))));
    assert_eq!(el.position(), Point::new(4.0, 5.0));
}

#[test]
fn apply_ignores_fields_of_other_kinds() {
    let mut el = text_at("t", 0.0, 0.0, "hi");
    let changed = el.apply(&ElementPatch { width: Some(10.0), fill: Some("#fff".into()), ..Default::default() });
    assert!(!changed);

    let mut rect = rect_at("r", 0.0, 0.0, 10.0, 10.0);
    assert!(!rect.apply(&ElementPatch::text("nope")));
}

#[test]
fn apply_clamps_negative_sizes() {
    let mut el = rect_at("r", 0.0, 0.0, 10.0, 10.0);
    el.apply(&ElementPatch { width: Some(-5.0), height: Some(-1.0), ..Default::default() });
    let rect = el.as_rect().unwrap();
    assert_eq!(rect.width, 0.0);
    assert_eq!(rect.height, 0.0);
}

#[test]
fn apply_reports_no_change_for_same_values() {
    let mut el = rect_at("r", 3.0, 4.0, 10.0, 10.0);
    assert!(!el.apply(&ElementPatch::position(Point::new(3.0, 4.0))));
}

// =============================================================
// Scene store
// =============================================================

#[test]
fn create_appends_on_top_without_touching_original() {
    let scene = Scene::new();
    let (next, id) = scene.create_element(rect_at("a", 0.0, 0.0, 1.0, 1.0));
    assert!(scene.is_empty());
    assert_eq!(next.len(), 1);
    assert_eq!(id, ElementId::new("a"));

    let (next, _) = next.create_element(text_at("b", 0.0, 0.0, "x"));
    let order: Vec<&str> = next.iter().map(|el| el.id.as_str()).collect();
    assert_eq!(order, ["a", "b"]);
}

#[test]
fn create_with_existing_id_replaces_in_place() {
    let scene = Scene::from_elements(vec![rect_at("a", 0.0, 0.0, 1.0, 1.0), text_at("b", 0.0, 0.0, "x")]);
    let (next, _) = scene.create_element(rect_at("a", 9.0, 9.0, 1.0, 1.0));
    assert_eq!(next.len(), 2);
    assert_eq!(next.elements()[0].x, 9.0);
}

#[test]
fn update_returns_patched_copy() {
    let scene = Scene::from_elements(vec![rect_at("a", 0.0, 0.0, 1.0, 1.0)]);
    let id = ElementId::new("a");
    let next = scene.update_element(&id, &ElementPatch::position(Point::new(7.0, 8.0)));
    assert_eq!(scene.get(&id).unwrap().x, 0.0);
    assert_eq!(next.get(&id).unwrap().x, 7.0);
}

#[test]
fn update_unknown_id_is_noop() {
    let scene = Scene::from_elements(vec![rect_at("a", 0.0, 0.0, 1.0, 1.0)]);
    let next = scene.update_element(&ElementId::new("zzz"), &ElementPatch::position(Point::new(7.0, 8.0)));
    assert_eq!(next, scene);
}

#[test]
fn delete_removes_listed_ids_only() {
    let scene = Scene::from_elements(vec![
        rect_at("a", 0.0, 0.0, 1.0, 1.0),
        rect_at("b", 0.0, 0.0, 1.0, 1.0),
        text_at("c", 0.0, 0.0, "x"),
    ]);
    let next = scene.delete_elements(&[ElementId::new("a"), ElementId::new("c"), ElementId::new("missing")]);
    assert_eq!(next.len(), 1);
    assert!(next.contains(&ElementId::new("b")));
    assert_eq!(scene.len(), 3);
}

#[test]
fn from_elements_drops_duplicate_ids() {
    let scene = Scene::from_elements(vec![rect_at("a", 1.0, 0.0, 1.0, 1.0), rect_at("a", 2.0, 0.0, 1.0, 1.0)]);
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.elements()[0].x, 1.0);
}

#[test]
fn first_rectangle_skips_text() {
    let scene = Scene::from_elements(vec![text_at("t", 0.0, 0.0, "x"), rect_at("r", 0.0, 0.0, 1.0, 1.0)]);
    assert_eq!(scene.first_rectangle().unwrap().id, ElementId::new("r"));
    assert!(Scene::new().first_rectangle().is_none());
}

// =============================================================
// Wire format
// =============================================================

#[test]
fn rectangle_serializes_with_wire_names() {
    let scene = Scene::from_elements(vec![rect_at("rect-1", 10.0, 20.0, 100.0, 80.0)]);
    let value = serde_json::to_value(&scene).unwrap();
    assert_eq!(
        value,
        json!([{
            "id": "rect-1",
            "type": "rectangle",
            "x": 10.0,
            "y": 20.0,
            "width": 100.0,
            "height": 80.0,
            "fill": DEFAULT_RECT_FILL,
            "stroke": DEFAULT_RECT_STROKE,
            "strokeWidth": 2.0,
        }])
    );
}

#[test]
fn text_serializes_color_as_fill() {
    let scene = Scene::from_elements(vec![text_at("text-1", 1.0, 2.0, "hello")]);
    let value = serde_json::to_value(&scene).unwrap();
    assert_eq!(
        value,
        json!([{
            "id": "text-1",
            "type": "text",
            "x": 1.0,
            "y": 2.0,
            "text": "hello",
            "fontSize": 16.0,
            "fill": "#000",
        }])
    );
}

#[test]
fn parses_stored_payload_with_integer_coordinates() {
    let raw = r##"[
        {"id":"rect-1712","type":"rectangle","x":120,"y":80,"width":100,"height":80,
         "fill":"#f03e3e33","stroke":"#f03e3e","strokeWidth":2},
        {"id":"measurement-1713","type":"measurement","x":170,"y":60,"text":"5m","fontSize":14,"fill":"#e03131"}
    ]"##;
    let scene = Scene::from_json(raw).unwrap();
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.elements()[0].as_rect().unwrap().stroke, "#f03e3e");
    assert_eq!(scene.elements()[1].kind(), ElementKind::Measurement);
    assert_eq!(scene.elements()[1].as_text().unwrap().text, "5m");

    let again = Scene::from_json(&scene.to_json().unwrap()).unwrap();
    assert_eq!(again, scene);
}

#[test]
fn parse_fills_missing_style_with_defaults() {
    let raw = r#"[{"id":"r","type":"rectangle","x":0,"y":0,"width":5,"height":5}]"#;
    let scene = Scene::from_json(raw).unwrap();
    let rect = scene.elements()[0].as_rect().unwrap();
    assert_eq!(rect.stroke_width, DEFAULT_STROKE_WIDTH);
    assert_eq!(rect.fill, DEFAULT_RECT_FILL);
}

#[test]
fn parse_rejects_unknown_kind() {
    let raw = r#"[{"id":"c","type":"circle","x":0,"y":0}]"#;
    assert!(Scene::from_json(raw).is_err());
}

#[test]
fn parse_rejects_non_array() {
    assert!(Scene::from_json(r#"{"elements":[]}"#).is_err());
    assert!(Scene::from_json("not json").is_err());
}

#[test]
fn parse_clamps_negative_rectangle_size() {
    let raw = r#"[{"id":"r","type":"rectangle","x":0,"y":0,"width":-5,"height":5}]"#;
    let scene = Scene::from_json(raw).unwrap();
    assert_eq!(scene.elements()[0].as_rect().unwrap().width, 0.0);
}
