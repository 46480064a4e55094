#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

/// Full press-drag-release gesture with the given tool.
fn drag(core: &mut EngineCore, tool: Tool, from: Point, to: &[Point]) -> ShapeId {
    core.set_tool(tool);
    let actions = core.on_pointer_down(from, Button::Primary);
    let id = actions
        .iter()
        .find_map(|a| match a {
            Action::ShapeCreated(s) => Some(s.id),
            _ => None,
        })
        .unwrap();
    for p in to {
        core.on_pointer_move(*p);
    }
    core.on_pointer_up(to.last().copied().unwrap_or(from), Button::Primary);
    id
}

fn populated() -> EngineCore {
    let mut core = EngineCore::new();
    drag(&mut core, Tool::Rectangle, pt(10.0, 10.0), &[pt(60.0, 40.0)]);
    drag(&mut core, Tool::Circle, pt(200.0, 200.0), &[pt(230.0, 240.0)]);
    drag(&mut core, Tool::Arrow, pt(300.0, 300.0), &[pt(350.0, 320.0)]);
    drag(&mut core, Tool::Scribble, pt(400.0, 100.0), &[pt(405.0, 102.0), pt(410.0, 110.0)]);
    core
}

// =============================================================
// Construction and defaults
// =============================================================

#[test]
fn core_new_is_empty_and_idle() {
    let core = EngineCore::new();
    assert!(core.shapes.is_empty());
    assert!(core.selection().is_none());
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(core.ui.tool, Tool::Select);
    assert_eq!(core.width, CANVAS_WIDTH);
    assert_eq!(core.height, CANVAS_HEIGHT);
    assert_eq!(core.revision(), 0);
}

#[test]
fn set_fill_applies_to_new_shapes() {
    let mut core = EngineCore::new();
    core.set_fill("#ff8800");
    let id = drag(&mut core, Tool::Rectangle, pt(0.0, 0.0), &[]);
    assert_eq!(core.shape(&id).map(|s| s.fill.as_str()), Some("#ff8800"));
}

// =============================================================
// Begin shape
// =============================================================

#[test]
fn begin_rectangle_uses_default_size() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    let actions = core.on_pointer_down(pt(5.0, 6.0), Button::Primary);
    assert!(has_action(&actions, |a| matches!(a, Action::ShapeCreated(_))));
    assert!(has_render_needed(&actions));
    let shape = &core.shapes.list(ShapeKind::Rectangle)[0];
    assert_eq!(
        shape.geometry,
        Geometry::Rectangle { x: 5.0, y: 6.0, width: DEFAULT_RECT_SIZE, height: DEFAULT_RECT_SIZE }
    );
    assert!(core.input.is_painting());
}

#[test]
fn begin_circle_uses_default_radius() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Circle);
    core.on_pointer_down(pt(5.0, 6.0), Button::Primary);
    assert_eq!(
        core.shapes.list(ShapeKind::Circle)[0].geometry,
        Geometry::Circle { x: 5.0, y: 6.0, radius: DEFAULT_CIRCLE_RADIUS }
    );
}

#[test]
fn begin_arrow_and_scribble_seed_points() {
    let mut core = EngineCore::new();
    drag(&mut core, Tool::Arrow, pt(1.0, 2.0), &[]);
    drag(&mut core, Tool::Scribble, pt(3.0, 4.0), &[]);
    assert_eq!(core.shapes.list(ShapeKind::Arrow)[0].geometry, Geometry::Arrow { points: vec![1.0, 2.0, 1.0, 2.0] });
    assert_eq!(core.shapes.list(ShapeKind::Scribble)[0].geometry, Geometry::Scribble { points: vec![3.0, 4.0] });
}

#[test]
fn non_primary_buttons_do_nothing() {
    for button in [Button::Middle, Button::Secondary] {
        let mut core = EngineCore::new();
        core.set_tool(Tool::Rectangle);
        assert!(core.on_pointer_down(pt(0.0, 0.0), button).is_empty(), "{button:?}");
        assert!(core.shapes.is_empty());
        assert!(!core.input.is_painting());

        drag(&mut core, Tool::Rectangle, pt(10.0, 10.0), &[pt(30.0, 30.0)]);
        core.set_tool(Tool::Select);
        assert!(core.on_pointer_down(pt(20.0, 20.0), button).is_empty(), "{button:?}");
        assert_eq!(core.selection(), None);
    }
}

#[test]
fn creation_bumps_revision() {
    let mut core = EngineCore::new();
    drag(&mut core, Tool::Circle, pt(0.0, 0.0), &[pt(1.0, 1.0)]);
    assert!(core.revision() >= 2);
}

// =============================================================
// Update shape
// =============================================================

#[test]
fn circle_radius_is_distance_from_anchor() {
    let mut core = EngineCore::new();
    let id = drag(&mut core, Tool::Circle, pt(50.0, 50.0), &[pt(80.0, 90.0)]);
    assert!(matches!(core.shape(&id).unwrap().geometry, Geometry::Circle { radius, .. } if radius == 50.0));
}

#[test]
fn rectangle_resizes_without_clamping() {
    let mut core = EngineCore::new();
    let id = drag(&mut core, Tool::Rectangle, pt(100.0, 100.0), &[pt(150.0, 130.0), pt(80.0, 60.0)]);
    assert_eq!(
        core.shape(&id).unwrap().geometry,
        Geometry::Rectangle { x: 100.0, y: 100.0, width: -20.0, height: -40.0 }
    );
}

#[test]
fn arrow_replaces_its_end_point() {
    let mut core = EngineCore::new();
    let id = drag(&mut core, Tool::Arrow, pt(0.0, 0.0), &[pt(10.0, 10.0), pt(20.0, 5.0)]);
    assert_eq!(core.shape(&id).unwrap().geometry, Geometry::Arrow { points: vec![0.0, 0.0, 20.0, 5.0] });
}

#[test]
fn scribble_appends_each_move() {
    let mut core = EngineCore::new();
    let id = drag(&mut core, Tool::Scribble, pt(0.0, 0.0), &[pt(1.0, 1.0), pt(2.0, 3.0)]);
    assert_eq!(
        core.shape(&id).unwrap().geometry,
        Geometry::Scribble { points: vec![0.0, 0.0, 1.0, 1.0, 2.0, 3.0] }
    );
}

#[test]
fn move_only_updates_current_shape() {
    let mut core = EngineCore::new();
    let first = drag(&mut core, Tool::Circle, pt(0.0, 0.0), &[pt(3.0, 4.0)]);
    let before = core.shape(&first).cloned();
    drag(&mut core, Tool::Circle, pt(100.0, 100.0), &[pt(110.0, 100.0)]);
    assert_eq!(core.shape(&first).cloned(), before);
}

#[test]
fn move_while_idle_is_noop() {
    let mut core = populated();
    let snapshot = core.shapes.clone();
    assert!(core.on_pointer_move(pt(1.0, 1.0)).is_empty());
    assert_eq!(core.shapes, snapshot);
}

#[test]
fn pointer_up_ends_painting() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Scribble);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary);
    core.on_pointer_up(pt(0.0, 0.0), Button::Primary);
    assert!(matches!(core.input, InputState::Idle));
    core.on_pointer_move(pt(5.0, 5.0));
    assert_eq!(core.shapes.list(ShapeKind::Scribble)[0].geometry, Geometry::Scribble { points: vec![0.0, 0.0] });
}

// =============================================================
// Select / drag
// =============================================================

#[test]
fn click_selects_topmost_shape() {
    let mut core = populated();
    let circle_id = core.shapes.list(ShapeKind::Circle)[0].id;
    core.set_tool(Tool::Select);
    let actions = core.on_pointer_down(pt(200.0, 200.0), Button::Primary);
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(Some(circle_id))));
    assert_eq!(core.selection(), Some(circle_id));
}

#[test]
fn click_background_clears_selection() {
    let mut core = populated();
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary);
    core.on_pointer_up(pt(20.0, 20.0), Button::Primary);
    assert!(core.selection().is_some());

    let actions = core.on_pointer_down(pt(790.0, 590.0), Button::Primary);
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
}

#[test]
fn reselecting_same_shape_emits_nothing() {
    let mut core = populated();
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary);
    core.on_pointer_up(pt(20.0, 20.0), Button::Primary);
    assert!(core.on_pointer_down(pt(21.0, 21.0), Button::Primary).is_empty());
}

#[test]
fn select_drag_moves_shape() {
    let mut core = populated();
    let rect_id = core.shapes.list(ShapeKind::Rectangle)[0].id;
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary);
    let actions = core.on_pointer_move(pt(25.0, 30.0));
    assert!(has_action(&actions, |a| matches!(a, Action::ShapeUpdated(s) if s.id == rect_id)));
    core.on_pointer_up(pt(25.0, 30.0), Button::Primary);
    assert!(matches!(
        core.shape(&rect_id).unwrap().geometry,
        Geometry::Rectangle { x, y, .. } if x == 15.0 && y == 20.0
    ));
}

// =============================================================
// Undo
// =============================================================

#[test]
fn undo_removes_last_of_active_tool_only() {
    let mut core = populated();
    let second = drag(&mut core, Tool::Circle, pt(500.0, 500.0), &[]);
    let arrows_before = core.shapes.list(ShapeKind::Arrow).to_vec();

    let actions = core.undo();
    assert!(has_action(&actions, |a| *a == Action::ShapeRemoved { id: second }));
    assert_eq!(core.shapes.count(ShapeKind::Circle), 1);
    assert_eq!(core.shapes.count(ShapeKind::Rectangle), 1);
    assert_eq!(core.shapes.list(ShapeKind::Arrow), arrows_before.as_slice());
}

#[test]
fn undo_is_keyed_to_tool_not_chronology() {
    let mut core = EngineCore::new();
    let rect = drag(&mut core, Tool::Rectangle, pt(0.0, 0.0), &[]);
    drag(&mut core, Tool::Scribble, pt(50.0, 50.0), &[]);
    core.set_tool(Tool::Rectangle);
    core.undo();
    assert!(core.shape(&rect).is_none());
    assert_eq!(core.shapes.count(ShapeKind::Scribble), 1);
}

#[test]
fn undo_on_empty_list_is_noop() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Arrow);
    let rev = core.revision();
    assert!(core.undo().is_empty());
    assert_eq!(core.revision(), rev);
}

#[test]
fn undo_with_select_tool_is_noop() {
    let mut core = populated();
    core.set_tool(Tool::Select);
    let total = core.shapes.len();
    assert!(core.undo().is_empty());
    assert_eq!(core.shapes.len(), total);
}

#[test]
fn undo_of_selected_shape_clears_selection() {
    let mut core = EngineCore::new();
    let id = drag(&mut core, Tool::Rectangle, pt(0.0, 0.0), &[pt(40.0, 40.0)]);
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    core.on_pointer_up(pt(10.0, 10.0), Button::Primary);
    assert_eq!(core.selection(), Some(id));

    core.set_tool(Tool::Rectangle);
    let actions = core.undo();
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
}

// =============================================================
// Export
// =============================================================

#[test]
fn export_empty_canvas_still_produces_data_url() {
    let core = EngineCore::new();
    let image = core.export().unwrap();
    assert_eq!(image.file_name, "image.png");
    assert!(image.data_url.starts_with("data:image/png;base64,"));
}

#[test]
fn export_populated_canvas() {
    let core = populated();
    let image = core.export().unwrap();
    assert!(image.data_url.len() > "data:image/png;base64,".len());
    assert!(!image.png.is_empty());
}

// =============================================================
// Submit: serialize / apply response
// =============================================================

#[test]
fn doodle_text_has_one_line_per_shape() {
    let core = populated();
    let text = core.doodle_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "10,10,RECTANGLE");
    assert_eq!(lines[1], "200,200,CIRCLE");
    assert_eq!(lines[2], "300,300,350,320,ARROW");
    assert!(lines[3].ends_with(",SCRIBBLE"));
}

#[test]
fn echo_response_restores_counts_with_new_ids() {
    let mut core = populated();
    let before_ids: Vec<ShapeId> = core.shapes.iter().map(|s| s.id).collect();
    let text = core.doodle_text();
    core.apply_doodle_response(&text).unwrap();

    for kind in ShapeKind::ALL {
        assert_eq!(core.shapes.count(kind), 1);
    }
    assert!(core.shapes.iter().all(|s| !before_ids.contains(&s.id)));
    assert!(matches!(
        core.shapes.list(ShapeKind::Circle)[0].geometry,
        Geometry::Circle { x, y, radius } if x == 200.0 && y == 200.0 && radius == DEFAULT_CIRCLE_RADIUS
    ));
}

#[test]
fn response_circle_takes_current_fill_and_default_radius() {
    let mut core = EngineCore::new();
    drag(&mut core, Tool::Circle, pt(10.0, 20.0), &[pt(110.0, 20.0)]);
    core.set_fill("#00ff00");
    core.apply_doodle_response("10,20,CIRCLE").unwrap();
    let circle = &core.shapes.list(ShapeKind::Circle)[0];
    assert_eq!(circle.fill, "#00ff00");
    assert_eq!(circle.geometry, Geometry::Circle { x: 10.0, y: 20.0, radius: 20.0 });
}

#[test]
fn response_replaces_all_lists() {
    let mut core = populated();
    core.apply_doodle_response("1,1,SCRIBBLE").unwrap();
    assert_eq!(core.shapes.len(), 1);
    assert_eq!(core.shapes.count(ShapeKind::Scribble), 1);
}

#[test]
fn response_clears_selection_and_gesture() {
    let mut core = populated();
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(20.0, 20.0), Button::Primary);
    assert!(core.selection().is_some());

    let actions = core.apply_doodle_response("").unwrap();
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
    assert!(matches!(core.input, InputState::Idle));
    assert!(core.shapes.is_empty());
}

#[test]
fn malformed_response_leaves_state_unchanged() {
    let mut core = populated();
    let snapshot = core.shapes.clone();
    let rev = core.revision();
    assert!(core.apply_doodle_response("1,2,CIRCLE\nnonsense").is_err());
    assert_eq!(core.shapes, snapshot);
    assert_eq!(core.revision(), rev);
}
