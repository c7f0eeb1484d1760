//! Tests for actor tools and drawing sessions

use tile_engine_edit::{ActionOutcome, ActorId, EditConfig, EngineError, Position, TileCatalog, TileKind, Tool, Workspace, CURSOR_EXTENT};

const LOCAL: ActorId = ActorId::LOCAL;
const STONE: TileKind = TileKind(0);
const GRASS: TileKind = TileKind(1);
/// 2x2 entry of the default catalog
const MACHINE: TileKind = TileKind(11);

fn create_workspace() -> Workspace {
    Workspace::new(
        TileCatalog::default(),
        EditConfig {
            fill_limit: 100,
            rect_limit: 50,
        },
    )
}

fn move_to(ws: &mut Workspace, id: ActorId, x: i32, y: i32) {
    ws.set_cursor(id, x as f32, y as f32).unwrap();
    ws.tick();
}

/// Draw a hollow rectangle of `kind` as the local actor.
fn draw_ring(ws: &mut Workspace, kind: TileKind, from: (i32, i32), to: (i32, i32)) {
    ws.set_active_tile(LOCAL, kind).unwrap();
    ws.set_cursor(LOCAL, from.0 as f32, from.1 as f32).unwrap();
    ws.begin_session(LOCAL, Tool::RectangleHollow).unwrap();
    ws.set_cursor(LOCAL, to.0 as f32, to.1 as f32).unwrap();
    ws.end_session(LOCAL, Some(Tool::RectangleHollow)).unwrap();
}

// ============================================================================
// Pencil / Eraser
// ============================================================================

#[test]
fn test_pencil_session_visits_cell_once() {
    let mut ws = create_workspace();

    assert_eq!(ws.begin_session(LOCAL, Tool::Pencil).unwrap(), ActionOutcome::Started(Tool::Pencil));
    move_to(&mut ws, LOCAL, 0, 0);
    move_to(&mut ws, LOCAL, 1, 0);
    move_to(&mut ws, LOCAL, 0, 0);
    move_to(&mut ws, LOCAL, 1, 0);

    assert_eq!(ws.end_session(LOCAL, Some(Tool::Pencil)).unwrap(), ActionOutcome::Committed { operations: 2 });
    assert_eq!(ws.grid().len(), 2);
    assert_eq!(ws.history_len(LOCAL).unwrap(), (1, 0));
}

#[test]
fn test_pencil_draws_while_session_runs() {
    let mut ws = create_workspace();

    ws.begin_session(LOCAL, Tool::Pencil).unwrap();
    move_to(&mut ws, LOCAL, 3, 0);
    assert_eq!(ws.grid().kind_at(Position::new(3, 0)), Some(STONE));
    assert_eq!(ws.grid_mut().take_dirty(), vec![Position::new(0, 0), Position::new(3, 0)]);
    assert_eq!(ws.actor(LOCAL).unwrap().preview(), vec![Position::new(0, 0), Position::new(3, 0)]);
    assert_eq!(ws.history_len(LOCAL).unwrap(), (0, 0));

    assert_eq!(ws.end_session(LOCAL, None).unwrap(), ActionOutcome::Committed { operations: 2 });
    assert_eq!(ws.history_len(LOCAL).unwrap(), (1, 0));
    ws.undo(LOCAL).unwrap();
    assert!(ws.grid().is_empty());
}

#[test]
fn test_eraser_removes_while_session_runs() {
    let mut ws = create_workspace();
    draw_ring(&mut ws, STONE, (0, 0), (2, 0));

    ws.set_cursor(LOCAL, 0.0, 0.0).unwrap();
    ws.begin_session(LOCAL, Tool::Eraser).unwrap();
    assert_eq!(ws.grid().kind_at(Position::new(0, 0)), None);
    assert_eq!(ws.grid().len(), 2);
}

#[test]
fn test_cursor_snaps_to_nearest_cell() {
    let mut ws = create_workspace();
    ws.set_cursor(LOCAL, 1.4, -0.6).unwrap();
    assert_eq!(ws.actor(LOCAL).unwrap().target(), Position::new(1, -1));
}

#[test]
fn test_cursor_stays_in_world_bounds() {
    let mut ws = create_workspace();
    ws.move_cursor(LOCAL, -3e38, 0.0).unwrap();
    ws.move_cursor(LOCAL, -3e38, f32::INFINITY).unwrap();
    assert_eq!(ws.actor(LOCAL).unwrap().cursor(), (-CURSOR_EXTENT, CURSOR_EXTENT));

    ws.set_cursor(LOCAL, f32::NAN, 2.0).unwrap();
    assert_eq!(ws.actor(LOCAL).unwrap().cursor(), (-CURSOR_EXTENT, 2.0));
}

#[test]
fn test_fill_at_world_edge_aborts() {
    let mut ws = create_workspace();
    ws.move_cursor(LOCAL, -3e38, -3e38).unwrap();
    assert_eq!(ws.begin_session(LOCAL, Tool::Fill), Err(EngineError::FillLimitExceeded { limit: 100 }));
    assert!(ws.grid().is_empty());
}

#[test]
fn test_eraser_removes_only_existing_tiles() {
    let mut ws = create_workspace();
    draw_ring(&mut ws, STONE, (0, 0), (2, 0));
    assert_eq!(ws.grid().len(), 3);

    ws.set_cursor(LOCAL, 0.0, 0.0).unwrap();
    ws.begin_session(LOCAL, Tool::Eraser).unwrap();
    move_to(&mut ws, LOCAL, 1, 0);
    move_to(&mut ws, LOCAL, 1, 1);

    assert_eq!(ws.end_session(LOCAL, Some(Tool::Eraser)).unwrap(), ActionOutcome::Committed { operations: 2 });
    assert_eq!(ws.grid().len(), 1);
    assert_eq!(ws.grid().kind_at(Position::new(2, 0)), Some(STONE));
}

#[test]
fn test_empty_session_is_discarded() {
    let mut ws = create_workspace();
    ws.begin_session(LOCAL, Tool::Eraser).unwrap();
    move_to(&mut ws, LOCAL, 4, 4);

    assert_eq!(ws.end_session(LOCAL, None).unwrap(), ActionOutcome::Discarded);
    assert_eq!(ws.history_len(LOCAL).unwrap(), (0, 0));
}

#[test]
fn test_pencil_over_same_kind_is_discarded() {
    let mut ws = create_workspace();
    ws.begin_session(LOCAL, Tool::Pencil).unwrap();
    ws.end_session(LOCAL, None).unwrap();

    ws.begin_session(LOCAL, Tool::Pencil).unwrap();
    assert_eq!(ws.end_session(LOCAL, None).unwrap(), ActionOutcome::Discarded);
    assert_eq!(ws.history_len(LOCAL).unwrap(), (1, 0));
}

#[test]
fn test_end_for_other_tool_is_ignored() {
    let mut ws = create_workspace();
    ws.begin_session(LOCAL, Tool::Pencil).unwrap();

    assert_eq!(ws.end_session(LOCAL, Some(Tool::Eraser)).unwrap(), ActionOutcome::Ignored);
    assert!(ws.actor(LOCAL).unwrap().is_drawing());
    assert_eq!(ws.end_session(LOCAL, Some(Tool::Pencil)).unwrap(), ActionOutcome::Committed { operations: 1 });
    assert_eq!(ws.end_session(LOCAL, None).unwrap(), ActionOutcome::Ignored);
}

#[test]
fn test_new_session_commits_running_one() {
    let mut ws = create_workspace();
    ws.begin_session(LOCAL, Tool::Pencil).unwrap();
    move_to(&mut ws, LOCAL, 1, 0);

    ws.begin_session(LOCAL, Tool::Eraser).unwrap();
    assert_eq!(ws.history_len(LOCAL).unwrap(), (1, 0));
    assert_eq!(ws.actor(LOCAL).unwrap().session_tool(), Some(Tool::Eraser));
}

// ============================================================================
// Rectangles
// ============================================================================

#[test]
fn test_hollow_rectangle_commits_border() {
    let mut ws = create_workspace();
    ws.begin_session(LOCAL, Tool::RectangleHollow).unwrap();
    ws.set_cursor(LOCAL, 2.0, 2.0).unwrap();
    ws.tick();
    assert_eq!(ws.actor(LOCAL).unwrap().preview().len(), 8);
    assert!(ws.grid().is_empty());

    assert_eq!(ws.end_session(LOCAL, None).unwrap(), ActionOutcome::Committed { operations: 8 });
    assert_eq!(ws.grid().kind_at(Position::new(1, 1)), None);
    assert_eq!(ws.history_len(LOCAL).unwrap(), (1, 0));
}

#[test]
fn test_rectangle_over_limit_is_aborted() {
    let mut ws = create_workspace();
    ws.begin_session(LOCAL, Tool::RectangleFilled).unwrap();
    ws.set_cursor(LOCAL, 3000.0, 3000.0).unwrap();
    ws.tick();
    assert!(ws.actor(LOCAL).unwrap().preview().is_empty());

    assert_eq!(ws.end_session(LOCAL, None), Err(EngineError::RectangleLimitExceeded { limit: 50 }));
    assert!(!ws.actor(LOCAL).unwrap().is_drawing());
    assert!(ws.grid().is_empty());
    assert_eq!(ws.history_len(LOCAL).unwrap(), (0, 0));

    // a 10x10 outline is only 36 cells
    ws.set_cursor(LOCAL, 0.0, 0.0).unwrap();
    ws.begin_session(LOCAL, Tool::RectangleHollow).unwrap();
    ws.set_cursor(LOCAL, 9.0, 9.0).unwrap();
    assert_eq!(ws.end_session(LOCAL, None).unwrap(), ActionOutcome::Committed { operations: 36 });
}

#[test]
fn test_filled_rectangle_preview_follows_cursor() {
    let mut ws = create_workspace();
    ws.begin_session(LOCAL, Tool::RectangleFilled).unwrap();
    ws.set_cursor(LOCAL, 1.0, 1.0).unwrap();
    assert_eq!(ws.actor(LOCAL).unwrap().preview().len(), 4);
    ws.set_cursor(LOCAL, 2.0, 2.0).unwrap();
    assert_eq!(ws.actor(LOCAL).unwrap().preview().len(), 9);

    assert_eq!(ws.end_session(LOCAL, None).unwrap(), ActionOutcome::Committed { operations: 9 });
}

// ============================================================================
// Area tool gating
// ============================================================================

#[test]
fn test_large_tile_disables_area_tools() {
    let mut ws = create_workspace();
    assert!(!ws.can_use_area_tools(MACHINE));
    assert!(ws.can_use_area_tools(STONE));

    assert!(!ws.set_active_tile(LOCAL, MACHINE).unwrap());
    assert_eq!(ws.begin_session(LOCAL, Tool::Fill).unwrap(), ActionOutcome::Refused(Tool::Fill));
    assert_eq!(ws.begin_session(LOCAL, Tool::RectangleFilled).unwrap(), ActionOutcome::Refused(Tool::RectangleFilled));
    assert_eq!(ws.begin_session(LOCAL, Tool::Pencil).unwrap(), ActionOutcome::Started(Tool::Pencil));

    assert!(ws.set_active_tile(LOCAL, GRASS).unwrap());
}

#[test]
fn test_unknown_tile_kind_rejected() {
    let mut ws = create_workspace();
    let result = ws.set_active_tile(LOCAL, TileKind(999));
    assert_eq!(result, Err(EngineError::UnknownTileKind { kind: TileKind(999) }));
    assert_eq!(ws.actor(LOCAL).unwrap().tile(), STONE);
}

// ============================================================================
// Flood fill
// ============================================================================

#[test]
fn test_fill_enclosed_empty_region() {
    let mut ws = create_workspace();
    draw_ring(&mut ws, STONE, (0, 0), (4, 4));

    ws.set_active_tile(LOCAL, GRASS).unwrap();
    ws.set_cursor(LOCAL, 2.0, 2.0).unwrap();
    assert_eq!(ws.flood_fill(LOCAL).unwrap(), ActionOutcome::Committed { operations: 9 });
    assert_eq!(ws.grid().kind_at(Position::new(1, 3)), Some(GRASS));
    assert_eq!(ws.grid().kind_at(Position::new(0, 0)), Some(STONE));
}

#[test]
fn test_fill_replaces_connected_tiles_of_same_kind() {
    let mut ws = create_workspace();
    draw_ring(&mut ws, STONE, (0, 0), (4, 4));

    ws.set_active_tile(LOCAL, GRASS).unwrap();
    ws.set_cursor(LOCAL, 0.0, 0.0).unwrap();
    assert_eq!(ws.flood_fill(LOCAL).unwrap(), ActionOutcome::Committed { operations: 16 });
    assert_eq!(ws.grid().kind_at(Position::new(2, 2)), None);
}

#[test]
fn test_fill_open_area_aborts_without_changes() {
    let mut ws = create_workspace();
    draw_ring(&mut ws, STONE, (0, 0), (4, 4));
    let before = ws.grid().all_tiles();

    ws.set_cursor(LOCAL, 20.0, 20.0).unwrap();
    ws.set_active_tile(LOCAL, GRASS).unwrap();
    assert_eq!(ws.flood_fill(LOCAL), Err(EngineError::FillLimitExceeded { limit: 100 }));
    assert_eq!(ws.grid().all_tiles(), before);
    assert_eq!(ws.history_len(LOCAL).unwrap(), (1, 0));
}

#[test]
fn test_fill_with_same_kind_is_discarded() {
    let mut ws = create_workspace();
    draw_ring(&mut ws, STONE, (0, 0), (2, 2));
    ws.set_cursor(LOCAL, 0.0, 0.0).unwrap();

    assert_eq!(ws.begin_session(LOCAL, Tool::Fill).unwrap(), ActionOutcome::Discarded);
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_register_up_to_four_remote_actors() {
    let mut ws = create_workspace();
    let ids: Vec<_> = (0..4).map(|_| ws.register_remote().unwrap()).collect();
    assert_eq!(ids, vec![ActorId(1), ActorId(2), ActorId(3), ActorId(4)]);

    assert_eq!(ws.register_remote(), Err(EngineError::ActorLimitReached { max: 4 }));
    assert_eq!(ws.actor_ids().count(), 5);
}

#[test]
fn test_loaded_tiles_are_not_in_any_history() {
    let mut ws = create_workspace();
    for x in 0..3 {
        ws.grid_mut().place(Position::new(x, 0), GRASS);
    }

    assert_eq!(ws.history_len(LOCAL).unwrap(), (0, 0));
    assert_eq!(ws.undo(LOCAL).unwrap(), tile_engine_edit::HistoryOutcome::NothingToUndo);
    assert_eq!(ws.grid().len(), 3);
}

#[test]
fn test_unregistered_actor_is_rejected() {
    let mut ws = create_workspace();
    assert!(!ws.is_registered(ActorId(2)));
    assert_eq!(ws.undo(ActorId(2)), Err(EngineError::UnknownActor { id: 2 }));
    assert!(ws.begin_session(ActorId(2), Tool::Pencil).is_err());
}
