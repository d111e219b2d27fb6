use piece_perfect_core::{Board, CanvasSize, DragController, DrawArea, PuzzleMode, TabMap};

const SNAP: f32 = 35.0;
const OVERFLOW: f32 = 30.0;

fn build_board() -> Board {
    let area = DrawArea {
        x: 100.0,
        y: 50.0,
        width: 300.0,
        height: 300.0,
    };
    Board::solved(
        PuzzleMode::Grid,
        3,
        3,
        CanvasSize::new(800.0, 600.0),
        area,
        TabMap::flat(3, 3),
    )
}

#[test]
fn drop_on_occupied_cell_sends_resident_to_overflow() {
    let mut board = build_board();
    let mut drag = DragController::new();
    assert_eq!(drag.pointer_down(&mut board, 150.0, 100.0), Some(0));
    assert!(board.piece(0).unwrap().is_highlighted());
    assert!(drag.pointer_move(&mut board, 255.0, 105.0));
    assert_eq!(board.piece(0).unwrap().position(), (205.0, 55.0));

    let outcome = drag.pointer_up(&mut board, SNAP, OVERFLOW).unwrap();
    assert!(outcome.snapped);
    assert_eq!(outcome.displaced, vec![1]);
    assert_eq!(board.piece(0).unwrap().position(), (200.0, 50.0));
    assert_eq!(board.piece(1).unwrap().position(), (430.0, 50.0));
    assert_eq!(board.piece(2).unwrap().position(), (300.0, 50.0));
    assert!(!drag.is_dragging());
}

#[test]
fn overflow_row_follows_the_contested_cell() {
    let mut board = build_board();
    let mut drag = DragController::new();
    // piece 8 (bottom right) onto piece 6's cell
    drag.pointer_down(&mut board, 350.0, 300.0);
    drag.pointer_move(&mut board, 150.0, 300.0);
    let outcome = drag.pointer_up(&mut board, SNAP, OVERFLOW).unwrap();
    assert_eq!(outcome.displaced, vec![6]);
    assert_eq!(board.piece(6).unwrap().position(), (430.0, 250.0));
}

#[test]
fn dropping_on_a_lattice_point_is_idempotent() {
    let mut board = build_board();
    let mut drag = DragController::new();
    let before = board.piece(4).unwrap().position();
    drag.pointer_down(&mut board, 250.0, 200.0);
    let outcome = drag.pointer_up(&mut board, SNAP, OVERFLOW).unwrap();
    assert!(outcome.snapped);
    assert!(outcome.displaced.is_empty());
    assert_eq!(board.piece(4).unwrap().position(), before);
}

#[test]
fn far_drop_does_not_snap() {
    let mut board = build_board();
    let mut drag = DragController::new();
    drag.pointer_down(&mut board, 150.0, 100.0);
    drag.pointer_move(&mut board, 600.0, 500.0);
    let outcome = drag.pointer_up(&mut board, SNAP, OVERFLOW).unwrap();
    assert!(!outcome.snapped);
    assert_eq!(board.piece(0).unwrap().position(), (550.0, 450.0));
}

#[test]
fn drag_is_clamped_to_canvas() {
    let mut board = build_board();
    let mut drag = DragController::new();
    drag.pointer_down(&mut board, 150.0, 100.0);
    drag.pointer_move(&mut board, -500.0, 5000.0);
    assert_eq!(board.piece(0).unwrap().position(), (0.0, 500.0));
}

#[test]
fn press_on_empty_space_is_ignored() {
    let mut board = build_board();
    let mut drag = DragController::new();
    assert_eq!(drag.pointer_down(&mut board, 10.0, 10.0), None);
    assert!(!drag.is_dragging());
    assert!(!drag.pointer_move(&mut board, 20.0, 20.0));
    assert!(drag.pointer_up(&mut board, SNAP, OVERFLOW).is_none());
}

#[test]
fn victory_requires_every_piece_within_tolerance() {
    let mut board = build_board();
    assert!(board.is_solved(2.0));
    board.move_piece(3, 101.5, 151.5);
    assert!(board.is_solved(2.0));
    board.move_piece(3, 103.0, 150.0);
    assert!(!board.is_solved(2.0));
}
