use piece_perfect_core::flow::next_puzzle;
use piece_perfect_core::geometry::tab_margin;
use piece_perfect_core::{
    CanvasSize, GameRules, MemoryBestTimes, NavIntent, PuzzleConfig, PuzzleMode, Screen,
    ScreenFlow, VictoryPayload,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn payload(pool: &[&str], last: &str) -> VictoryPayload {
    VictoryPayload {
        elapsed_ms: 42_000,
        elapsed_label: "00:42".to_string(),
        new_best: true,
        stars: 2,
        image_pool: pool.iter().map(|src| src.to_string()).collect(),
        last_image: last.to_string(),
        mode: PuzzleMode::Jigsaw,
        rows: 4,
        cols: 5,
    }
}

#[test]
fn menu_to_picker_to_puzzle() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut flow = ScreenFlow::new(GameRules::default(), CanvasSize::new(1280.0, 720.0));
    assert!(matches!(flow.screen(), Screen::Menu(_)));
    assert!(!flow.apply(NavIntent::Stay, 0.0, &mut rng).unwrap());

    flow.apply(NavIntent::OpenPicker(PuzzleMode::Jigsaw), 0.0, &mut rng)
        .unwrap();
    let intent = match flow.screen_mut() {
        Screen::ImagePicker(picker) => {
            assert_eq!(picker.images().len(), 12);
            picker.set_rows(5);
            picker.choose(2)
        }
        _ => panic!("expected picker"),
    };
    assert!(flow.apply(intent, 0.0, &mut rng).unwrap());
    let session = flow.session().expect("puzzle screen");
    assert_eq!(session.config().image_src, "IMG/pieces/image3.jpg");
    assert_eq!(session.config().rows, 5);
    assert_eq!(session.config().mode, PuzzleMode::Jigsaw);
    assert_eq!(flow.generation(), 2);
}

#[test]
fn picker_remembers_grid_and_uploads() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut flow = ScreenFlow::new(GameRules::default(), CanvasSize::new(1280.0, 720.0));
    flow.apply(NavIntent::OpenPicker(PuzzleMode::Grid), 0.0, &mut rng)
        .unwrap();
    if let Screen::ImagePicker(picker) = flow.screen_mut() {
        picker.set_cols(6);
        picker.add_upload("blob:local/1");
    }
    flow.apply(NavIntent::BackToMenu, 0.0, &mut rng).unwrap();
    flow.apply(NavIntent::OpenPicker(PuzzleMode::Grid), 0.0, &mut rng)
        .unwrap();
    match flow.screen() {
        Screen::ImagePicker(picker) => {
            assert_eq!(picker.cols(), 6);
            assert_eq!(picker.images().last().map(String::as_str), Some("blob:local/1"));
        }
        _ => panic!("expected picker"),
    }
}

#[test]
fn rejected_configuration_keeps_current_screen() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut flow = ScreenFlow::new(GameRules::default(), CanvasSize::new(1280.0, 720.0));
    let bad = PuzzleConfig::new("x.jpg", 0, 3, PuzzleMode::Grid, Vec::new());
    assert!(flow.apply(NavIntent::StartPuzzle(bad), 0.0, &mut rng).is_err());
    assert!(matches!(flow.screen(), Screen::Menu(_)));
    assert_eq!(flow.generation(), 0);
}

#[test]
fn next_puzzle_picks_a_different_image() {
    let pool = ["a.jpg", "b.jpg", "c.jpg"];
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = next_puzzle(&payload(&pool, "b.jpg"), &mut rng);
        assert_ne!(config.image_src, "b.jpg");
        assert_eq!((config.rows, config.cols), (4, 5));
        assert_eq!(config.mode, PuzzleMode::Jigsaw);
    }
}

#[test]
fn next_puzzle_falls_back_to_first_image() {
    let mut rng = StdRng::seed_from_u64(4);
    let config = next_puzzle(&payload(&["only.jpg"], "only.jpg"), &mut rng);
    assert_eq!(config.image_src, "only.jpg");
}

#[test]
fn victory_then_next_starts_a_new_session() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut flow = ScreenFlow::new(GameRules::default(), CanvasSize::new(1280.0, 720.0));
    flow.apply(
        NavIntent::Victory(payload(&["a.jpg", "b.jpg"], "a.jpg")),
        0.0,
        &mut rng,
    )
    .unwrap();
    assert!(matches!(flow.screen(), Screen::Victory(_)));
    flow.apply(NavIntent::NextPuzzle, 10.0, &mut rng).unwrap();
    assert_eq!(
        flow.session().map(|s| s.config().image_src.clone()),
        Some("b.jpg".to_string())
    );
    flow.apply(NavIntent::ExitToMenu, 20.0, &mut rng).unwrap();
    assert!(matches!(flow.screen(), Screen::Menu(_)));
}

#[test]
fn resize_refits_the_running_board() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut flow = ScreenFlow::new(GameRules::default(), CanvasSize::new(1600.0, 900.0));
    let config = PuzzleConfig::new("img1.jpg", 3, 3, PuzzleMode::Jigsaw, Vec::new());
    flow.apply(NavIntent::StartPuzzle(config), 0.0, &mut rng)
        .unwrap();
    let session = flow.session_mut().unwrap();
    session.image_loaded(800, 600, 0.0);
    assert!(session.start(0.0));
    let (x, y) = session.board().unwrap().piece(4).unwrap().position();
    assert!(session.pointer_down(x + 1.0, y + 1.0));
    session.pointer_move(1550.0, 850.0);
    session.pointer_up(100.0, &mut MemoryBestTimes::new());

    let small = CanvasSize::new(800.0, 500.0);
    flow.set_canvas(small);
    let session = flow.session_mut().unwrap();
    let board = session.board().unwrap();
    assert_eq!(board.canvas(), small);
    let area = board.area();
    assert!(area.x >= 0.0 && area.right() <= small.width);
    assert!(area.y >= 0.0 && area.y + area.height <= small.height);
    let (cell_w, cell_h) = board.cell_size();
    for piece in board.pieces() {
        assert_eq!(piece.target(), area.cell_origin(piece.row, piece.col, 3, 3));
        assert_eq!((piece.width, piece.height), (cell_w, cell_h));
        assert_eq!(piece.margin, tab_margin(cell_w, cell_h));
        assert_eq!(piece.draw_origin(), (piece.x - piece.margin, piece.y - piece.margin));
        assert!(piece.x >= 0.0 && piece.x + piece.width <= small.width);
        assert!(piece.y >= 0.0 && piece.y + piece.height <= small.height);
    }

    assert!(session.undo());
    for piece in session.board().unwrap().pieces() {
        assert!(piece.x + piece.width <= small.width);
        assert!(piece.y + piece.height <= small.height);
    }
}
