pub mod best_time;
pub mod board;
pub mod catalog;
pub mod clock;
pub mod drag;
pub mod error;
pub mod flow;
pub mod format;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod piece;
pub mod rules;
pub mod session;
pub mod shuffle;

pub use best_time::{best_time_key, record_best_time, BestTimeStore, MemoryBestTimes};
pub use board::{Board, BoardSnapshot, PieceState, PuzzleMode};
pub use clock::{Stopwatch, Ticker};
pub use drag::{DragController, DragState, DropOutcome};
pub use error::{ConfigError, LoadError};
pub use flow::{MenuState, NavIntent, PickerState, Screen, ScreenFlow};
pub use geometry::{EdgeOrientation, EdgeTabs, PathCommand, Tab, TabMap};
pub use history::History;
pub use layout::{CanvasSize, DrawArea};
pub use piece::Piece;
pub use rules::GameRules;
pub use session::{Phase, PuzzleConfig, PuzzleSession, SessionCommand, VictoryPayload};
