use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::best_time::{best_time_key, record_best_time, BestTimeStore};
use crate::board::{grid_targets, Board, BoardSnapshot, PuzzleMode};
use crate::catalog::GRID_SIZE_MAX;
use crate::clock::{Stopwatch, Ticker};
use crate::drag::{DragController, DropOutcome};
use crate::error::{ConfigError, LoadError};
use crate::flow::NavIntent;
use crate::format::{format_clock, star_rating};
use crate::geometry::TabMap;
use crate::history::History;
use crate::layout::{CanvasSize, DrawArea};
use crate::rules::GameRules;
use crate::shuffle::derangement;

#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleConfig {
    pub image_src: String,
    pub rows: u32,
    pub cols: u32,
    pub mode: PuzzleMode,
    pub image_pool: Vec<String>,
}

impl PuzzleConfig {
    pub fn new(
        image_src: impl Into<String>,
        rows: u32,
        cols: u32,
        mode: PuzzleMode,
        image_pool: Vec<String>,
    ) -> Self {
        Self {
            image_src: image_src.into(),
            rows,
            cols,
            mode,
            image_pool,
        }
    }

    pub fn parse(
        image_src: impl Into<String>,
        rows: u32,
        cols: u32,
        mode: &str,
        image_pool: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self::new(image_src, rows, cols, mode.parse()?, image_pool);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.rows > GRID_SIZE_MAX || self.cols > GRID_SIZE_MAX {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
                max: GRID_SIZE_MAX,
            });
        }
        Ok(())
    }

    pub fn best_time_key(&self) -> String {
        best_time_key(self.mode, self.rows, self.cols, &self.image_src)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Loading,
    LoadFailed(LoadError),
    PreShuffle,
    Active { paused: bool },
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    TogglePause,
    Resume,
    Undo,
    Redo,
    Restart,
    Exit,
    Retry,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VictoryPayload {
    pub elapsed_ms: u64,
    pub elapsed_label: String,
    pub new_best: bool,
    pub stars: u8,
    pub image_pool: Vec<String>,
    pub last_image: String,
    pub mode: PuzzleMode,
    pub rows: u32,
    pub cols: u32,
}

#[derive(Clone, Copy, Debug)]
struct Countdown {
    remaining: u32,
    ticker: Ticker,
    auto_start_at: f64,
}

pub struct PuzzleSession {
    config: PuzzleConfig,
    rules: GameRules,
    canvas: CanvasSize,
    phase: Phase,
    rng: StdRng,
    image_size: Option<(u32, u32)>,
    board: Option<Board>,
    history: History<BoardSnapshot>,
    drag: DragController,
    stopwatch: Stopwatch,
    clock_ticker: Option<Ticker>,
    countdown: Option<Countdown>,
    load_deadline: Option<f64>,
    displayed_ms: u64,
}

impl PuzzleSession {
    pub fn new(
        config: PuzzleConfig,
        rules: GameRules,
        canvas: CanvasSize,
        now_ms: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        rules.validate()?;
        debug!(
            src = %config.image_src,
            rows = config.rows,
            cols = config.cols,
            mode = %config.mode,
            "session created"
        );
        Ok(Self {
            history: History::new(rules.history_capacity, rules.history_debounce_ms),
            load_deadline: Some(now_ms + f64::from(rules.image_load_timeout_ms)),
            config,
            rules,
            canvas,
            phase: Phase::Loading,
            rng: StdRng::seed_from_u64(seed),
            image_size: None,
            board: None,
            drag: DragController::new(),
            stopwatch: Stopwatch::new(),
            clock_ticker: None,
            countdown: None,
            displayed_ms: 0,
        })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn history(&self) -> &History<BoardSnapshot> {
        &self.history
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    pub fn draw_area(&self) -> Option<DrawArea> {
        self.board.as_ref().map(Board::area)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Active { paused: true })
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Active { paused: false })
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown.map(|countdown| countdown.remaining)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn displayed_elapsed_ms(&self) -> u64 {
        self.displayed_ms
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> u64 {
        self.stopwatch.elapsed_ms(now_ms).max(0.0) as u64
    }

    pub fn elapsed_label(&self) -> String {
        format_clock(self.displayed_ms)
    }

    pub fn image_loaded(&mut self, width: u32, height: u32, now_ms: f64) {
        if self.phase != Phase::Loading {
            return;
        }
        self.load_deadline = None;
        if width == 0 || height == 0 {
            self.fail(LoadError::Dimensions { width, height });
            return;
        }
        self.image_size = Some((width, height));
        let area = DrawArea::fit(self.canvas, width, height, &self.rules);
        let tabs = TabMap::flat(self.config.rows, self.config.cols);
        self.board = Some(Board::solved(
            self.config.mode,
            self.config.rows,
            self.config.cols,
            self.canvas,
            area,
            tabs,
        ));
        self.countdown = Some(Countdown {
            remaining: self.rules.countdown_secs,
            ticker: Ticker::start(now_ms, self.rules.tick_interval_ms),
            auto_start_at: now_ms + f64::from(self.rules.countdown_secs) * 1000.0,
        });
        self.set_phase(Phase::PreShuffle);
        if self.rules.countdown_secs == 0 {
            self.start(now_ms);
        }
    }

    pub fn resize(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
        let (Some(board), Some((width, height))) = (self.board.as_mut(), self.image_size) else {
            return;
        };
        let old = board.area();
        let area = DrawArea::fit(canvas, width, height, &self.rules);
        if area == old && board.canvas() == canvas {
            return;
        }
        board.refit(canvas, area);
        for snapshot in self.history.entries_mut() {
            board.refit_snapshot(&old, snapshot);
        }
        self.drag.rescale(
            area.width / old.width.max(f32::EPSILON),
            area.height / old.height.max(f32::EPSILON),
        );
    }

    pub fn image_failed(&mut self) {
        if self.phase == Phase::Loading {
            self.fail(LoadError::Failed);
        }
    }

    /// Advances every time-driven part of the session. Returns whether the
    /// screen needs a redraw.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.phase {
            Phase::Loading => {
                if self.load_deadline.is_some_and(|deadline| now_ms >= deadline) {
                    self.fail(LoadError::TimedOut(self.rules.image_load_timeout_ms));
                    return true;
                }
                false
            }
            Phase::PreShuffle => {
                let Some(countdown) = self.countdown.as_mut() else {
                    return false;
                };
                let due = countdown.ticker.poll(now_ms);
                countdown.remaining = countdown.remaining.saturating_sub(due);
                if countdown.remaining == 0 || now_ms >= countdown.auto_start_at {
                    self.start(now_ms);
                    return true;
                }
                due > 0
            }
            Phase::Active { paused: false } => {
                let due = self
                    .clock_ticker
                    .as_mut()
                    .map(|ticker| ticker.poll(now_ms))
                    .unwrap_or(0);
                if due > 0 {
                    self.displayed_ms = self.elapsed_ms(now_ms);
                }
                due > 0
            }
            _ => false,
        }
    }

    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.phase != Phase::PreShuffle {
            return false;
        }
        let Some(preview) = self.board.take() else {
            return false;
        };
        if let Some(mut countdown) = self.countdown.take() {
            countdown.ticker.cancel();
        }
        let (rows, cols, area) = (preview.rows(), preview.cols(), preview.area());
        let tabs = match self.config.mode {
            PuzzleMode::Grid => TabMap::flat(rows, cols),
            PuzzleMode::Jigsaw => TabMap::generate(rows, cols, &mut self.rng),
        };
        let targets = grid_targets(&area, rows, cols);
        let starts = derangement(&targets, self.rules.position_tolerance, &mut self.rng);
        let board = Board::with_positions(
            self.config.mode,
            rows,
            cols,
            self.canvas,
            area,
            tabs,
            &starts,
        );
        self.history.clear();
        self.history.save(board.snapshot(), now_ms);
        self.board = Some(board);
        self.stopwatch.start(now_ms);
        self.clock_ticker = Some(Ticker::start(now_ms, self.rules.tick_interval_ms));
        self.displayed_ms = self.elapsed_ms(now_ms);
        self.set_phase(Phase::Active { paused: false });
        true
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(board) = self.board.as_mut() else {
            return false;
        };
        self.drag.pointer_down(board, x, y).is_some()
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        match self.board.as_mut() {
            Some(board) if self.drag.is_dragging() => self.drag.pointer_move(board, x, y),
            _ => false,
        }
    }

    pub fn pointer_up(&mut self, now_ms: f64, store: &mut dyn BestTimeStore) -> NavIntent {
        match self.finish_drop(now_ms) {
            Some(_) => self.check_victory(now_ms, store),
            None => NavIntent::Stay,
        }
    }

    pub fn dragged_piece(&self) -> Option<usize> {
        self.drag.dragged_piece()
    }

    pub fn command(
        &mut self,
        command: SessionCommand,
        now_ms: f64,
        store: &mut dyn BestTimeStore,
    ) -> NavIntent {
        match command {
            SessionCommand::Start => {
                self.start(now_ms);
                NavIntent::Stay
            }
            SessionCommand::TogglePause => match self.phase {
                Phase::Active { paused: false } => {
                    if self.finish_drop(now_ms).is_some() {
                        let intent = self.check_victory(now_ms, store);
                        if intent != NavIntent::Stay {
                            return intent;
                        }
                    }
                    self.pause(now_ms);
                    NavIntent::Stay
                }
                Phase::Active { paused: true } => {
                    self.resume(now_ms);
                    NavIntent::Stay
                }
                _ => NavIntent::Stay,
            },
            SessionCommand::Resume => {
                self.resume(now_ms);
                NavIntent::Stay
            }
            SessionCommand::Undo => {
                self.undo();
                NavIntent::Stay
            }
            SessionCommand::Redo => {
                self.redo();
                NavIntent::Stay
            }
            SessionCommand::Restart => match self.phase {
                Phase::GameOver => NavIntent::Stay,
                _ => {
                    self.teardown(now_ms);
                    NavIntent::Restart(self.config.clone())
                }
            },
            SessionCommand::Retry => match self.phase {
                Phase::LoadFailed(_) => {
                    self.teardown(now_ms);
                    NavIntent::Restart(self.config.clone())
                }
                _ => NavIntent::Stay,
            },
            SessionCommand::Exit => {
                self.teardown(now_ms);
                NavIntent::ExitToMenu
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        if !matches!(self.phase, Phase::Active { .. }) || self.drag.is_dragging() {
            return false;
        }
        match (self.history.undo(), self.board.as_mut()) {
            (Some(snapshot), Some(board)) => {
                board.restore(snapshot);
                true
            }
            _ => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !matches!(self.phase, Phase::Active { .. }) || self.drag.is_dragging() {
            return false;
        }
        match (self.history.redo(), self.board.as_mut()) {
            (Some(snapshot), Some(board)) => {
                board.restore(snapshot);
                true
            }
            _ => false,
        }
    }

    fn pause(&mut self, now_ms: f64) {
        self.stopwatch.stop(now_ms);
        self.displayed_ms = self.elapsed_ms(now_ms);
        if let Some(mut ticker) = self.clock_ticker.take() {
            ticker.cancel();
        }
        self.set_phase(Phase::Active { paused: true });
    }

    fn resume(&mut self, now_ms: f64) {
        if !self.is_paused() {
            return;
        }
        self.stopwatch.start(now_ms);
        self.clock_ticker = Some(Ticker::start(now_ms, self.rules.tick_interval_ms));
        self.set_phase(Phase::Active { paused: false });
    }

    fn finish_drop(&mut self, now_ms: f64) -> Option<DropOutcome> {
        let board = self.board.as_mut()?;
        let outcome =
            self.drag
                .pointer_up(board, self.rules.snap_threshold, self.rules.overflow_offset)?;
        self.history.save(board.snapshot(), now_ms);
        debug!(piece = outcome.piece, snapped = outcome.snapped, "piece dropped");
        Some(outcome)
    }

    fn check_victory(&mut self, now_ms: f64, store: &mut dyn BestTimeStore) -> NavIntent {
        let solved = self
            .board
            .as_ref()
            .is_some_and(|board| board.is_solved(self.rules.position_tolerance));
        if !solved {
            return NavIntent::Stay;
        }
        self.stopwatch.stop(now_ms);
        let elapsed_ms = self.elapsed_ms(now_ms);
        self.displayed_ms = elapsed_ms;
        self.cancel_tickers();
        let new_best = record_best_time(store, &self.config.best_time_key(), elapsed_ms);
        self.set_phase(Phase::GameOver);
        info!(elapsed_ms, new_best, "puzzle solved");
        NavIntent::Victory(VictoryPayload {
            elapsed_ms,
            elapsed_label: format_clock(elapsed_ms),
            new_best,
            stars: star_rating(elapsed_ms),
            image_pool: self.config.image_pool.clone(),
            last_image: self.config.image_src.clone(),
            mode: self.config.mode,
            rows: self.config.rows,
            cols: self.config.cols,
        })
    }

    fn teardown(&mut self, now_ms: f64) {
        self.drag.cancel();
        self.stopwatch.stop(now_ms);
        self.cancel_tickers();
        self.load_deadline = None;
    }

    fn cancel_tickers(&mut self) {
        if let Some(mut ticker) = self.clock_ticker.take() {
            ticker.cancel();
        }
        if let Some(mut countdown) = self.countdown.take() {
            countdown.ticker.cancel();
        }
    }

    fn fail(&mut self, error: LoadError) {
        self.load_deadline = None;
        self.set_phase(Phase::LoadFailed(error));
    }

    fn set_phase(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "session phase");
        self.phase = phase;
    }
}
