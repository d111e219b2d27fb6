use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::board::PuzzleMode;
use crate::catalog::{builtin_images, clamp_grid_size, GRID_SIZE_DEFAULT};
use crate::error::ConfigError;
use crate::layout::CanvasSize;
use crate::rules::GameRules;
use crate::session::{PuzzleConfig, PuzzleSession, VictoryPayload};

pub const THUMB_WIDTH: f32 = 200.0;
pub const THUMB_HEIGHT: f32 = 150.0;
pub const THUMB_GAP: f32 = 20.0;
pub const STRIP_WIDTH_RATIO: f32 = 0.9;
pub const WHEEL_SCROLL_STEP: f32 = 25.0;
pub const ARROW_SCROLL_STEP: f32 = WHEEL_SCROLL_STEP * 4.0;

#[derive(Clone, Debug, PartialEq)]
pub enum NavIntent {
    Stay,
    OpenPicker(PuzzleMode),
    StartPuzzle(PuzzleConfig),
    Restart(PuzzleConfig),
    ExitToMenu,
    Victory(VictoryPayload),
    NextPuzzle,
    BackToMenu,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuState {
    selected: Option<PuzzleMode>,
}

impl MenuState {
    pub fn selected(&self) -> Option<PuzzleMode> {
        self.selected
    }

    pub fn select(&mut self, mode: PuzzleMode) {
        self.selected = Some(mode);
    }

    pub fn can_start(&self) -> bool {
        self.selected.is_some()
    }

    pub fn start(&self) -> NavIntent {
        match self.selected {
            Some(mode) => NavIntent::OpenPicker(mode),
            None => NavIntent::Stay,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PickerState {
    pub mode: PuzzleMode,
    rows: u32,
    cols: u32,
    images: Vec<String>,
    scroll: f32,
    viewport_width: f32,
}

impl PickerState {
    pub fn new(
        mode: PuzzleMode,
        rows: u32,
        cols: u32,
        images: Vec<String>,
        canvas: CanvasSize,
    ) -> Self {
        Self {
            mode,
            rows: clamp_grid_size(rows),
            cols: clamp_grid_size(cols),
            images,
            scroll: 0.0,
            viewport_width: canvas.width * STRIP_WIDTH_RATIO,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn set_rows(&mut self, rows: u32) {
        self.rows = clamp_grid_size(rows);
    }

    pub fn set_cols(&mut self, cols: u32) {
        self.cols = clamp_grid_size(cols);
    }

    pub fn step_rows(&mut self, delta: i32) {
        self.set_rows(self.rows.saturating_add_signed(delta));
    }

    pub fn step_cols(&mut self, delta: i32) {
        self.set_cols(self.cols.saturating_add_signed(delta));
    }

    pub fn content_width(&self) -> f32 {
        self.images.len() as f32 * (THUMB_WIDTH + THUMB_GAP)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_width() - self.viewport_width).max(0.0)
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll = (self.scroll + delta).clamp(0.0, self.max_scroll());
    }

    pub fn resize(&mut self, canvas: CanvasSize) {
        self.viewport_width = canvas.width * STRIP_WIDTH_RATIO;
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    pub fn add_upload(&mut self, src: impl Into<String>) {
        self.images.push(src.into());
        self.scroll = self.max_scroll();
    }

    pub fn choose(&self, index: usize) -> NavIntent {
        match self.images.get(index) {
            Some(src) => NavIntent::StartPuzzle(PuzzleConfig::new(
                src.clone(),
                self.rows,
                self.cols,
                self.mode,
                self.images.clone(),
            )),
            None => NavIntent::Stay,
        }
    }

    pub fn back(&self) -> NavIntent {
        NavIntent::BackToMenu
    }
}

pub enum Screen {
    Menu(MenuState),
    ImagePicker(PickerState),
    Puzzle(Box<PuzzleSession>),
    Victory(VictoryPayload),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu(_) => "menu",
            Screen::ImagePicker(_) => "picker",
            Screen::Puzzle(_) => "puzzle",
            Screen::Victory(_) => "victory",
        }
    }
}

pub struct ScreenFlow {
    screen: Screen,
    rules: GameRules,
    canvas: CanvasSize,
    generation: u64,
    grid: (u32, u32),
    uploads: Vec<String>,
}

impl ScreenFlow {
    pub fn new(rules: GameRules, canvas: CanvasSize) -> Self {
        Self {
            screen: Screen::Menu(MenuState::default()),
            rules,
            canvas,
            generation: 0,
            grid: (GRID_SIZE_DEFAULT, GRID_SIZE_DEFAULT),
            uploads: Vec::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn session(&self) -> Option<&PuzzleSession> {
        match &self.screen {
            Screen::Puzzle(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut PuzzleSession> {
        match &mut self.screen {
            Screen::Puzzle(session) => Some(session),
            _ => None,
        }
    }

    pub fn set_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
        match &mut self.screen {
            Screen::ImagePicker(picker) => picker.resize(canvas),
            Screen::Puzzle(session) => session.resize(canvas),
            _ => {}
        }
    }

    /// Interprets `intent`. Returns whether the screen changed. An invalid
    /// puzzle configuration leaves the current screen in place.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        intent: NavIntent,
        now_ms: f64,
        rng: &mut R,
    ) -> Result<bool, ConfigError> {
        let next = match intent {
            NavIntent::Stay => return Ok(false),
            NavIntent::OpenPicker(mode) => {
                let mut images = builtin_images();
                images.extend(self.uploads.iter().cloned());
                Screen::ImagePicker(PickerState::new(
                    mode,
                    self.grid.0,
                    self.grid.1,
                    images,
                    self.canvas,
                ))
            }
            NavIntent::StartPuzzle(config) | NavIntent::Restart(config) => {
                self.remember_picker();
                self.session_screen(config, now_ms, rng)?
            }
            NavIntent::ExitToMenu | NavIntent::BackToMenu => {
                self.remember_picker();
                Screen::Menu(MenuState::default())
            }
            NavIntent::Victory(payload) => Screen::Victory(payload),
            NavIntent::NextPuzzle => {
                let Screen::Victory(payload) = &self.screen else {
                    return Ok(false);
                };
                let config = next_puzzle(payload, rng);
                self.session_screen(config, now_ms, rng)?
            }
        };
        info!(from = self.screen.name(), to = next.name(), "screen change");
        self.screen = next;
        self.generation += 1;
        Ok(true)
    }

    fn session_screen<R: Rng + ?Sized>(
        &self,
        config: PuzzleConfig,
        now_ms: f64,
        rng: &mut R,
    ) -> Result<Screen, ConfigError> {
        let session = PuzzleSession::new(config, self.rules, self.canvas, now_ms, rng.random())
            .inspect_err(|err| warn!(%err, "puzzle configuration rejected"))?;
        Ok(Screen::Puzzle(Box::new(session)))
    }

    fn remember_picker(&mut self) {
        if let Screen::ImagePicker(picker) = &self.screen {
            self.grid = (picker.rows(), picker.cols());
            let builtin = builtin_images();
            self.uploads = picker
                .images()
                .iter()
                .filter(|src| !builtin.contains(src))
                .cloned()
                .collect();
        }
    }
}

/// Same mode and size, different picture. Falls back to the first pool
/// image when nothing else is available.
pub fn next_puzzle<R: Rng + ?Sized>(payload: &VictoryPayload, rng: &mut R) -> PuzzleConfig {
    let candidates: Vec<&String> = payload
        .image_pool
        .iter()
        .filter(|src| **src != payload.last_image)
        .collect();
    let image = candidates
        .choose(rng)
        .map(|src| (*src).clone())
        .or_else(|| payload.image_pool.first().cloned())
        .unwrap_or_else(|| payload.last_image.clone());
    PuzzleConfig::new(
        image,
        payload.rows,
        payload.cols,
        payload.mode,
        payload.image_pool.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_needs_a_mode() {
        let mut menu = MenuState::default();
        assert_eq!(menu.start(), NavIntent::Stay);
        menu.select(PuzzleMode::Jigsaw);
        assert_eq!(menu.start(), NavIntent::OpenPicker(PuzzleMode::Jigsaw));
    }

    #[test]
    fn picker_clamps_grid_size() {
        let mut picker = PickerState::new(
            PuzzleMode::Grid,
            3,
            3,
            builtin_images(),
            CanvasSize::new(1000.0, 800.0),
        );
        picker.step_rows(10);
        picker.step_cols(-10);
        assert_eq!((picker.rows(), picker.cols()), (8, 2));
    }

    #[test]
    fn picker_scroll_is_bounded() {
        let mut picker = PickerState::new(
            PuzzleMode::Grid,
            3,
            3,
            builtin_images(),
            CanvasSize::new(1000.0, 800.0),
        );
        picker.scroll_by(-50.0);
        assert_eq!(picker.scroll(), 0.0);
        picker.scroll_by(10_000.0);
        assert_eq!(picker.scroll(), 12.0 * 220.0 - 900.0);
    }
}
