use piece_perfect_core::flow::{PickerState, THUMB_GAP, THUMB_HEIGHT, THUMB_WIDTH};
use piece_perfect_core::{CanvasSize, PuzzleMode};

pub(crate) const HUD_BUTTON_X: f32 = 60.0;
pub(crate) const HUD_BUTTON_WIDTH: f32 = 120.0;
pub(crate) const HUD_BUTTON_HEIGHT: f32 = 40.0;
pub(crate) const HUD_BUTTON_GAP: f32 = 15.0;
pub(crate) const WIDE_BUTTON_WIDTH: f32 = 160.0;
pub(crate) const WIDE_BUTTON_HEIGHT: f32 = 50.0;
pub(crate) const VICTORY_STARS_Y: f32 = 160.0;
pub(crate) const CARD_WIDTH: f32 = 300.0;
pub(crate) const CARD_HEIGHT: f32 = 400.0;
pub(crate) const CARD_OFFSET: f32 = 160.0;
pub(crate) const TEXT_MAX_LINES: usize = 3;
const ELLIPSIS: &str = "...";

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rect {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Rect {
    pub(crate) fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub(crate) fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ButtonId {
    Pause,
    Undo,
    Redo,
    Restart,
    Exit,
    Start,
    Retry,
    LeavePuzzle,
    ModeCard(PuzzleMode),
    StartGame,
    ScrollLeft,
    ScrollRight,
    Thumbnail(usize),
    Upload,
    PickerBack,
    RowsDown,
    RowsUp,
    ColsDown,
    ColsUp,
    Next,
    BackToMenu,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Button {
    pub(crate) id: ButtonId,
    pub(crate) rect: Rect,
    pub(crate) label: String,
    pub(crate) image: &'static str,
}

impl Button {
    fn new(id: ButtonId, rect: Rect, label: impl Into<String>) -> Self {
        Self {
            id,
            rect,
            label: label.into(),
            image: "button",
        }
    }

    fn small(id: ButtonId, rect: Rect, label: impl Into<String>) -> Self {
        Self {
            image: "btnsmall",
            ..Self::new(id, rect, label)
        }
    }
}

/// Front-most button under the point. Later entries win.
pub(crate) fn hit(buttons: &[Button], x: f32, y: f32) -> Option<ButtonId> {
    buttons
        .iter()
        .rev()
        .find(|button| button.rect.contains(x, y))
        .map(|button| button.id)
}

/// Pause, undo, redo, restart and exit, stacked on the left edge.
pub(crate) fn hud_buttons(canvas: CanvasSize, paused: bool) -> Vec<Button> {
    let entries = [
        (ButtonId::Pause, if paused { "Resume" } else { "Pause" }),
        (ButtonId::Undo, "Undo"),
        (ButtonId::Redo, "Redo"),
        (ButtonId::Restart, "Restart"),
        (ButtonId::Exit, "Exit"),
    ];
    let count = entries.len() as f32;
    let total = count * HUD_BUTTON_HEIGHT + (count - 1.0) * HUD_BUTTON_GAP;
    let start_y = (canvas.height - total) / 2.0;
    entries
        .iter()
        .enumerate()
        .map(|(index, (id, label))| {
            let y = start_y + index as f32 * (HUD_BUTTON_HEIGHT + HUD_BUTTON_GAP);
            Button::new(
                *id,
                Rect::new(HUD_BUTTON_X, y, HUD_BUTTON_WIDTH, HUD_BUTTON_HEIGHT),
                *label,
            )
        })
        .collect()
}

pub(crate) fn start_button(canvas: CanvasSize) -> Button {
    Button::new(
        ButtonId::Start,
        Rect::new(
            (canvas.width - WIDE_BUTTON_WIDTH) / 2.0,
            canvas.height - 80.0,
            WIDE_BUTTON_WIDTH,
            WIDE_BUTTON_HEIGHT,
        ),
        "Start",
    )
}

pub(crate) fn load_failed_buttons(canvas: CanvasSize) -> Vec<Button> {
    let x = (canvas.width - WIDE_BUTTON_WIDTH) / 2.0;
    let y = canvas.height / 2.0 + 20.0;
    vec![
        Button::new(
            ButtonId::Retry,
            Rect::new(x, y, WIDE_BUTTON_WIDTH, WIDE_BUTTON_HEIGHT),
            "Retry",
        ),
        Button::new(
            ButtonId::LeavePuzzle,
            Rect::new(x, y + 70.0, WIDE_BUTTON_WIDTH, WIDE_BUTTON_HEIGHT),
            "Back to menu",
        ),
    ]
}

/// Scale applied to the menu so the cards fit short windows.
pub(crate) fn menu_scale(canvas: CanvasSize) -> f32 {
    (canvas.height / 900.0).clamp(0.5, 1.0)
}

pub(crate) struct MenuLayout {
    pub(crate) cards: Vec<(PuzzleMode, Rect)>,
    pub(crate) start: Button,
}

impl MenuLayout {
    pub(crate) fn new(canvas: CanvasSize) -> Self {
        let scale = menu_scale(canvas);
        let (width, height) = (CARD_WIDTH * scale, CARD_HEIGHT * scale);
        let center_y = canvas.height / 1.85;
        let cards = [
            (PuzzleMode::Grid, -CARD_OFFSET),
            (PuzzleMode::Jigsaw, CARD_OFFSET),
        ]
        .into_iter()
        .map(|(mode, offset)| {
            let center_x = canvas.width / 2.0 + offset * scale;
            (
                mode,
                Rect::new(
                    center_x - width / 2.0,
                    center_y - height / 2.0,
                    width,
                    height,
                ),
            )
        })
        .collect();
        let start = Button::new(
            ButtonId::StartGame,
            Rect::new(
                (canvas.width - 190.0) / 2.0,
                canvas.height - 90.0,
                190.0,
                WIDE_BUTTON_HEIGHT,
            ),
            "Start Game",
        );
        Self { cards, start }
    }

    pub(crate) fn buttons(&self) -> Vec<Button> {
        let mut buttons: Vec<Button> = self
            .cards
            .iter()
            .map(|(mode, rect)| Button {
                id: ButtonId::ModeCard(*mode),
                rect: *rect,
                label: String::new(),
                image: "card",
            })
            .collect();
        buttons.push(self.start.clone());
        buttons
    }
}

pub(crate) struct PickerLayout {
    pub(crate) strip: Rect,
    pub(crate) thumbnails: Vec<Rect>,
    pub(crate) scroll_left: Option<Rect>,
    pub(crate) scroll_right: Option<Rect>,
    pub(crate) controls: Vec<Button>,
    pub(crate) rows_label: (f32, f32),
    pub(crate) cols_label: (f32, f32),
}

impl PickerLayout {
    pub(crate) fn new(canvas: CanvasSize, picker: &PickerState) -> Self {
        let strip_width = picker.viewport_width();
        let strip = Rect::new(
            (canvas.width - strip_width) / 2.0,
            canvas.height / 2.0 - THUMB_HEIGHT / 2.0,
            strip_width,
            THUMB_HEIGHT,
        );
        let thumbnails = (0..picker.images().len())
            .map(|index| {
                Rect::new(
                    strip.x - picker.scroll() + index as f32 * (THUMB_WIDTH + THUMB_GAP),
                    strip.y,
                    THUMB_WIDTH,
                    THUMB_HEIGHT,
                )
            })
            .collect();
        let mid = canvas.height / 2.0;
        let scrollable = picker.max_scroll() > 0.0;
        let scroll_left = (scrollable && picker.scroll() > 0.0)
            .then(|| Rect::new(20.0, mid - 30.0, 30.0, 60.0));
        let scroll_right = (scrollable && picker.scroll() < picker.max_scroll())
            .then(|| Rect::new(canvas.width - 50.0, mid - 30.0, 30.0, 60.0));

        let stepper_y = canvas.height - 170.0;
        let rows_x = canvas.width / 2.0 - 150.0;
        let cols_x = canvas.width / 2.0 + 30.0;
        let stepper =
            |id, x: f32, label: &str| Button::small(id, Rect::new(x, stepper_y, 40.0, 40.0), label);
        let controls = vec![
            stepper(ButtonId::RowsDown, rows_x, "-"),
            stepper(ButtonId::RowsUp, rows_x + 80.0, "+"),
            stepper(ButtonId::ColsDown, cols_x, "-"),
            stepper(ButtonId::ColsUp, cols_x + 80.0, "+"),
            Button::new(
                ButtonId::Upload,
                Rect::new(canvas.width / 2.0 - 100.0, canvas.height - 100.0, 200.0, 50.0),
                "Upload Your Own",
            ),
            Button::small(
                ButtonId::PickerBack,
                Rect::new(80.0, canvas.height - 100.0, 50.0, 50.0),
                "<",
            ),
        ];
        Self {
            strip,
            thumbnails,
            scroll_left,
            scroll_right,
            controls,
            rows_label: (rows_x + 60.0, stepper_y + 20.0),
            cols_label: (cols_x + 60.0, stepper_y + 20.0),
        }
    }

    /// Control buttons first, then arrows, then thumbnails clipped to the
    /// visible strip.
    pub(crate) fn hit(&self, x: f32, y: f32) -> Option<ButtonId> {
        if let Some(id) = hit(&self.controls, x, y) {
            return Some(id);
        }
        if self.scroll_left.is_some_and(|rect| rect.contains(x, y)) {
            return Some(ButtonId::ScrollLeft);
        }
        if self.scroll_right.is_some_and(|rect| rect.contains(x, y)) {
            return Some(ButtonId::ScrollRight);
        }
        if !self.strip.contains(x, y) {
            return None;
        }
        self.thumbnails
            .iter()
            .position(|rect| rect.contains(x, y))
            .map(ButtonId::Thumbnail)
    }
}

pub(crate) fn victory_buttons(canvas: CanvasSize) -> Vec<Button> {
    let x = (canvas.width - WIDE_BUTTON_WIDTH) / 2.0;
    let next_y = VICTORY_STARS_Y + 190.0;
    vec![
        Button::new(
            ButtonId::Next,
            Rect::new(x, next_y, WIDE_BUTTON_WIDTH, WIDE_BUTTON_HEIGHT),
            "Next",
        ),
        Button::new(
            ButtonId::BackToMenu,
            Rect::new(x, next_y + 80.0, WIDE_BUTTON_WIDTH, WIDE_BUTTON_HEIGHT),
            "Back to menu",
        ),
    ]
}

/// Greedy word wrap. Text that needs more than `max_lines` lines is cut and
/// ends with an ellipsis.
pub(crate) fn wrap_text(
    text: &str,
    max_width: f32,
    max_lines: usize,
    measure: impl Fn(&str) -> f32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if measure(&candidate) <= max_width || line.is_empty() {
            line = candidate;
            continue;
        }
        if lines.len() + 1 == max_lines {
            lines.push(ellipsize(&line, max_width, &measure));
            return lines;
        }
        lines.push(std::mem::replace(&mut line, word.to_string()));
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn ellipsize(line: &str, max_width: f32, measure: &impl Fn(&str) -> f32) -> String {
    let mut cut = line.to_string();
    while !cut.is_empty() && measure(&format!("{cut}{ELLIPSIS}")) > max_width {
        cut.pop();
    }
    format!("{}{ELLIPSIS}", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use piece_perfect_core::catalog::builtin_images;

    fn chars(text: &str) -> f32 {
        text.chars().count() as f32
    }

    #[test]
    fn hud_is_centred_vertically() {
        let buttons = hud_buttons(CanvasSize::new(1200.0, 700.0), false);
        assert_eq!(buttons.len(), 5);
        let total = 5.0 * HUD_BUTTON_HEIGHT + 4.0 * HUD_BUTTON_GAP;
        assert_eq!(buttons[0].rect.y, (700.0 - total) / 2.0);
        assert_eq!(buttons[0].label, "Pause");
        assert_eq!(buttons[4].id, ButtonId::Exit);
        assert_eq!(hud_buttons(CanvasSize::new(1200.0, 700.0), true)[0].label, "Resume");
    }

    #[test]
    fn hit_uses_inclusive_edges() {
        let buttons = hud_buttons(CanvasSize::new(1200.0, 700.0), false);
        let undo = buttons[1].rect;
        assert_eq!(hit(&buttons, undo.x, undo.y), Some(ButtonId::Undo));
        assert_eq!(
            hit(&buttons, undo.x + undo.width, undo.y + undo.height),
            Some(ButtonId::Undo)
        );
        assert_eq!(hit(&buttons, 10.0, 10.0), None);
    }

    #[test]
    fn thumbnails_follow_scroll() {
        let canvas = CanvasSize::new(1000.0, 800.0);
        let mut picker = PickerState::new(PuzzleMode::Grid, 3, 3, builtin_images(), canvas);
        picker.scroll_by(220.0);
        let layout = PickerLayout::new(canvas, &picker);
        let (x, y) = layout.thumbnails[1].center();
        assert_eq!(layout.hit(x, y), Some(ButtonId::Thumbnail(1)));
        assert!(layout.scroll_left.is_some());
        assert!(layout.scroll_right.is_some());
        // the first thumbnail is scrolled out of the strip
        assert_eq!(layout.hit(layout.thumbnails[0].x + 5.0, y), None);
    }

    #[test]
    fn menu_cards_do_not_overlap() {
        let layout = MenuLayout::new(CanvasSize::new(1280.0, 900.0));
        let (grid, jigsaw) = (layout.cards[0].1, layout.cards[1].1);
        assert!(grid.x + grid.width < jigsaw.x);
        assert_eq!(layout.buttons().len(), 3);
    }

    #[test]
    fn wrap_breaks_on_words() {
        let lines = wrap_text("one two three four", 9.0, 3, chars);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_truncates_with_ellipsis() {
        let lines = wrap_text("aaa bbb ccc ddd eee", 7.0, 2, chars);
        assert_eq!(lines, vec!["aaa bbb".to_string(), "ccc...".to_string()]);
    }
}
