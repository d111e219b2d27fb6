use web_sys::{DomRect, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

use piece_perfect_core::flow::WHEEL_SCROLL_STEP;
use piece_perfect_core::CanvasSize;

/// Picker drags shorter than this count as taps.
pub(crate) const TAP_SLOP_PX: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Undo,
    Redo,
    TogglePause,
    Resume,
}

pub(crate) fn map_key(key: &str, ctrl: bool) -> Option<KeyAction> {
    match (ctrl, key) {
        (true, "z" | "Z") => Some(KeyAction::Undo),
        (true, "y" | "Y") => Some(KeyAction::Redo),
        (false, "p" | "P") => Some(KeyAction::TogglePause),
        (false, "r" | "R") => Some(KeyAction::Resume),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ClientRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl From<DomRect> for ClientRect {
    fn from(rect: DomRect) -> Self {
        Self {
            left: rect.left() as f32,
            top: rect.top() as f32,
            width: rect.width() as f32,
            height: rect.height() as f32,
        }
    }
}

pub(crate) trait HasClientRect {
    fn client_rect(&self) -> DomRect;
}

impl HasClientRect for HtmlCanvasElement {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

/// Maps a client-space point into canvas pixels, accounting for CSS scaling.
pub(crate) fn scale_to_canvas(
    screen_x: f32,
    screen_y: f32,
    rect: ClientRect,
    canvas: CanvasSize,
) -> Option<(f32, f32)> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let x = (screen_x - rect.left) * canvas.width / rect.width;
    let y = (screen_y - rect.top) * canvas.height / rect.height;
    Some((x, y))
}

pub(crate) fn screen_to_canvas_coords(
    screen_x: f32,
    screen_y: f32,
    element: &impl HasClientRect,
    canvas: CanvasSize,
) -> Option<(f32, f32)> {
    scale_to_canvas(screen_x, screen_y, element.client_rect().into(), canvas)
}

pub(crate) fn mouse_point(event: &MouseEvent) -> (f32, f32) {
    (event.client_x() as f32, event.client_y() as f32)
}

/// First active touch, or the first changed touch once every finger is up.
pub(crate) fn touch_point(event: &TouchEvent) -> Option<(f32, f32)> {
    event
        .touches()
        .get(0)
        .or_else(|| event.changed_touches().get(0))
        .map(|touch| (touch.client_x() as f32, touch.client_y() as f32))
}

/// One fixed scroll step per wheel notch, in the direction of travel.
pub(crate) fn wheel_scroll_delta(event: &WheelEvent) -> f32 {
    wheel_step(event.delta_y() as f32)
}

pub(crate) fn wheel_step(delta_y: f32) -> f32 {
    if delta_y > 0.0 {
        WHEEL_SCROLL_STEP
    } else if delta_y < 0.0 {
        -WHEEL_SCROLL_STEP
    } else {
        0.0
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct DragSlopGate {
    start: [f32; 2],
    slop: f32,
    moved: bool,
}

impl DragSlopGate {
    pub(crate) fn new(start_x: f32, start_y: f32, slop: f32) -> Self {
        Self {
            start: [start_x, start_y],
            slop,
            moved: false,
        }
    }

    pub(crate) fn update(&mut self, x: f32, y: f32) -> bool {
        if self.moved {
            return true;
        }
        let dx = x - self.start[0];
        let dy = y - self.start[1];
        if dx * dx + dy * dy > self.slop * self.slop {
            self.moved = true;
        }
        self.moved
    }

    pub(crate) fn moved(&self) -> bool {
        self.moved
    }

    pub(crate) fn start(&self) -> (f32, f32) {
        (self.start[0], self.start[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_modifier() {
        assert_eq!(map_key("z", true), Some(KeyAction::Undo));
        assert_eq!(map_key("y", true), Some(KeyAction::Redo));
        assert_eq!(map_key("p", false), Some(KeyAction::TogglePause));
        assert_eq!(map_key("r", false), Some(KeyAction::Resume));
        assert_eq!(map_key("z", false), None);
        assert_eq!(map_key("r", true), None);
    }

    #[test]
    fn scaling_undoes_css_size() {
        let rect = ClientRect {
            left: 10.0,
            top: 20.0,
            width: 500.0,
            height: 250.0,
        };
        let canvas = CanvasSize::new(1000.0, 500.0);
        assert_eq!(scale_to_canvas(260.0, 145.0, rect, canvas), Some((500.0, 250.0)));
        let collapsed = ClientRect { width: 0.0, ..rect };
        assert_eq!(scale_to_canvas(1.0, 1.0, collapsed, canvas), None);
    }

    #[test]
    fn wheel_steps_are_fixed() {
        assert_eq!(wheel_step(120.0), WHEEL_SCROLL_STEP);
        assert_eq!(wheel_step(-3.0), -WHEEL_SCROLL_STEP);
        assert_eq!(wheel_step(0.0), 0.0);
    }

    #[test]
    fn slop_gate_latches() {
        let mut gate = DragSlopGate::new(0.0, 0.0, TAP_SLOP_PX);
        assert!(!gate.update(3.0, 3.0));
        assert!(gate.update(10.0, 0.0));
        assert!(gate.update(0.0, 0.0));
        assert!(gate.moved());
    }
}
