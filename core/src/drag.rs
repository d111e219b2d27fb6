use crate::board::Board;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        piece: usize,
        grab_dx: f32,
        grab_dy: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DropOutcome {
    pub piece: usize,
    pub snapped: bool,
    pub displaced: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged_piece(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { piece, .. } => Some(piece),
            DragState::Idle => None,
        }
    }

    pub fn rescale(&mut self, scale_x: f32, scale_y: f32) {
        if let DragState::Dragging {
            grab_dx, grab_dy, ..
        } = &mut self.state
        {
            *grab_dx *= scale_x;
            *grab_dy *= scale_y;
        }
    }

    pub fn pointer_down(&mut self, board: &mut Board, x: f32, y: f32) -> Option<usize> {
        if self.is_dragging() {
            return None;
        }
        board.clear_highlights();
        let id = board.hit_test(x, y)?;
        let (px, py) = board.piece(id)?.position();
        board.highlight_exclusive(id);
        board.bring_to_front(id);
        self.state = DragState::Dragging {
            piece: id,
            grab_dx: x - px,
            grab_dy: y - py,
        };
        Some(id)
    }

    pub fn pointer_move(&mut self, board: &mut Board, x: f32, y: f32) -> bool {
        let DragState::Dragging {
            piece,
            grab_dx,
            grab_dy,
        } = self.state
        else {
            return false;
        };
        board.move_piece(piece, x - grab_dx, y - grab_dy);
        true
    }

    pub fn pointer_up(
        &mut self,
        board: &mut Board,
        snap_threshold: f32,
        overflow_offset: f32,
    ) -> Option<DropOutcome> {
        let DragState::Dragging { piece, .. } = self.state else {
            return None;
        };
        self.state = DragState::Idle;
        let (x, y) = board.piece(piece)?.position();
        let (gx, gy) = board.snap_point(x, y);
        let snapped = (x - gx).abs() < snap_threshold && (y - gy).abs() < snap_threshold;
        if snapped {
            board.move_piece(piece, gx, gy);
        }
        let displaced = board.resolve_overlaps(piece, overflow_offset);
        Some(DropOutcome {
            piece,
            snapped,
            displaced,
        })
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
