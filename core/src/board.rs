use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::geometry::{tab_margin, TabMap};
use crate::layout::{CanvasSize, DrawArea};
use crate::piece::Piece;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleMode {
    Grid,
    Jigsaw,
}

impl PuzzleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PuzzleMode::Grid => "grid",
            PuzzleMode::Jigsaw => "jigsaw",
        }
    }
}

impl fmt::Display for PuzzleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuzzleMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(PuzzleMode::Grid),
            "jigsaw" => Ok(PuzzleMode::Jigsaw),
            _ => Err(ConfigError::UnknownMode(value.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieceState {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardSnapshot {
    pub pieces: Vec<PieceState>,
}

/// Pieces live in an arena indexed by id; `order` is the draw order, last
/// on top.
#[derive(Clone, Debug)]
pub struct Board {
    mode: PuzzleMode,
    rows: u32,
    cols: u32,
    canvas: CanvasSize,
    area: DrawArea,
    tabs: TabMap,
    pieces: Vec<Piece>,
    order: Vec<usize>,
}

impl Board {
    pub fn solved(
        mode: PuzzleMode,
        rows: u32,
        cols: u32,
        canvas: CanvasSize,
        area: DrawArea,
        tabs: TabMap,
    ) -> Self {
        let targets = grid_targets(&area, rows, cols);
        Self::with_positions(mode, rows, cols, canvas, area, tabs, &targets)
    }

    pub fn with_positions(
        mode: PuzzleMode,
        rows: u32,
        cols: u32,
        canvas: CanvasSize,
        area: DrawArea,
        tabs: TabMap,
        starts: &[(f32, f32)],
    ) -> Self {
        let (cell_w, cell_h) = area.cell_size(rows, cols);
        let margin = match mode {
            PuzzleMode::Grid => 0.0,
            PuzzleMode::Jigsaw => tab_margin(cell_w, cell_h),
        };
        let total = (rows * cols) as usize;
        let mut pieces = Vec::with_capacity(total);
        for row in 0..rows {
            for col in 0..cols {
                let id = (row * cols + col) as usize;
                let target = area.cell_origin(row, col, rows, cols);
                let start = starts.get(id).copied().unwrap_or(target);
                let start = clamp_to_canvas(canvas, start, (cell_w, cell_h));
                pieces.push(Piece::new(
                    id,
                    row,
                    col,
                    start,
                    target,
                    (cell_w, cell_h),
                    margin,
                    tabs.for_piece(id),
                ));
            }
        }
        Self {
            mode,
            rows,
            cols,
            canvas,
            area,
            tabs,
            pieces,
            order: (0..total).collect(),
        }
    }

    pub fn mode(&self) -> PuzzleMode {
        self.mode
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn area(&self) -> DrawArea {
        self.area
    }

    pub fn tabs(&self) -> &TabMap {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn cell_size(&self) -> (f32, f32) {
        self.area.cell_size(self.rows, self.cols)
    }

    pub fn piece(&self, id: usize) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn render_order(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.order.iter().filter_map(move |id| self.pieces.get(*id))
    }

    pub fn targets(&self) -> Vec<(f32, f32)> {
        self.pieces.iter().map(Piece::target).collect()
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.pieces[*id].contains_point(x, y))
    }

    pub fn bring_to_front(&mut self, id: usize) {
        if let Some(index) = self.order.iter().position(|entry| *entry == id) {
            let entry = self.order.remove(index);
            self.order.push(entry);
        }
    }

    pub fn clear_highlights(&mut self) {
        for piece in &mut self.pieces {
            piece.unhighlight();
        }
    }

    pub fn highlight_exclusive(&mut self, id: usize) {
        for piece in &mut self.pieces {
            if piece.id == id {
                piece.highlight();
            } else {
                piece.unhighlight();
            }
        }
    }

    /// Moves the board onto a new canvas and draw area. Targets are rebuilt
    /// from the grid, positions keep their spot relative to the area.
    pub fn refit(&mut self, canvas: CanvasSize, area: DrawArea) {
        let old = self.area;
        let (cell_w, cell_h) = area.cell_size(self.rows, self.cols);
        let margin = match self.mode {
            PuzzleMode::Grid => 0.0,
            PuzzleMode::Jigsaw => tab_margin(cell_w, cell_h),
        };
        for piece in &mut self.pieces {
            let target = area.cell_origin(piece.row, piece.col, self.rows, self.cols);
            let position = if piece.is_at_target(1e-3) {
                target
            } else {
                old.map_point(&area, piece.position())
            };
            let (x, y) = clamp_to_canvas(canvas, position, (cell_w, cell_h));
            piece.x = x;
            piece.y = y;
            piece.width = cell_w;
            piece.height = cell_h;
            piece.margin = margin;
            piece.set_target(target);
        }
        self.canvas = canvas;
        self.area = area;
        debug!(width = canvas.width, height = canvas.height, "board refit");
    }

    pub fn refit_snapshot(&self, old: &DrawArea, snapshot: &mut BoardSnapshot) {
        let size = self.cell_size();
        for state in &mut snapshot.pieces {
            let point = old.map_point(&self.area, (state.x, state.y));
            let (x, y) = clamp_to_canvas(self.canvas, point, size);
            state.x = x;
            state.y = y;
        }
    }

    pub fn move_piece(&mut self, id: usize, x: f32, y: f32) {
        let canvas = self.canvas;
        if let Some(piece) = self.pieces.get_mut(id) {
            let (cx, cy) = clamp_to_canvas(canvas, (x, y), (piece.width, piece.height));
            piece.x = cx;
            piece.y = cy;
        }
    }

    /// Grid cell under a position, using the cell centre so a piece counts
    /// as occupying the cell it mostly covers. May be outside the grid.
    pub fn cell_at(&self, x: f32, y: f32) -> (i32, i32) {
        let (cell_w, cell_h) = self.cell_size();
        let col = ((x - self.area.x + cell_w / 2.0) / cell_w).floor() as i32;
        let row = ((y - self.area.y + cell_h / 2.0) / cell_h).floor() as i32;
        (row, col)
    }

    pub fn cell_of(&self, id: usize) -> Option<(i32, i32)> {
        self.pieces.get(id).map(|piece| self.cell_at(piece.x, piece.y))
    }

    pub fn snap_point(&self, x: f32, y: f32) -> (f32, f32) {
        let (cell_w, cell_h) = self.cell_size();
        let gx = ((x - self.area.x) / cell_w).round() * cell_w + self.area.x;
        let gy = ((y - self.area.y) / cell_h).round() * cell_h + self.area.y;
        (gx, gy)
    }

    pub fn overflow_position(&self, row: i32, offset: f32) -> (f32, f32) {
        let (cell_w, cell_h) = self.cell_size();
        let x = self.area.right() + offset;
        let y = self.area.y + row as f32 * cell_h;
        clamp_to_canvas(self.canvas, (x, y), (cell_w, cell_h))
    }

    /// Pushes every other piece sharing `moved`'s cell to the overflow slot
    /// of that row. Displaced pieces are not checked against each other.
    pub fn resolve_overlaps(&mut self, moved: usize, offset: f32) -> Vec<usize> {
        let Some((row, col)) = self.cell_of(moved) else {
            return Vec::new();
        };
        let (x, y) = self.overflow_position(row, offset);
        let mut displaced = Vec::new();
        for index in 0..self.pieces.len() {
            if index == moved {
                continue;
            }
            let cell = self.cell_at(self.pieces[index].x, self.pieces[index].y);
            if cell == (row, col) {
                self.pieces[index].x = x;
                self.pieces[index].y = y;
                displaced.push(index);
            }
        }
        if !displaced.is_empty() {
            debug!(moved, ?displaced, row, col, "pieces moved to overflow");
        }
        displaced
    }

    pub fn is_solved(&self, tolerance: f32) -> bool {
        self.pieces.iter().all(|piece| piece.is_at_target(tolerance))
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            pieces: self
                .pieces
                .iter()
                .map(|piece| PieceState {
                    x: piece.x,
                    y: piece.y,
                    rotation: 0.0,
                })
                .collect(),
        }
    }

    pub fn restore(&mut self, snapshot: &BoardSnapshot) {
        for (piece, state) in self.pieces.iter_mut().zip(snapshot.pieces.iter()) {
            piece.x = state.x;
            piece.y = state.y;
        }
    }
}

pub fn grid_targets(area: &DrawArea, rows: u32, cols: u32) -> Vec<(f32, f32)> {
    let mut targets = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            targets.push(area.cell_origin(row, col, rows, cols));
        }
    }
    targets
}

fn clamp_to_canvas(canvas: CanvasSize, position: (f32, f32), size: (f32, f32)) -> (f32, f32) {
    let max_x = (canvas.width - size.0).max(0.0);
    let max_y = (canvas.height - size.1).max(0.0);
    (position.0.clamp(0.0, max_x), position.1.clamp(0.0, max_y))
}
