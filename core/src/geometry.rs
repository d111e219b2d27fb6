use std::fmt::Write;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TAB_DEPTH_DIVISOR: f32 = 3.0;
pub const TAB_BUMP_DIVISOR: f32 = 3.5;

/// Shape of one piece edge. `Convex` bulges out of the piece, `Concave`
/// bites into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    Concave,
    Flat,
    Convex,
}

impl Tab {
    pub fn sign(self) -> i8 {
        match self {
            Tab::Concave => -1,
            Tab::Flat => 0,
            Tab::Convex => 1,
        }
    }

    pub fn opposite(self) -> Tab {
        match self {
            Tab::Concave => Tab::Convex,
            Tab::Flat => Tab::Flat,
            Tab::Convex => Tab::Concave,
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Tab {
        if rng.random_bool(0.5) {
            Tab::Convex
        } else {
            Tab::Concave
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeOrientation {
    Top,
    Right,
    Bottom,
    Left,
}

impl EdgeOrientation {
    pub const CLOCKWISE: [EdgeOrientation; 4] = [
        EdgeOrientation::Top,
        EdgeOrientation::Right,
        EdgeOrientation::Bottom,
        EdgeOrientation::Left,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeTabs {
    pub top: Tab,
    pub right: Tab,
    pub bottom: Tab,
    pub left: Tab,
}

impl EdgeTabs {
    pub const FLAT: EdgeTabs = EdgeTabs {
        top: Tab::Flat,
        right: Tab::Flat,
        bottom: Tab::Flat,
        left: Tab::Flat,
    };

    pub fn get(&self, edge: EdgeOrientation) -> Tab {
        match edge {
            EdgeOrientation::Top => self.top,
            EdgeOrientation::Right => self.right,
            EdgeOrientation::Bottom => self.bottom,
            EdgeOrientation::Left => self.left,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabMap {
    rows: u32,
    cols: u32,
    cells: Vec<EdgeTabs>,
}

impl TabMap {
    pub fn flat(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![EdgeTabs::FLAT; (rows * cols) as usize],
        }
    }

    /// Interior edges get a random tab; the neighbour sharing that edge gets
    /// the opposite one. Perimeter edges stay flat.
    pub fn generate<R: Rng + ?Sized>(rows: u32, cols: u32, rng: &mut R) -> Self {
        let mut cells: Vec<EdgeTabs> = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let top = if row == 0 {
                    Tab::Flat
                } else {
                    cells[((row - 1) * cols + col) as usize].bottom.opposite()
                };
                let left = if col == 0 {
                    Tab::Flat
                } else {
                    cells[(row * cols + col - 1) as usize].right.opposite()
                };
                let right = if col + 1 == cols {
                    Tab::Flat
                } else {
                    Tab::random(rng)
                };
                let bottom = if row + 1 == rows {
                    Tab::Flat
                } else {
                    Tab::random(rng)
                };
                cells.push(EdgeTabs {
                    top,
                    right,
                    bottom,
                    left,
                });
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn get(&self, row: u32, col: u32) -> Option<EdgeTabs> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize).copied()
    }

    pub fn for_piece(&self, id: usize) -> EdgeTabs {
        self.cells.get(id).copied().unwrap_or(EdgeTabs::FLAT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    CubicTo {
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    },
    Close,
}

impl PathCommand {
    fn end_point(&self) -> Option<(f32, f32)> {
        match *self {
            PathCommand::MoveTo { x, y }
            | PathCommand::LineTo { x, y }
            | PathCommand::CubicTo { x, y, .. } => Some((x, y)),
            PathCommand::Close => None,
        }
    }
}

pub fn tab_depth(width: f32, height: f32) -> f32 {
    width.min(height) / TAB_DEPTH_DIVISOR
}

pub fn tab_bump(width: f32, height: f32) -> f32 {
    width.min(height) / TAB_BUMP_DIVISOR
}

pub fn tab_margin(width: f32, height: f32) -> f32 {
    width.min(height) / 2.0
}

fn edge_frame(
    edge: EdgeOrientation,
    width: f32,
    height: f32,
) -> ((f32, f32), (f32, f32), (f32, f32)) {
    match edge {
        EdgeOrientation::Top => ((0.0, 0.0), (width, 0.0), (0.0, -1.0)),
        EdgeOrientation::Right => ((width, 0.0), (width, height), (1.0, 0.0)),
        EdgeOrientation::Bottom => ((width, height), (0.0, height), (0.0, 1.0)),
        EdgeOrientation::Left => ((0.0, height), (0.0, 0.0), (-1.0, 0.0)),
    }
}

/// Commands tracing one edge clockwise in piece-local space. The pen is
/// assumed to already sit on the edge's start corner.
pub fn edge_commands(edge: EdgeOrientation, tab: Tab, width: f32, height: f32) -> Vec<PathCommand> {
    let (start, end, normal) = edge_frame(edge, width, height);
    if tab == Tab::Flat {
        return vec![PathCommand::LineTo { x: end.0, y: end.1 }];
    }
    let length = if start.0 == end.0 { height } else { width };
    let tangent = ((end.0 - start.0) / length, (end.1 - start.1) / length);
    let mid = ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0);
    let bump = tab_bump(width, height);
    let push = f32::from(tab.sign()) * tab_depth(width, height);
    let along = |t: f32| (mid.0 + tangent.0 * t, mid.1 + tangent.1 * t);
    let (ax, ay) = along(-bump);
    let (c1x, c1y) = along(-bump / 2.0);
    let (c2x, c2y) = along(bump / 2.0);
    let (bx, by) = along(bump);
    vec![
        PathCommand::LineTo { x: ax, y: ay },
        PathCommand::CubicTo {
            c1x: c1x + normal.0 * push,
            c1y: c1y + normal.1 * push,
            c2x: c2x + normal.0 * push,
            c2y: c2y + normal.1 * push,
            x: bx,
            y: by,
        },
        PathCommand::LineTo { x: end.0, y: end.1 },
    ]
}

pub fn edge_points(edge: EdgeOrientation, tab: Tab, width: f32, height: f32) -> Vec<(f32, f32)> {
    let (start, _, _) = edge_frame(edge, width, height);
    let mut points = vec![start];
    for command in edge_commands(edge, tab, width, height) {
        if let PathCommand::CubicTo {
            c1x, c1y, c2x, c2y, ..
        } = command
        {
            points.push((c1x, c1y));
            points.push((c2x, c2y));
        }
        if let Some(point) = command.end_point() {
            points.push(point);
        }
    }
    points
}

/// Closed clockwise outline of a piece whose base footprint spans
/// `(0, 0)..(width, height)`.
pub fn piece_outline(tabs: EdgeTabs, width: f32, height: f32) -> Vec<PathCommand> {
    let mut commands = Vec::with_capacity(14);
    commands.push(PathCommand::MoveTo { x: 0.0, y: 0.0 });
    for edge in EdgeOrientation::CLOCKWISE {
        commands.extend(edge_commands(edge, tabs.get(edge), width, height));
    }
    commands.push(PathCommand::Close);
    commands
}

pub fn fmt_f32(value: f32) -> String {
    format!("{:.3}", value)
}

pub fn outline_to_svg_path(commands: &[PathCommand], dx: f32, dy: f32) -> String {
    let mut path = String::new();
    for command in commands {
        if !path.is_empty() {
            path.push(' ');
        }
        let _ = match *command {
            PathCommand::MoveTo { x, y } => {
                write!(path, "M {} {}", fmt_f32(x + dx), fmt_f32(y + dy))
            }
            PathCommand::LineTo { x, y } => {
                write!(path, "L {} {}", fmt_f32(x + dx), fmt_f32(y + dy))
            }
            PathCommand::CubicTo {
                c1x,
                c1y,
                c2x,
                c2y,
                x,
                y,
            } => write!(
                path,
                "C {} {} {} {} {} {}",
                fmt_f32(c1x + dx),
                fmt_f32(c1y + dy),
                fmt_f32(c2x + dx),
                fmt_f32(c2y + dy),
                fmt_f32(x + dx),
                fmt_f32(y + dy)
            ),
            PathCommand::Close => write!(path, "Z"),
        };
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn flat_edge_is_a_single_line() {
        let commands = edge_commands(EdgeOrientation::Right, Tab::Flat, 90.0, 60.0);
        assert_eq!(commands, vec![PathCommand::LineTo { x: 90.0, y: 60.0 }]);
    }

    #[test]
    fn convex_top_bulges_upward() {
        let commands = edge_commands(EdgeOrientation::Top, Tab::Convex, 90.0, 60.0);
        let depth = tab_depth(90.0, 60.0);
        match commands[1] {
            PathCommand::CubicTo { c1y, c2y, .. } => {
                assert_eq!(c1y, -depth);
                assert_eq!(c2y, -depth);
            }
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn concave_right_bites_inward() {
        let commands = edge_commands(EdgeOrientation::Right, Tab::Concave, 90.0, 60.0);
        let depth = tab_depth(90.0, 60.0);
        match commands[1] {
            PathCommand::CubicTo { c1x, c2x, .. } => {
                assert_eq!(c1x, 90.0 - depth);
                assert_eq!(c2x, 90.0 - depth);
            }
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn outline_closes_at_origin() {
        let tabs = EdgeTabs {
            top: Tab::Flat,
            right: Tab::Convex,
            bottom: Tab::Concave,
            left: Tab::Flat,
        };
        let outline = piece_outline(tabs, 80.0, 80.0);
        assert_eq!(outline.first(), Some(&PathCommand::MoveTo { x: 0.0, y: 0.0 }));
        assert_eq!(outline.last(), Some(&PathCommand::Close));
        assert_eq!(
            outline[outline.len() - 2],
            PathCommand::LineTo { x: 0.0, y: 0.0 }
        );
    }

    #[test]
    fn svg_path_applies_offset() {
        let outline = piece_outline(EdgeTabs::FLAT, 10.0, 20.0);
        let path = outline_to_svg_path(&outline, 5.0, 5.0);
        assert_eq!(
            path,
            "M 5.000 5.000 L 15.000 5.000 L 15.000 25.000 L 5.000 25.000 L 5.000 5.000 Z"
        );
    }

    #[test]
    fn single_cell_map_is_flat() {
        let mut rng = StdRng::seed_from_u64(3);
        let map = TabMap::generate(1, 1, &mut rng);
        assert_eq!(map.get(0, 0), Some(EdgeTabs::FLAT));
        assert_eq!(map.get(1, 0), None);
    }
}
