use crate::geometry::EdgeTabs;

pub fn same_spot(a: (f32, f32), b: (f32, f32), tolerance: f32) -> bool {
    (a.0 - b.0).abs() < tolerance && (a.1 - b.1).abs() < tolerance
}

#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub id: usize,
    pub row: u32,
    pub col: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub tabs: EdgeTabs,
    target: (f32, f32),
    highlighted: bool,
}

impl Piece {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        row: u32,
        col: u32,
        position: (f32, f32),
        target: (f32, f32),
        size: (f32, f32),
        margin: f32,
        tabs: EdgeTabs,
    ) -> Self {
        Self {
            id,
            row,
            col,
            x: position.0,
            y: position.1,
            width: size.0,
            height: size.1,
            margin,
            tabs,
            target,
            highlighted: false,
        }
    }

    pub fn target(&self) -> (f32, f32) {
        self.target
    }

    pub(crate) fn set_target(&mut self, target: (f32, f32)) {
        self.target = target;
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Half-open hit test against the base footprint; tab overhang is ignored.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn highlight(&mut self) {
        self.highlighted = true;
    }

    pub fn unhighlight(&mut self) {
        self.highlighted = false;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn draw_origin(&self) -> (f32, f32) {
        (self.x - self.margin, self.y - self.margin)
    }

    pub fn surface_size(&self) -> (f32, f32) {
        (
            self.width + self.margin * 2.0,
            self.height + self.margin * 2.0,
        )
    }

    pub fn is_at_target(&self, tolerance: f32) -> bool {
        same_spot(self.position(), self.target, tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Piece {
        Piece::new(
            4,
            1,
            1,
            (100.0, 50.0),
            (40.0, 40.0),
            (40.0, 20.0),
            10.0,
            EdgeTabs::FLAT,
        )
    }

    #[test]
    fn hit_test_is_half_open() {
        let piece = sample();
        assert!(piece.contains_point(100.0, 50.0));
        assert!(piece.contains_point(139.9, 69.9));
        assert!(!piece.contains_point(140.0, 60.0));
        assert!(!piece.contains_point(120.0, 70.0));
        assert!(!piece.contains_point(95.0, 55.0));
    }

    #[test]
    fn highlight_does_not_move() {
        let mut piece = sample();
        piece.highlight();
        assert!(piece.is_highlighted());
        assert_eq!(piece.position(), (100.0, 50.0));
        piece.unhighlight();
        assert!(!piece.is_highlighted());
    }

    #[test]
    fn surface_includes_margin() {
        let piece = sample();
        assert_eq!(piece.draw_origin(), (90.0, 40.0));
        assert_eq!(piece.surface_size(), (60.0, 40.0));
    }

    #[test]
    fn target_tolerance_is_strict() {
        let mut piece = sample();
        piece.x = 41.9;
        piece.y = 38.1;
        assert!(piece.is_at_target(2.0));
        piece.x = 42.0;
        assert!(!piece.is_at_target(2.0));
    }
}
