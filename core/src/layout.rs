use crate::rules::GameRules;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DrawArea {
    /// Fits an image between the paddings, capped at the maximum draw size,
    /// centred on the canvas.
    pub fn fit(canvas: CanvasSize, image_width: u32, image_height: u32, rules: &GameRules) -> Self {
        let aspect = image_width.max(1) as f32 / image_height.max(1) as f32;
        let available = (canvas.height - rules.padding_top - rules.padding_bottom).max(1.0);
        let mut height = available.min(rules.max_draw_height);
        let mut width = height * aspect;
        let max_width = (canvas.width - rules.padding_side * 2.0)
            .max(1.0)
            .min(rules.max_draw_width);
        if width > max_width {
            width = max_width;
            height = width / aspect;
        }
        Self {
            x: ((canvas.width - width) / 2.0).max(0.0),
            y: ((canvas.height - height) / 2.0).max(0.0),
            width,
            height,
        }
    }

    pub fn cell_size(&self, rows: u32, cols: u32) -> (f32, f32) {
        (self.width / cols.max(1) as f32, self.height / rows.max(1) as f32)
    }

    pub fn cell_origin(&self, row: u32, col: u32, rows: u32, cols: u32) -> (f32, f32) {
        let (cell_w, cell_h) = self.cell_size(rows, cols);
        (self.x + col as f32 * cell_w, self.y + row as f32 * cell_h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn map_point(&self, to: &DrawArea, point: (f32, f32)) -> (f32, f32) {
        (
            to.x + (point.0 - self.x) * to.width / self.width.max(f32::EPSILON),
            to.y + (point.1 - self.y) * to.height / self.height.max(f32::EPSILON),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tall_canvas_is_capped_by_width() {
        let rules = GameRules::default();
        let area = DrawArea::fit(CanvasSize::new(1000.0, 1200.0), 1000, 1000, &rules);
        assert_eq!(area.width, rules.max_draw_width);
        assert_eq!(area.height, rules.max_draw_width);
        assert_eq!(area.x, (1000.0 - area.width) / 2.0);
    }

    #[test]
    fn short_canvas_is_capped_by_padding() {
        let rules = GameRules::default();
        let area = DrawArea::fit(CanvasSize::new(1600.0, 600.0), 400, 300, &rules);
        assert_eq!(area.height, 520.0);
        assert!((area.width - 520.0 * 4.0 / 3.0).abs() < 1e-3);
        assert_eq!(area.y, 40.0);
    }

    #[test]
    fn narrow_canvas_is_capped_by_its_width() {
        let rules = GameRules::default();
        let canvas = CanvasSize::new(400.0, 800.0);
        let area = DrawArea::fit(canvas, 800, 600, &rules);
        assert_eq!(area.width, 400.0 - rules.padding_side * 2.0);
        assert!((area.height - area.width * 0.75).abs() < 1e-3);
        assert_eq!(area.x, rules.padding_side);
        assert!(area.right() <= canvas.width);
        assert!(area.y >= 0.0 && area.y + area.height <= canvas.height);
    }

    #[test]
    fn mapped_points_keep_their_relative_spot() {
        let from = DrawArea {
            x: 100.0,
            y: 50.0,
            width: 400.0,
            height: 200.0,
        };
        let to = DrawArea {
            x: 20.0,
            y: 10.0,
            width: 200.0,
            height: 100.0,
        };
        assert_eq!(from.map_point(&to, (100.0, 50.0)), (20.0, 10.0));
        assert_eq!(from.map_point(&to, (300.0, 150.0)), (120.0, 60.0));
        assert_eq!(from.map_point(&to, (600.0, 0.0)), (270.0, -15.0));
    }

    #[test]
    fn cells_tile_the_area() {
        let area = DrawArea {
            x: 10.0,
            y: 20.0,
            width: 300.0,
            height: 150.0,
        };
        assert_eq!(area.cell_size(3, 3), (100.0, 50.0));
        assert_eq!(area.cell_origin(2, 1, 3, 3), (110.0, 120.0));
    }
}
