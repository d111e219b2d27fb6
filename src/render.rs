use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Path2d};

use piece_perfect_core::catalog::{GRID_SIZE_MAX, GRID_SIZE_MIN, MODE_CARDS};
use piece_perfect_core::flow::{MenuState, PickerState};
use piece_perfect_core::geometry::{outline_to_svg_path, piece_outline};
use piece_perfect_core::{Board, CanvasSize, DrawArea, Phase, Piece, PuzzleSession, TabMap};

use crate::assets::{image_ready, AssetLoader};
use crate::ui::{
    hud_buttons, load_failed_buttons, menu_scale, start_button, victory_buttons, wrap_text,
    Button, ButtonId, MenuLayout, PickerLayout, Rect, TEXT_MAX_LINES, VICTORY_STARS_Y,
};
use crate::victory::{star_points, VictoryScene};

const STAR_SIZE: f32 = 60.0;
const STAR_GAP: f32 = 10.0;
const CARD_RADIUS: f64 = 32.0;
const PIECE_BORDER: &str = "rgba(0,0,0,0.5)";
const PIECE_HIGHLIGHT: &str = "#ebf1ef";

type RenderResult = Result<(), JsValue>;

pub(crate) struct Painter<'a> {
    ctx: &'a CanvasRenderingContext2d,
    assets: &'a AssetLoader,
    canvas: CanvasSize,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        ctx: &'a CanvasRenderingContext2d,
        assets: &'a AssetLoader,
        canvas: CanvasSize,
    ) -> Self {
        Self {
            ctx,
            assets,
            canvas,
        }
    }

    fn width(&self) -> f64 {
        self.canvas.width as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height as f64
    }

    pub(crate) fn background(&self) -> RenderResult {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
        match self.assets.ready("background") {
            Some(image) => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(
                    &image,
                    0.0,
                    0.0,
                    self.width(),
                    self.height(),
                ),
            None => {
                self.ctx.set_fill_style_str("#222");
                self.ctx.fill_rect(0.0, 0.0, self.width(), self.height());
                Ok(())
            }
        }
    }

    fn text(&self, text: &str, x: f32, y: f32, font: &str, color: &str) -> RenderResult {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("alphabetic");
        self.ctx.fill_text(text, x as f64, y as f64)
    }

    pub(crate) fn button(&self, button: &Button, hovered: bool) -> RenderResult {
        let Rect {
            x,
            y,
            width,
            height,
        } = button.rect;
        let (x, y, w, h) = (x as f64, y as f64, width as f64, height as f64);
        match self.assets.ready(button.image) {
            Some(image) => {
                self.ctx.save();
                if hovered {
                    self.ctx.set_filter("brightness(1.4)");
                }
                let drawn = self
                    .ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(&image, x, y, w, h);
                self.ctx.restore();
                drawn?;
            }
            None => {
                self.ctx
                    .set_fill_style_str(if hovered { "#666" } else { "#333" });
                self.ctx.fill_rect(x, y, w, h);
                self.ctx.set_stroke_style_str("#fff");
                self.ctx.set_line_width(1.0);
                self.ctx.stroke_rect(x, y, w, h);
            }
        }
        if button.label.is_empty() {
            return Ok(());
        }
        let (cx, cy) = button.rect.center();
        self.text(&button.label, cx, cy + 6.0, "18px Arial", "#fff")
    }

    fn buttons(&self, buttons: &[Button], hover: Option<ButtonId>) -> RenderResult {
        for button in buttons {
            self.button(button, hover == Some(button.id))?;
        }
        Ok(())
    }

    pub(crate) fn menu(&self, menu: &MenuState, hover: Option<ButtonId>) -> RenderResult {
        self.background()?;
        let scale = menu_scale(self.canvas);
        let center_x = self.canvas.width / 2.0;
        let title_font = format!("bold {}px Montserrat, Arial", (72.0 * scale).max(14.0).round());
        self.text("Piece Perfect", center_x, 100.0, &title_font, "#fff")?;
        let subtitle_font = format!("{}px Montserrat, Arial", (24.0 * scale).max(12.0).round());
        self.text("Select your puzzle style", center_x, 150.0, &subtitle_font, "#ddd")?;

        let layout = MenuLayout::new(self.canvas);
        for (mode, rect) in &layout.cards {
            let Some(card) = MODE_CARDS.iter().find(|card| card.mode == *mode) else {
                continue;
            };
            let hovered = hover == Some(ButtonId::ModeCard(*mode));
            self.button(
                &Button {
                    id: ButtonId::ModeCard(*mode),
                    rect: *rect,
                    label: String::new(),
                    image: "card",
                },
                hovered,
            )?;
            if menu.selected() == Some(*mode) {
                self.selection_outline(*rect)?;
            }
            self.card_contents(rect, card.title, card.description, card.thumbnail, scale)?;
        }

        let start_hovered = menu.can_start() && hover == Some(ButtonId::StartGame);
        self.ctx
            .set_global_alpha(if menu.can_start() { 1.0 } else { 0.5 });
        let drawn = self.button(&layout.start, start_hovered);
        self.ctx.set_global_alpha(1.0);
        drawn
    }

    fn selection_outline(&self, rect: Rect) -> RenderResult {
        self.ctx.save();
        self.ctx.set_stroke_style_str("#fff");
        self.ctx.set_line_width(4.0);
        self.ctx.set_shadow_color("rgba(255,255,255,0.8)");
        self.ctx.set_shadow_blur(12.0);
        rounded_rect_path(self.ctx, rect, CARD_RADIUS)?;
        self.ctx.stroke();
        self.ctx.restore();
        Ok(())
    }

    fn card_contents(
        &self,
        rect: &Rect,
        title: &str,
        description: &str,
        thumbnail: &str,
        scale: f32,
    ) -> RenderResult {
        let pad = 24.0 * scale;
        let thumb = Rect::new(
            rect.x + pad,
            rect.y + pad,
            rect.width - pad * 2.0,
            rect.height * 0.45,
        );
        if let Some(image) = self.assets.ready(thumbnail) {
            self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &image,
                thumb.x as f64,
                thumb.y as f64,
                thumb.width as f64,
                thumb.height as f64,
            )?;
        }
        let center_x = rect.x + rect.width / 2.0;
        let title_y = thumb.y + thumb.height + 40.0 * scale;
        let title_font = format!("bold {}px Montserrat, Arial", (26.0 * scale).max(12.0).round());
        self.text(title, center_x, title_y, &title_font, "#fff")?;

        let body_size = (16.0 * scale).max(10.0).round();
        let body_font = format!("{body_size}px Montserrat, Arial");
        self.ctx.set_font(&body_font);
        let ctx = self.ctx;
        let lines = wrap_text(
            description,
            rect.width - pad * 2.0,
            TEXT_MAX_LINES,
            |line| {
                ctx.measure_text(line)
                    .map(|metrics| metrics.width() as f32)
                    .unwrap_or(0.0)
            },
        );
        for (index, line) in lines.iter().enumerate() {
            let y = title_y + 30.0 * scale + index as f32 * (body_size + 6.0);
            self.text(line, center_x, y, &body_font, "#ddd")?;
        }
        Ok(())
    }

    pub(crate) fn picker(
        &self,
        picker: &PickerState,
        thumbnails: &[Option<HtmlImageElement>],
        hover: Option<ButtonId>,
    ) -> RenderResult {
        self.background()?;
        let center_x = self.canvas.width / 2.0;
        self.text("Choose a Picture", center_x, 80.0, "48px Arial", "#fff")?;

        let layout = PickerLayout::new(self.canvas, picker);
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(
            layout.strip.x as f64,
            (layout.strip.y - 20.0) as f64,
            layout.strip.width as f64,
            (layout.strip.height + 40.0) as f64,
        );
        self.ctx.clip();
        let strip_result = self.thumbnails(&layout, thumbnails, hover);
        self.ctx.restore();
        strip_result?;

        self.ctx.set_fill_style_str("#fff");
        if let Some(rect) = layout.scroll_left {
            triangle(self.ctx, rect, true);
        }
        if let Some(rect) = layout.scroll_right {
            triangle(self.ctx, rect, false);
        }

        self.buttons(&layout.controls, hover)?;
        let size_label = |prefix: &str, value: u32, (x, y): (f32, f32)| -> RenderResult {
            let dim = if value == GRID_SIZE_MIN || value == GRID_SIZE_MAX {
                "#aaa"
            } else {
                "#fff"
            };
            self.text(&value.to_string(), x, y + 7.0, "20px Arial", dim)?;
            self.text(prefix, x, y - 30.0, "16px Arial", "#ddd")
        };
        size_label("Rows", picker.rows(), layout.rows_label)?;
        size_label("Cols", picker.cols(), layout.cols_label)
    }

    fn thumbnails(
        &self,
        layout: &PickerLayout,
        thumbnails: &[Option<HtmlImageElement>],
        hover: Option<ButtonId>,
    ) -> RenderResult {
        for (index, rect) in layout.thumbnails.iter().enumerate() {
            if rect.x + rect.width < layout.strip.x
                || rect.x > layout.strip.x + layout.strip.width
            {
                continue;
            }
            let (x, y, w, h) = (
                rect.x as f64,
                rect.y as f64,
                rect.width as f64,
                rect.height as f64,
            );
            match thumbnails.get(index).and_then(Option::as_ref) {
                Some(image) => self
                    .ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h)?,
                None => {
                    self.ctx.set_fill_style_str("#444");
                    self.ctx.fill_rect(x, y, w, h);
                }
            }
            let hovered = hover == Some(ButtonId::Thumbnail(index));
            self.ctx
                .set_stroke_style_str(if hovered { "#fff" } else { "#666" });
            self.ctx.set_line_width(2.0);
            self.ctx.stroke_rect(x, y, w, h);
        }
        Ok(())
    }

    pub(crate) fn puzzle(
        &self,
        session: &PuzzleSession,
        image: Option<&HtmlImageElement>,
        surfaces: Option<&PieceSurfaces>,
        hover: Option<ButtonId>,
    ) -> RenderResult {
        self.background()?;
        match session.phase() {
            Phase::Loading => {
                let (x, y) = (self.canvas.width / 2.0, self.canvas.height / 2.0);
                return self.text("Loading...", x, y, "32px Arial", "#fff");
            }
            Phase::LoadFailed(err) => {
                let (x, y) = (self.canvas.width / 2.0, self.canvas.height / 2.0 - 40.0);
                self.text(&err.to_string(), x, y, "28px Arial", "#fff")?;
                return self.buttons(&load_failed_buttons(self.canvas), hover);
            }
            _ => {}
        }
        let Some(board) = session.board() else {
            return Ok(());
        };
        self.board_background(board)?;
        if let Some(surfaces) = surfaces {
            for piece in board.render_order() {
                if let Some(surface) = surfaces.get(piece.id) {
                    self.piece(piece, surface)?;
                }
            }
        }

        if *session.phase() == Phase::PreShuffle {
            return self.preshuffle(session, board.area(), image, hover);
        }

        self.text_left(
            &format!("Time: {}", session.elapsed_label()),
            20.0,
            35.0,
            "24px Arial",
        )?;
        if !matches!(session.phase(), Phase::GameOver) {
            self.buttons(&hud_buttons(self.canvas, session.is_paused()), hover)?;
        }
        if session.is_paused() {
            let area = board.area();
            self.ctx.set_fill_style_str("rgba(0,0,0,0.6)");
            self.ctx.fill_rect(
                area.x as f64,
                area.y as f64,
                area.width as f64,
                area.height as f64,
            );
            let (x, y) = (self.canvas.width / 2.0, self.canvas.height / 2.0);
            self.text("PAUSED", x, y, "48px Arial", "#fff")?;
        }
        Ok(())
    }

    fn text_left(&self, text: &str, x: f32, y: f32, font: &str) -> RenderResult {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str("#fff");
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("alphabetic");
        self.ctx.fill_text(text, x as f64, y as f64)
    }

    fn board_background(&self, board: &Board) -> RenderResult {
        let area = board.area();
        let (x, y, w, h) = (
            area.x as f64,
            area.y as f64,
            area.width as f64,
            area.height as f64,
        );
        if let Some(wood) = self.assets.ready("wood") {
            self.ctx.save();
            self.ctx.set_global_alpha(0.7);
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(&wood, x, y, w, h)?;
            self.ctx.set_global_composite_operation("multiply")?;
            self.ctx.set_fill_style_str("rgba(0, 0, 124, 0.7)");
            self.ctx.fill_rect(x, y, w, h);
            self.ctx.restore();
        }
        self.ctx.set_stroke_style_str("rgba(156, 160, 166, 0.7)");
        self.ctx.set_line_width(3.0);
        self.ctx.stroke_rect(x, y, w, h);

        self.ctx.set_stroke_style_str("rgba(255,255,255,0.5)");
        self.ctx.set_line_width(1.0);
        let (cell_w, cell_h) = board.cell_size();
        for row in 1..board.rows() {
            let line_y = y + (row as f32 * cell_h) as f64;
            self.ctx.begin_path();
            self.ctx.move_to(x, line_y);
            self.ctx.line_to(x + w, line_y);
            self.ctx.stroke();
        }
        for col in 1..board.cols() {
            let line_x = x + (col as f32 * cell_w) as f64;
            self.ctx.begin_path();
            self.ctx.move_to(line_x, y);
            self.ctx.line_to(line_x, y + h);
            self.ctx.stroke();
        }
        Ok(())
    }

    fn piece(&self, piece: &Piece, surface: &PieceSurface) -> RenderResult {
        let (x, y) = piece.draw_origin();
        self.ctx
            .draw_image_with_html_canvas_element(&surface.canvas, x as f64, y as f64)?;
        if piece.is_highlighted() {
            self.ctx.save();
            let moved = self.ctx.translate(piece.x as f64, piece.y as f64);
            if moved.is_ok() {
                self.ctx.set_line_width(3.0);
                self.ctx.set_stroke_style_str(PIECE_HIGHLIGHT);
                self.ctx.stroke_with_path(&surface.outline);
            }
            self.ctx.restore();
            moved?;
        }
        Ok(())
    }

    fn preshuffle(
        &self,
        session: &PuzzleSession,
        area: DrawArea,
        image: Option<&HtmlImageElement>,
        hover: Option<ButtonId>,
    ) -> RenderResult {
        if let Some(image) = image.filter(|image| image_ready(image)) {
            self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                image,
                area.x as f64,
                area.y as f64,
                area.width as f64,
                area.height as f64,
            )?;
        }
        let start = start_button(self.canvas);
        self.button(&start, hover == Some(start.id))?;

        let Some(remaining) = session.countdown_remaining() else {
            return Ok(());
        };
        let label = if remaining > 0 {
            remaining.to_string()
        } else {
            "Go!".to_string()
        };
        self.ctx.set_font("100px Arial");
        self.ctx.set_fill_style_str("rgba(216, 221, 230, 0.7)");
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.fill_text(
            &label,
            (area.x + area.width / 2.0) as f64,
            (area.y + area.height / 2.0) as f64,
        )
    }

    pub(crate) fn victory(
        &self,
        scene: &VictoryScene,
        snapshot: Option<&HtmlCanvasElement>,
        now_ms: f64,
        hover: Option<ButtonId>,
    ) -> RenderResult {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
        match snapshot {
            Some(snapshot) => self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                snapshot,
                0.0,
                0.0,
                self.width(),
                self.height(),
            )?,
            None => {
                self.ctx.set_fill_style_str("#111");
                self.ctx.fill_rect(0.0, 0.0, self.width(), self.height());
            }
        }

        if scene.is_revealed(now_ms) {
            self.victory_panel(scene, hover)?;
        }

        for particle in scene.confetti.particles() {
            self.ctx.save();
            self.ctx.set_global_alpha(particle.alpha.max(0.0) as f64);
            self.ctx.set_fill_style_str(particle.color);
            self.ctx.translate(particle.x as f64, particle.y as f64)?;
            self.ctx.rotate((particle.rotation as f64).to_radians())?;
            let size = particle.size as f64;
            self.ctx.fill_rect(-size / 2.0, -size / 2.0, size, size);
            self.ctx.restore();
        }
        Ok(())
    }

    fn victory_panel(&self, scene: &VictoryScene, hover: Option<ButtonId>) -> RenderResult {
        self.ctx.set_fill_style_str("rgba(0,0,0,0.6)");
        self.ctx.fill_rect(0.0, 0.0, self.width(), self.height());
        let center_x = self.canvas.width / 2.0;
        self.text("🎉 You Did It!", center_x, 100.0, "48px Arial", "#fff")?;

        let stars = scene.payload.stars as f32;
        let row_width = stars * STAR_SIZE + (stars - 1.0).max(0.0) * STAR_GAP;
        let first_x = center_x - row_width / 2.0 + STAR_SIZE / 2.0;
        self.ctx.set_fill_style_str("gold");
        for index in 0..scene.payload.stars {
            let cx = first_x + index as f32 * (STAR_SIZE + STAR_GAP);
            polygon(self.ctx, &star_points(cx, VICTORY_STARS_Y, STAR_SIZE));
            self.ctx.fill();
        }

        self.text(
            &format!("Time: {}", scene.payload.elapsed_label),
            center_x,
            VICTORY_STARS_Y + 100.0,
            "24px Arial",
            "#fff",
        )?;
        if scene.payload.new_best {
            self.text(
                "🎉 New Best Time!🎉",
                center_x,
                VICTORY_STARS_Y + 140.0,
                "22px Arial",
                "#00ffcc",
            )?;
        }
        self.buttons(&victory_buttons(self.canvas), hover)
    }
}

fn polygon(ctx: &CanvasRenderingContext2d, points: &[(f32, f32)]) {
    ctx.begin_path();
    let mut points = points.iter();
    if let Some((x, y)) = points.next() {
        ctx.move_to(*x as f64, *y as f64);
    }
    for (x, y) in points {
        ctx.line_to(*x as f64, *y as f64);
    }
    ctx.close_path();
}

fn triangle(ctx: &CanvasRenderingContext2d, rect: Rect, pointing_left: bool) {
    let (left, right) = (rect.x, rect.x + rect.width);
    let (top, bottom, mid) = (rect.y, rect.y + rect.height, rect.y + rect.height / 2.0);
    let points = if pointing_left {
        [(right, top), (left, mid), (right, bottom)]
    } else {
        [(left, top), (right, mid), (left, bottom)]
    };
    polygon(ctx, &points);
    ctx.fill();
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, rect: Rect, radius: f64) -> RenderResult {
    let (x, y, w, h) = (
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    );
    let r = radius.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r)?;
    ctx.arc_to(x + w, y + h, x, y + h, r)?;
    ctx.arc_to(x, y + h, x, y, r)?;
    ctx.arc_to(x, y, x + w, y, r)?;
    ctx.close_path();
    Ok(())
}

pub(crate) struct PieceSurface {
    canvas: HtmlCanvasElement,
    outline: Path2d,
}

/// Pre-cut piece images for one board layout. Stale once the picture, the
/// draw area or the tabs change.
pub(crate) struct PieceSurfaces {
    src: String,
    area: DrawArea,
    tabs: TabMap,
    surfaces: Vec<PieceSurface>,
}

impl PieceSurfaces {
    pub(crate) fn build(board: &Board, image: &HtmlImageElement) -> Result<Self, JsValue> {
        let area = board.area();
        let mut surfaces = Vec::with_capacity(board.len());
        for piece in board.pieces() {
            let (width, height) = piece.surface_size();
            let (canvas, ctx) = offscreen_canvas(width.ceil() as u32, height.ceil() as u32)?;
            let outline = piece_outline(piece.tabs, piece.width, piece.height);
            let clip = Path2d::new_with_path_string(&outline_to_svg_path(
                &outline,
                piece.margin,
                piece.margin,
            ))?;
            ctx.clip_with_path_2d(&clip);
            let (image_x, image_y) = image_offset(piece);
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                image,
                image_x as f64,
                image_y as f64,
                area.width as f64,
                area.height as f64,
            )?;
            ctx.set_line_width(2.0);
            ctx.set_stroke_style_str(PIECE_BORDER);
            ctx.stroke_with_path(&clip);
            let outline = Path2d::new_with_path_string(&outline_to_svg_path(&outline, 0.0, 0.0))?;
            surfaces.push(PieceSurface { canvas, outline });
        }
        Ok(Self {
            src: image.src(),
            area,
            tabs: board.tabs().clone(),
            surfaces,
        })
    }

    pub(crate) fn matches(&self, board: &Board, image: &HtmlImageElement) -> bool {
        self.area == board.area() && &self.tabs == board.tabs() && self.src == image.src()
    }

    pub(crate) fn get(&self, id: usize) -> Option<&PieceSurface> {
        self.surfaces.get(id)
    }
}

/// Where the full picture goes inside a piece surface so the piece's own
/// cell lands inside the margin.
fn image_offset(piece: &Piece) -> (f32, f32) {
    (
        piece.margin - piece.col as f32 * piece.width,
        piece.margin - piece.row as f32 * piece.height,
    )
}

fn offscreen_canvas(
    width: u32,
    height: u32,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width(width.max(1));
    canvas.set_height(height.max(1));
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((canvas, ctx))
}

/// Copies the visible canvas into a detached one, used as the frozen
/// backdrop of the victory screen.
pub(crate) fn snapshot_canvas(source: &HtmlCanvasElement) -> Result<HtmlCanvasElement, JsValue> {
    let (canvas, ctx) = offscreen_canvas(source.width(), source.height())?;
    ctx.draw_image_with_html_canvas_element(source, 0.0, 0.0)?;
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use piece_perfect_core::EdgeTabs;

    #[test]
    fn picture_offset_puts_the_cell_inside_the_margin() {
        let piece = Piece::new(
            5,
            1,
            2,
            (0.0, 0.0),
            (0.0, 0.0),
            (100.0, 80.0),
            40.0,
            EdgeTabs::FLAT,
        );
        assert_eq!(image_offset(&piece), (-160.0, -40.0));
        assert_eq!(piece.surface_size(), (180.0, 160.0));
    }

    #[test]
    fn grid_pieces_have_no_margin() {
        let piece = Piece::new(
            0,
            0,
            0,
            (10.0, 10.0),
            (10.0, 10.0),
            (50.0, 50.0),
            0.0,
            EdgeTabs::FLAT,
        );
        assert_eq!(image_offset(&piece), (0.0, 0.0));
        assert_eq!(piece.draw_origin(), (10.0, 10.0));
    }
}
