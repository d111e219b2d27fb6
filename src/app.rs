use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::{Interval, Timeout};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlImageElement, HtmlInputElement,
    KeyboardEvent, MouseEvent, TouchEvent, WheelEvent,
};

use piece_perfect_core::catalog::UI_ASSETS;
use piece_perfect_core::flow::ARROW_SCROLL_STEP;
use piece_perfect_core::{
    CanvasSize, NavIntent, Phase, PuzzleSession, Screen, ScreenFlow, SessionCommand,
};

use crate::assets::{image_ready, load_image, AssetLoader, PendingImage};
use crate::input::{
    map_key, mouse_point, screen_to_canvas_coords, touch_point, wheel_scroll_delta, DragSlopGate,
    KeyAction, TAP_SLOP_PX,
};
use crate::render::{snapshot_canvas, Painter, PieceSurfaces};
use crate::storage::{load_rules, LocalStorageBestTimes};
use crate::ui::{
    hit, hud_buttons, load_failed_buttons, start_button, victory_buttons, ButtonId, MenuLayout,
    PickerLayout,
};
use crate::victory::VictoryScene;

const CANVAS_ID: &str = "game-canvas";
const POLL_INTERVAL_MS: u32 = 100;

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn active_listener() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    }
}

fn log_js_error(_context: &str, _err: &JsValue) {
    #[cfg(target_arch = "wasm32")]
    {
        gloo::console::error!(_context, _err.clone());
    }
}

pub(crate) fn run() {
    #[cfg(target_arch = "wasm32")]
    {
        match App::boot() {
            Ok(app) => APP.with(|slot| *slot.borrow_mut() = Some(app)),
            Err(err) => log_js_error("boot failed", &err),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!("piece-perfect only runs in the browser (wasm32)");
    }
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

struct PickerTouch {
    gate: DragSlopGate,
    start_scroll: f32,
}

struct App {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    file_input: HtmlInputElement,
    flow: RefCell<ScreenFlow>,
    assets: AssetLoader,
    rng: RefCell<StdRng>,
    best_times: RefCell<LocalStorageBestTimes>,
    puzzle_image: RefCell<Option<PendingImage>>,
    piece_surfaces: RefCell<Option<PieceSurfaces>>,
    victory: RefCell<Option<VictoryScene>>,
    victory_snapshot: RefCell<Option<HtmlCanvasElement>>,
    hover: Cell<Option<ButtonId>>,
    picker_touch: RefCell<Option<PickerTouch>>,
    listeners: RefCell<Vec<EventListener>>,
    screen_listeners: RefCell<Vec<EventListener>>,
    listener_generation: Cell<Option<u64>>,
    swap_timer: RefCell<Option<Timeout>>,
    frame: RefCell<Option<AnimationFrame>>,
    interval: RefCell<Option<Interval>>,
}

impl App {
    fn boot() -> Result<Rc<Self>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?;
        let canvas = match document.get_element_by_id(CANVAS_ID) {
            Some(element) => element.dyn_into::<HtmlCanvasElement>()?,
            None => {
                let canvas = document
                    .create_element("canvas")?
                    .dyn_into::<HtmlCanvasElement>()?;
                canvas.set_id(CANVAS_ID);
                body.append_child(&canvas)?;
                canvas
            }
        };
        canvas.style().set_property("display", "block")?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let file_input = document
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()?;
        file_input.set_type("file");
        file_input.set_accept("image/*");
        file_input.style().set_property("display", "none")?;
        body.append_child(&file_input)?;

        let size = window_canvas_size();
        canvas.set_width(size.width as u32);
        canvas.set_height(size.height as u32);

        let seed = (now_ms() as u64) ^ (js_sys::Math::random() * u32::MAX as f64) as u64;
        let app = Rc::new(Self {
            canvas,
            ctx,
            file_input,
            flow: RefCell::new(ScreenFlow::new(load_rules(), size)),
            assets: AssetLoader::new(),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            best_times: RefCell::new(LocalStorageBestTimes),
            puzzle_image: RefCell::new(None),
            piece_surfaces: RefCell::new(None),
            victory: RefCell::new(None),
            victory_snapshot: RefCell::new(None),
            hover: Cell::new(None),
            picker_touch: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            screen_listeners: RefCell::new(Vec::new()),
            listener_generation: Cell::new(None),
            swap_timer: RefCell::new(None),
            frame: RefCell::new(None),
            interval: RefCell::new(None),
        });

        for asset in UI_ASSETS {
            app.assets.load(asset.name, asset.src)?;
        }
        app.install_listeners();
        app.install_screen_listeners();
        app.start_interval();
        let ready = Rc::clone(&app);
        app.assets.when_done(move || {
            #[cfg(target_arch = "wasm32")]
            {
                gloo::console::log!("assets: ready");
            }
            ready.request_render();
        });
        app.request_render();
        Ok(app)
    }

    fn canvas_size(&self) -> CanvasSize {
        self.flow.borrow().canvas()
    }

    fn to_canvas(&self, (screen_x, screen_y): (f32, f32)) -> Option<(f32, f32)> {
        screen_to_canvas_coords(screen_x, screen_y, &self.canvas, self.canvas_size())
    }

    fn start_interval(self: &Rc<Self>) {
        let app = Rc::clone(self);
        let interval = Interval::new(POLL_INTERVAL_MS, move || {
            let now = now_ms();
            let redraw = app
                .flow
                .borrow_mut()
                .session_mut()
                .is_some_and(|session| session.tick(now));
            if redraw {
                app.request_render();
            }
        });
        *self.interval.borrow_mut() = Some(interval);
    }

    /// Listeners that live as long as the app: resize and the hidden
    /// upload input.
    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();
        if let Some(window) = web_sys::window() {
            let app = Rc::clone(self);
            listeners.push(EventListener::new(&window, "resize", move |_event: &Event| {
                app.resize();
            }));
        }

        let app = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.file_input,
            "change",
            move |_event: &Event| {
                app.upload_selected();
            },
        ));

        let listener = EventListener::new_with_options(
            &self.canvas,
            "contextmenu",
            active_listener(),
            move |event: &Event| {
                event.prevent_default();
            },
        );
        listeners.push(listener);
        *self.listeners.borrow_mut() = listeners;
    }

    /// Swaps the canvas and keyboard listeners for the current screen.
    /// Runs from a zero-delay timeout because the listener that caused the
    /// screen change may still be on the stack.
    fn schedule_listener_swap(self: &Rc<Self>) {
        let app = Rc::clone(self);
        let timer = Timeout::new(0, move || {
            app.swap_timer.borrow_mut().take();
            app.install_screen_listeners();
        });
        *self.swap_timer.borrow_mut() = Some(timer);
    }

    fn install_screen_listeners(self: &Rc<Self>) {
        let (generation, screen) = {
            let flow = self.flow.borrow();
            (flow.generation(), ScreenKind::of(flow.screen()))
        };
        if self.listener_generation.get() == Some(generation) {
            return;
        }
        let mut listeners = Vec::new();
        let canvas = self.canvas.clone();

        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &canvas,
            "mousedown",
            active_listener(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                if event.button() != 0 {
                    return;
                }
                if let Some((x, y)) = app.to_canvas(mouse_point(event)) {
                    app.press(x, y);
                }
            },
        ));

        let app = Rc::clone(self);
        listeners.push(EventListener::new(&canvas, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            if let Some((x, y)) = app.to_canvas(mouse_point(event)) {
                app.pointer_moved(x, y);
            }
        }));

        match screen {
            ScreenKind::Puzzle => {
                let app = Rc::clone(self);
                listeners.push(EventListener::new(&canvas, "mouseup", move |_event: &Event| {
                    app.release();
                }));
                self.push_touch_listeners(&mut listeners);
                if let Some(window) = web_sys::window() {
                    let app = Rc::clone(self);
                    listeners.push(EventListener::new_with_options(
                        &window,
                        "keydown",
                        active_listener(),
                        move |event: &Event| {
                            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                                return;
                            };
                            let ctrl = event.ctrl_key() || event.meta_key();
                            if let Some(action) = map_key(&event.key(), ctrl) {
                                event.prevent_default();
                                app.key_action(action);
                            }
                        },
                    ));
                }
            }
            ScreenKind::Picker => {
                let app = Rc::clone(self);
                listeners.push(EventListener::new_with_options(
                    &canvas,
                    "wheel",
                    active_listener(),
                    move |event: &Event| {
                        let Some(event) = event.dyn_ref::<WheelEvent>() else {
                            return;
                        };
                        event.prevent_default();
                        app.scroll_picker(wheel_scroll_delta(event));
                    },
                ));
                self.push_touch_listeners(&mut listeners);
            }
            ScreenKind::Menu | ScreenKind::Victory => {
                let app = Rc::clone(self);
                listeners.push(EventListener::new_with_options(
                    &canvas,
                    "touchstart",
                    active_listener(),
                    move |event: &Event| {
                        let Some(event) = event.dyn_ref::<TouchEvent>() else {
                            return;
                        };
                        event.prevent_default();
                        if let Some((x, y)) = touch_point(event).and_then(|p| app.to_canvas(p)) {
                            app.press(x, y);
                        }
                    },
                ));
            }
        }

        *self.screen_listeners.borrow_mut() = listeners;
        self.listener_generation.set(Some(generation));
    }

    fn push_touch_listeners(self: &Rc<Self>, listeners: &mut Vec<EventListener>) {
        let canvas = self.canvas.clone();
        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &canvas,
            "touchstart",
            active_listener(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                event.prevent_default();
                if let Some((x, y)) = touch_point(event).and_then(|p| app.to_canvas(p)) {
                    app.touch_start(x, y);
                }
            },
        ));

        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &canvas,
            "touchmove",
            active_listener(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                event.prevent_default();
                if let Some((x, y)) = touch_point(event).and_then(|p| app.to_canvas(p)) {
                    app.touch_move(x, y);
                }
            },
        ));

        for name in ["touchend", "touchcancel"] {
            let app = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &canvas,
                name,
                active_listener(),
                move |event: &Event| {
                    event.prevent_default();
                    app.touch_end();
                },
            ));
        }
    }

    fn hit_test(&self, x: f32, y: f32) -> Option<ButtonId> {
        let flow = self.flow.borrow();
        let canvas = flow.canvas();
        match flow.screen() {
            Screen::Menu(_) => hit(&MenuLayout::new(canvas).buttons(), x, y),
            Screen::ImagePicker(picker) => PickerLayout::new(canvas, picker).hit(x, y),
            Screen::Puzzle(session) => match session.phase() {
                Phase::Loading | Phase::GameOver => None,
                Phase::LoadFailed(_) => hit(&load_failed_buttons(canvas), x, y),
                Phase::PreShuffle => hit(&[start_button(canvas)], x, y),
                Phase::Active { paused } => hit(&hud_buttons(canvas, *paused), x, y),
            },
            Screen::Victory(_) => {
                let revealed = self
                    .victory
                    .borrow()
                    .as_ref()
                    .is_some_and(|scene| scene.is_revealed(now_ms()));
                if revealed {
                    hit(&victory_buttons(canvas), x, y)
                } else {
                    None
                }
            }
        }
    }

    fn press(self: &Rc<Self>, x: f32, y: f32) {
        let target = self.hit_test(x, y);
        if target == Some(ButtonId::Upload) {
            self.file_input.click();
            return;
        }
        if let Some(command) = target.and_then(button_command) {
            if target.is_some_and(needs_confirm) && !confirm(command) {
                return;
            }
            self.session_command(command);
            return;
        }

        let intent = {
            let mut flow = self.flow.borrow_mut();
            match flow.screen_mut() {
                Screen::Menu(menu) => match target {
                    Some(ButtonId::ModeCard(mode)) => {
                        menu.select(mode);
                        NavIntent::Stay
                    }
                    Some(ButtonId::StartGame) => menu.start(),
                    _ => NavIntent::Stay,
                },
                Screen::ImagePicker(picker) => match target {
                    Some(ButtonId::Thumbnail(index)) => picker.choose(index),
                    Some(ButtonId::ScrollLeft) => {
                        picker.scroll_by(-ARROW_SCROLL_STEP);
                        NavIntent::Stay
                    }
                    Some(ButtonId::ScrollRight) => {
                        picker.scroll_by(ARROW_SCROLL_STEP);
                        NavIntent::Stay
                    }
                    Some(ButtonId::RowsDown) => {
                        picker.step_rows(-1);
                        NavIntent::Stay
                    }
                    Some(ButtonId::RowsUp) => {
                        picker.step_rows(1);
                        NavIntent::Stay
                    }
                    Some(ButtonId::ColsDown) => {
                        picker.step_cols(-1);
                        NavIntent::Stay
                    }
                    Some(ButtonId::ColsUp) => {
                        picker.step_cols(1);
                        NavIntent::Stay
                    }
                    Some(ButtonId::PickerBack) => picker.back(),
                    _ => NavIntent::Stay,
                },
                Screen::Puzzle(session) => {
                    if target.is_none() && session.pointer_down(x, y) {
                        self.hover.set(None);
                    }
                    NavIntent::Stay
                }
                Screen::Victory(_) => match target {
                    Some(ButtonId::Next) => NavIntent::NextPuzzle,
                    Some(ButtonId::BackToMenu) => NavIntent::BackToMenu,
                    _ => NavIntent::Stay,
                },
            }
        };
        self.dispatch(intent);
    }

    fn pointer_moved(self: &Rc<Self>, x: f32, y: f32) {
        let dragged = self
            .flow
            .borrow_mut()
            .session_mut()
            .is_some_and(|session| session.pointer_move(x, y));
        if dragged {
            self.request_render();
            return;
        }
        let hover = self.hit_test(x, y);
        if hover != self.hover.get() {
            self.hover.set(hover);
            let cursor = if hover.is_some() { "pointer" } else { "default" };
            let _ = self.canvas.style().set_property("cursor", cursor);
            self.request_render();
        }
    }

    fn release(self: &Rc<Self>) {
        let now = now_ms();
        let intent = {
            let mut flow = self.flow.borrow_mut();
            let mut store = self.best_times.borrow_mut();
            match flow.session_mut() {
                Some(session) if session.is_dragging() => session.pointer_up(now, &mut *store),
                _ => return,
            }
        };
        self.dispatch(intent);
    }

    fn touch_start(self: &Rc<Self>, x: f32, y: f32) {
        let picker_strip = {
            let flow = self.flow.borrow();
            match flow.screen() {
                Screen::ImagePicker(picker) => {
                    let layout = PickerLayout::new(flow.canvas(), picker);
                    let in_strip = layout.strip.contains(x, y)
                        && !matches!(
                            layout.hit(x, y),
                            Some(ButtonId::ScrollLeft | ButtonId::ScrollRight)
                        );
                    in_strip.then(|| picker.scroll())
                }
                _ => None,
            }
        };
        match picker_strip {
            Some(start_scroll) => {
                *self.picker_touch.borrow_mut() = Some(PickerTouch {
                    gate: DragSlopGate::new(x, y, TAP_SLOP_PX),
                    start_scroll,
                });
            }
            None => self.press(x, y),
        }
    }

    fn touch_move(self: &Rc<Self>, x: f32, y: f32) {
        let drag = {
            let mut touch = self.picker_touch.borrow_mut();
            touch.as_mut().and_then(|touch| {
                touch
                    .gate
                    .update(x, y)
                    .then(|| touch.start_scroll - (x - touch.gate.start().0))
            })
        };
        match drag {
            Some(target) => {
                let scroll = match self.flow.borrow().screen() {
                    Screen::ImagePicker(picker) => Some(picker.scroll()),
                    _ => None,
                };
                if let Some(scroll) = scroll {
                    self.scroll_picker(target - scroll);
                }
            }
            None => self.pointer_moved(x, y),
        }
    }

    fn touch_end(self: &Rc<Self>) {
        let touch = self.picker_touch.borrow_mut().take();
        match touch {
            Some(touch) if !touch.gate.moved() => {
                let (x, y) = touch.gate.start();
                self.press(x, y);
            }
            Some(_) => {}
            None => self.release(),
        }
    }

    fn scroll_picker(self: &Rc<Self>, delta: f32) {
        if delta == 0.0 {
            return;
        }
        if let Screen::ImagePicker(picker) = self.flow.borrow_mut().screen_mut() {
            picker.scroll_by(delta);
        }
        self.request_render();
    }

    fn key_action(self: &Rc<Self>, action: KeyAction) {
        let command = match action {
            KeyAction::Undo => SessionCommand::Undo,
            KeyAction::Redo => SessionCommand::Redo,
            KeyAction::TogglePause => SessionCommand::TogglePause,
            KeyAction::Resume => SessionCommand::Resume,
        };
        self.session_command(command);
    }

    fn session_command(self: &Rc<Self>, command: SessionCommand) {
        let now = now_ms();
        let intent = {
            let mut flow = self.flow.borrow_mut();
            let mut store = self.best_times.borrow_mut();
            match flow.session_mut() {
                Some(session) => session.command(command, now, &mut *store),
                None => return,
            }
        };
        self.dispatch(intent);
    }

    fn upload_selected(self: &Rc<Self>) {
        let Some(file) = self.file_input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let url = match web_sys::Url::create_object_url_with_blob(&file) {
            Ok(url) => url,
            Err(err) => {
                log_js_error("upload: object url failed", &err);
                return;
            }
        };
        self.file_input.set_value("");
        if let Screen::ImagePicker(picker) = self.flow.borrow_mut().screen_mut() {
            picker.add_upload(url);
        }
        self.request_render();
    }

    fn resize(self: &Rc<Self>) {
        let size = window_canvas_size();
        self.canvas.set_width(size.width as u32);
        self.canvas.set_height(size.height as u32);
        self.flow.borrow_mut().set_canvas(size);
        self.request_render();
    }

    /// Applies a navigation intent. Victory snapshots the finished board
    /// before the screen changes.
    fn dispatch(self: &Rc<Self>, intent: NavIntent) {
        if intent == NavIntent::Stay {
            self.request_render();
            return;
        }
        let now = now_ms();
        if let NavIntent::Victory(payload) = &intent {
            self.render_now(now);
            match snapshot_canvas(&self.canvas) {
                Ok(snapshot) => *self.victory_snapshot.borrow_mut() = Some(snapshot),
                Err(err) => log_js_error("victory: snapshot failed", &err),
            }
            #[cfg(target_arch = "wasm32")]
            {
                gloo::console::log!("victory", payload.elapsed_label.as_str());
                if payload.new_best {
                    gloo::console::log!("victory: new best time", payload.elapsed_ms as f64);
                }
            }
            let scene = VictoryScene::new(
                payload.clone(),
                self.canvas_size(),
                now,
                &mut *self.rng.borrow_mut(),
            );
            *self.victory.borrow_mut() = Some(scene);
        }

        let applied = {
            let mut flow = self.flow.borrow_mut();
            let mut rng = self.rng.borrow_mut();
            flow.apply(intent, now, &mut *rng)
        };
        match applied {
            Ok(true) => self.screen_changed(),
            Ok(false) => {}
            Err(_err) => {
                #[cfg(target_arch = "wasm32")]
                {
                    gloo::console::warn!("puzzle rejected", _err.to_string());
                }
            }
        }
        self.request_render();
    }

    fn screen_changed(self: &Rc<Self>) {
        self.hover.set(None);
        self.picker_touch.borrow_mut().take();
        let _ = self.canvas.style().set_property("cursor", "default");
        let (generation, image_src) = {
            let flow = self.flow.borrow();
            #[cfg(target_arch = "wasm32")]
            {
                gloo::console::log!("screen:", flow.screen().name());
            }
            let src = flow
                .session()
                .map(|session| session.config().image_src.clone());
            (flow.generation(), src)
        };
        if !matches!(self.flow.borrow().screen(), Screen::Victory(_)) {
            self.victory.borrow_mut().take();
            self.victory_snapshot.borrow_mut().take();
        }
        self.puzzle_image.borrow_mut().take();
        self.piece_surfaces.borrow_mut().take();
        if let Some(src) = image_src {
            self.load_puzzle_image(generation, &src);
        }
        self.schedule_listener_swap();
    }

    fn load_puzzle_image(self: &Rc<Self>, generation: u64, src: &str) {
        let loaded = Rc::clone(self);
        let failed = Rc::clone(self);
        let pending = load_image(
            src,
            move |image| loaded.puzzle_image_loaded(generation, &image),
            move || failed.puzzle_image_failed(generation),
        );
        match pending {
            Ok(pending) => *self.puzzle_image.borrow_mut() = Some(pending),
            Err(err) => {
                log_js_error("puzzle image: element failed", &err);
                self.puzzle_image_failed(generation);
            }
        }
    }

    fn puzzle_image_loaded(self: &Rc<Self>, generation: u64, image: &HtmlImageElement) {
        let now = now_ms();
        {
            let mut flow = self.flow.borrow_mut();
            if flow.generation() != generation {
                return;
            }
            if let Some(session) = flow.session_mut() {
                session.image_loaded(image.natural_width(), image.natural_height(), now);
            }
        }
        self.request_render();
    }

    fn puzzle_image_failed(self: &Rc<Self>, generation: u64) {
        {
            let mut flow = self.flow.borrow_mut();
            if flow.generation() != generation {
                return;
            }
            #[cfg(target_arch = "wasm32")]
            {
                if let Some(session) = flow.session() {
                    gloo::console::warn!(
                        "puzzle image failed to load",
                        session.config().image_src.as_str()
                    );
                }
            }
            if let Some(session) = flow.session_mut() {
                session.image_failed();
            }
        }
        self.request_render();
    }

    fn request_render(self: &Rc<Self>) {
        if self.frame.borrow().is_some() {
            return;
        }
        let app = Rc::clone(self);
        let frame = request_animation_frame(move |_timestamp| {
            app.frame.borrow_mut().take();
            let now = now_ms();
            let animating = app.step_victory(now);
            app.render_now(now);
            if animating {
                app.request_render();
            }
        });
        *self.frame.borrow_mut() = Some(frame);
    }

    /// Advances the confetti. Returns whether another frame is needed.
    fn step_victory(&self, now: f64) -> bool {
        let mut victory = self.victory.borrow_mut();
        let Some(scene) = victory.as_mut() else {
            return false;
        };
        if !matches!(self.flow.borrow().screen(), Screen::Victory(_)) {
            return false;
        }
        scene.confetti.step(now, &mut *self.rng.borrow_mut());
        scene.confetti.is_active() || !scene.is_revealed(now)
    }

    fn render_now(self: &Rc<Self>, now: f64) {
        let flow = self.flow.borrow();
        let painter = Painter::new(&self.ctx, &self.assets, flow.canvas());
        let hover = self.hover.get();
        let result = match flow.screen() {
            Screen::Menu(menu) => painter.menu(menu, hover),
            Screen::ImagePicker(picker) => {
                let thumbnails: Vec<Option<HtmlImageElement>> = picker
                    .images()
                    .iter()
                    .map(|src| {
                        let app = Rc::clone(self);
                        self.assets.thumbnail(src, move || app.request_render())
                    })
                    .collect();
                painter.picker(picker, &thumbnails, hover)
            }
            Screen::Puzzle(session) => self.render_puzzle(&painter, session, hover),
            Screen::Victory(_) => match self.victory.borrow().as_ref() {
                Some(scene) => painter.victory(
                    scene,
                    self.victory_snapshot.borrow().as_ref(),
                    now,
                    hover,
                ),
                None => painter.background(),
            },
        };
        if let Err(err) = result {
            log_js_error("render failed", &err);
        }
    }

    fn render_puzzle(
        &self,
        painter: &Painter<'_>,
        session: &PuzzleSession,
        hover: Option<ButtonId>,
    ) -> Result<(), JsValue> {
        let pending = self.puzzle_image.borrow();
        let image = pending
            .as_ref()
            .map(|pending| &pending.image)
            .filter(|image| image_ready(image));
        if let (Some(board), Some(image)) = (session.board(), image) {
            let mut cached = self.piece_surfaces.borrow_mut();
            if !cached
                .as_ref()
                .is_some_and(|surfaces| surfaces.matches(board, image))
            {
                *cached = Some(PieceSurfaces::build(board, image)?);
            }
        }
        let surfaces = self.piece_surfaces.borrow();
        painter.puzzle(session, image, surfaces.as_ref(), hover)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScreenKind {
    Menu,
    Picker,
    Puzzle,
    Victory,
}

impl ScreenKind {
    fn of(screen: &Screen) -> Self {
        match screen {
            Screen::Menu(_) => ScreenKind::Menu,
            Screen::ImagePicker(_) => ScreenKind::Picker,
            Screen::Puzzle(_) => ScreenKind::Puzzle,
            Screen::Victory(_) => ScreenKind::Victory,
        }
    }
}

fn button_command(target: ButtonId) -> Option<SessionCommand> {
    match target {
        ButtonId::Pause => Some(SessionCommand::TogglePause),
        ButtonId::Undo => Some(SessionCommand::Undo),
        ButtonId::Redo => Some(SessionCommand::Redo),
        ButtonId::Restart => Some(SessionCommand::Restart),
        ButtonId::Exit => Some(SessionCommand::Exit),
        ButtonId::Start => Some(SessionCommand::Start),
        ButtonId::Retry => Some(SessionCommand::Retry),
        ButtonId::LeavePuzzle => Some(SessionCommand::Exit),
        _ => None,
    }
}

/// HUD restart and exit ask first; leaving a failed load does not.
fn needs_confirm(target: ButtonId) -> bool {
    matches!(target, ButtonId::Restart | ButtonId::Exit)
}

fn confirm(command: SessionCommand) -> bool {
    let message = match command {
        SessionCommand::Restart => "Restart the puzzle?",
        _ => "Exit to menu?",
    };
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn window_canvas_size() -> CanvasSize {
    let Some(window) = web_sys::window() else {
        return CanvasSize::new(1280.0, 720.0);
    };
    let read = |value: Result<JsValue, JsValue>, fallback: f64| {
        value.ok().and_then(|value| value.as_f64()).unwrap_or(fallback)
    };
    let width = read(window.inner_width(), 1280.0);
    let height = read(window.inner_height(), 720.0);
    CanvasSize::new(width.floor() as f32, height.floor() as f32)
}
