use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsValue;
use web_sys::HtmlImageElement;

/// An image element plus the load/error listeners keeping its callbacks
/// alive. Dropping it detaches both callbacks.
pub(crate) struct PendingImage {
    pub image: HtmlImageElement,
    _listeners: [EventListener; 2],
}

/// Starts loading `src`. Exactly one of the callbacks runs, unless the
/// returned handle is dropped first.
pub(crate) fn load_image(
    src: &str,
    on_loaded: impl FnOnce(HtmlImageElement) + 'static,
    on_failed: impl FnOnce() + 'static,
) -> Result<PendingImage, JsValue> {
    let image = HtmlImageElement::new()?;
    let loaded_image = image.clone();
    let load = EventListener::once(&image, "load", move |_| on_loaded(loaded_image));
    let error = EventListener::once(&image, "error", move |_| on_failed());
    image.set_src(src);
    Ok(PendingImage {
        image,
        _listeners: [load, error],
    })
}

pub(crate) fn image_ready(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0
}

#[derive(Default)]
struct LoadCounter {
    expected: Cell<usize>,
    settled: Cell<usize>,
    on_done: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl LoadCounter {
    fn settle(&self) {
        self.settled.set(self.settled.get() + 1);
        self.fire_if_done();
    }

    fn fire_if_done(&self) {
        if self.settled.get() < self.expected.get() {
            return;
        }
        let callback = self.on_done.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Named UI images plus lazily loaded picture thumbnails.
#[derive(Default)]
pub(crate) struct AssetLoader {
    images: RefCell<HashMap<String, PendingImage>>,
    counter: Rc<LoadCounter>,
}

impl AssetLoader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn load(&self, name: &str, path: &str) -> Result<(), JsValue> {
        let counter = Rc::clone(&self.counter);
        counter.expected.set(counter.expected.get() + 1);
        let failed_counter = Rc::clone(&self.counter);
        let _failed_name = name.to_string();
        let pending = load_image(
            path,
            move |_| counter.settle(),
            move || {
                #[cfg(target_arch = "wasm32")]
                {
                    gloo::console::warn!("asset failed to load", _failed_name.as_str());
                }
                failed_counter.settle();
            },
        )?;
        self.images.borrow_mut().insert(name.to_string(), pending);
        Ok(())
    }

    /// Runs `callback` once every asset registered so far has settled.
    pub(crate) fn when_done(&self, callback: impl FnOnce() + 'static) {
        *self.counter.on_done.borrow_mut() = Some(Box::new(callback));
        self.counter.fire_if_done();
    }

    pub(crate) fn get(&self, name: &str) -> Option<HtmlImageElement> {
        self.images
            .borrow()
            .get(name)
            .map(|pending| pending.image.clone())
    }

    pub(crate) fn is_ready(&self, name: &str) -> bool {
        self.images
            .borrow()
            .get(name)
            .is_some_and(|pending| image_ready(&pending.image))
    }

    /// The ready image for `name`, if any.
    pub(crate) fn ready(&self, name: &str) -> Option<HtmlImageElement> {
        self.is_ready(name).then(|| self.get(name)).flatten()
    }

    /// Thumbnail for a picture source, started on first request.
    /// `on_ready` fires when a new thumbnail finishes loading.
    pub(crate) fn thumbnail(
        &self,
        src: &str,
        on_ready: impl FnOnce() + 'static,
    ) -> Option<HtmlImageElement> {
        if let Some(pending) = self.images.borrow().get(src) {
            return Some(pending.image.clone()).filter(image_ready);
        }
        match load_image(src, move |_| on_ready(), || {}) {
            Ok(pending) => {
                self.images.borrow_mut().insert(src.to_string(), pending);
            }
            Err(_err) => {
                #[cfg(target_arch = "wasm32")]
                {
                    gloo::console::warn!("thumbnail: image element failed", _err);
                }
            }
        }
        None
    }
}
