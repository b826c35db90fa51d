#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lockpad_core::geometry::{Point, Size};
use lockpad_core::haptics::Haptics;
use lockpad_render::{Rgba, Stroke, Surface};
use lockpad_runtime::{
    KeyValueStore, LockConfig, LockScreen, Screen, StorageError, StorageResult,
};
use lockpad_widgets::{Path, PatternCanvas, PatternConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::input::{CanvasOrigin, DOM_EVENT_TYPES, PointerInput, TouchPoint, dom_event_phase};

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// [`Surface`] over a `<canvas>` 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn circle(&self, center: Point, radius: f64) {
        self.ctx.begin_path();
        // Only fails for a negative radius, which the grid never produces.
        self.ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .ok();
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx
            .clear_rect(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.circle(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) {
        self.circle(center, radius);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width);
        self.ctx.stroke();
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width);
        self.ctx.stroke();
    }
}

/// `navigator.vibrate`, silently absent where unsupported.
#[derive(Debug, Default, Clone, Copy)]
pub struct VibrateHaptics;

impl Haptics for VibrateHaptics {
    fn pulse(&mut self, duration: Duration) {
        if let Some(window) = web_sys::window() {
            let ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
            let _ = window.navigator().vibrate_with_duration(ms);
        }
    }
}

/// [`KeyValueStore`] over `window.localStorage`.
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// The page's local storage, if the browser grants it.
    pub fn open() -> StorageResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| unavailable(&e))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

fn unavailable(err: &JsValue) -> StorageError {
    StorageError::Unavailable(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl KeyValueStore for LocalStorageStore {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key).map_err(|e| unavailable(&e))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage.set_item(key, value).map_err(|e| unavailable(&e))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key).map_err(|e| unavailable(&e))
    }
}

fn pointer_input(event: &Event) -> Option<PointerInput> {
    let (phase, _) = dom_event_phase(&event.type_())?;
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        let list = touch.touches();
        let touches = (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|t| TouchPoint::new(f64::from(t.client_x()), f64::from(t.client_y())))
            .collect();
        return Some(PointerInput::touch(phase, touches));
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(PointerInput::mouse(
        phase,
        f64::from(mouse.client_x()),
        f64::from(mouse.client_y()),
    ))
}

type Listener = Closure<dyn FnMut(Event)>;

/// Pattern lock bound to a `<canvas>`.
///
/// `onComplete` receives the finished path as an array of node ids after
/// every release. It runs after the widget has released its borrow, so it may
/// call `reset()` directly.
#[wasm_bindgen]
pub struct PatternLockWeb {
    canvas: HtmlCanvasElement,
    widget: Rc<RefCell<PatternCanvas<CanvasSurface>>>,
    listeners: Vec<(&'static str, Listener)>,
}

#[wasm_bindgen]
impl PatternLockWeb {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        on_complete: js_sys::Function,
    ) -> Result<PatternLockWeb, JsValue> {
        let surface = CanvasSurface::new(canvas.clone())?;
        let widget = PatternCanvas::new(surface, PatternConfig::default())
            .with_haptics(VibrateHaptics);
        let widget = Rc::new(RefCell::new(widget));

        let mut listeners = Vec::with_capacity(DOM_EVENT_TYPES.len());
        for &event_type in &DOM_EVENT_TYPES {
            let target = canvas.clone();
            let sink = Rc::clone(&widget);
            let callback = on_complete.clone();
            let listener = Listener::new(move |event: Event| {
                let Some(input) = pointer_input(&event) else {
                    return;
                };
                if event.dyn_ref::<TouchEvent>().is_some() {
                    event.prevent_default();
                }
                let rect = target.get_bounding_client_rect();
                let pointer = input.normalize(CanvasOrigin::new(rect.left(), rect.top()));
                let Ok(mut widget) = sink.try_borrow_mut() else {
                    return;
                };
                let completed = widget.handle(&pointer);
                drop(widget);
                if let Some(path) = completed {
                    let ids: js_sys::Array = path.iter().map(|id| JsValue::from(id.get())).collect();
                    let _ = callback.call1(&JsValue::NULL, &ids);
                }
            });
            canvas.add_event_listener_with_callback(
                event_type,
                listener.as_ref().unchecked_ref(),
            )?;
            listeners.push((event_type, listener));
        }

        Ok(Self {
            canvas,
            widget,
            listeners,
        })
    }

    /// Clear the drawn path and redraw the idle grid.
    pub fn reset(&mut self) {
        if let Ok(mut widget) = self.widget.try_borrow_mut() {
            widget.reset();
        }
    }

    /// Recompute node positions after the canvas was resized.
    pub fn relayout(&mut self) {
        if let Ok(mut widget) = self.widget.try_borrow_mut() {
            widget.relayout();
        }
    }

    /// Node ids of the current path.
    pub fn path(&self) -> Vec<u8> {
        self.widget
            .try_borrow()
            .map(|w| w.path().to_ids())
            .unwrap_or_default()
    }

    /// Detach every listener. The canvas keeps its last frame.
    pub fn destroy(&mut self) {
        for (event_type, listener) in self.listeners.drain(..) {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref());
        }
    }
}

fn screen_id(screen: Screen) -> &'static str {
    match screen {
        Screen::Setup => "setup",
        Screen::PinSetup => "pin_setup",
        Screen::PatternSetup => "pattern_setup",
        Screen::PinLogin => "pin_login",
        Screen::PatternLogin => "pattern_login",
        Screen::Unlocked => "unlocked",
    }
}

/// Lock screen state persisted in `localStorage`.
///
/// Errors surface as JS exceptions carrying the user-facing message.
#[wasm_bindgen]
pub struct LockScreenWeb {
    inner: LockScreen<LocalStorageStore>,
}

#[wasm_bindgen]
impl LockScreenWeb {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<LockScreenWeb, JsValue> {
        let store = LocalStorageStore::open().map_err(js_error)?;
        let inner = LockScreen::open(store, LockConfig::default()).map_err(js_error)?;
        Ok(Self { inner })
    }

    /// Current screen as a snake_case id (`"pin_login"`, ...).
    pub fn screen(&self) -> String {
        screen_id(self.inner.screen()).to_owned()
    }

    #[wasm_bindgen(js_name = choosePin)]
    pub fn choose_pin(&mut self) -> Result<(), JsValue> {
        self.inner.choose_pin().map_err(js_error)
    }

    #[wasm_bindgen(js_name = choosePattern)]
    pub fn choose_pattern(&mut self) -> Result<(), JsValue> {
        self.inner.choose_pattern().map_err(js_error)
    }

    pub fn back(&mut self) -> Result<(), JsValue> {
        self.inner.back().map_err(js_error)
    }

    /// Enter one keypad digit. Returns whether it was accepted.
    #[wasm_bindgen(js_name = pressKey)]
    pub fn press_key(&mut self, key: &str) -> Result<bool, JsValue> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(digit), None) => self.inner.press_key(digit).map_err(js_error),
            _ => Ok(false),
        }
    }

    pub fn backspace(&mut self) -> Result<(), JsValue> {
        self.inner.backspace().map_err(js_error)
    }

    #[wasm_bindgen(js_name = clearPin)]
    pub fn clear_pin(&mut self) -> Result<(), JsValue> {
        self.inner.clear_pin().map_err(js_error)
    }

    #[wasm_bindgen(js_name = togglePinVisibility)]
    pub fn toggle_pin_visibility(&mut self) -> Result<bool, JsValue> {
        self.inner.toggle_pin_visibility().map_err(js_error)
    }

    /// The PIN entry, one character per slot.
    #[wasm_bindgen(js_name = pinDisplay)]
    pub fn pin_display(&self) -> String {
        self.inner.pin_pad().display_string()
    }

    #[wasm_bindgen(js_name = savePin)]
    pub fn save_pin(&mut self) -> Result<(), JsValue> {
        self.inner.save_pin().map_err(js_error)
    }

    #[wasm_bindgen(js_name = submitPin)]
    pub fn submit_pin(&mut self) -> Result<(), JsValue> {
        self.inner.submit_pin().map_err(js_error)
    }

    /// Feed a finished path from [`PatternLockWeb`]'s callback.
    #[wasm_bindgen(js_name = patternCompleted)]
    pub fn pattern_completed(&mut self, ids: Vec<u8>) -> Result<bool, JsValue> {
        let path = Path::from_ids(ids).map_err(js_error)?;
        self.inner.pattern_completed(&path).map_err(js_error)
    }

    #[wasm_bindgen(js_name = savePattern)]
    pub fn save_pattern(&mut self) -> Result<(), JsValue> {
        self.inner.save_pattern().map_err(js_error)
    }

    #[wasm_bindgen(js_name = submitPattern)]
    pub fn submit_pattern(&mut self) -> Result<(), JsValue> {
        self.inner.submit_pattern().map_err(js_error)
    }

    #[wasm_bindgen(js_name = isUnlocked)]
    pub fn is_unlocked(&self) -> bool {
        self.inner.is_unlocked()
    }
}
