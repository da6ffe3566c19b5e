use dimension_reporter_core::{
    Dimensions, Host, HostError, ListenerId, ResizeListener, TimerCallback, TimerId,
};
use gloo_timers::callback::Timeout;
use slab::Slab;
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
    time::Duration,
};
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::Window;

/// A [`Host`] backed by the global `window` object.
pub struct WebHost {
    window: Window,
    listeners: RefCell<Slab<Closure<dyn Fn()>>>,
    timers: RefCell<HashMap<u64, PendingTimeout>>,
    next_timer: Cell<u64>,
}

struct PendingTimeout {
    // dropping a gloo timeout clears it
    _timeout: Timeout,
    fired: Rc<Cell<bool>>,
}

impl WebHost {
    /// Attach to the global `window`. Fails inside web workers, which have no window.
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window()
            .ok_or_else(|| HostError::new("window", "no global `window` exists"))?;

        Ok(Self {
            window,
            listeners: RefCell::new(Slab::new()),
            timers: RefCell::new(HashMap::new()),
            next_timer: Cell::new(0),
        })
    }
}

impl Host for WebHost {
    fn measure(&self) -> Result<Dimensions, HostError> {
        let screen = self
            .window
            .screen()
            .map_err(|err| js_error("screen", err))?;
        let screen_width = screen
            .width()
            .map_err(|err| js_error("screen.width", err))?;

        Ok(Dimensions::new(
            number("innerWidth", self.window.inner_width())?,
            number("innerHeight", self.window.inner_height())?,
            number("outerWidth", self.window.outer_width())?,
            number("outerHeight", self.window.outer_height())?,
            f64::from(screen_width),
        ))
    }

    fn add_resize_listener(&self, listener: ResizeListener) -> Result<ListenerId, HostError> {
        let closure = Closure::<dyn Fn()>::new(move || listener());

        self.window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|err| js_error("addEventListener", err))?;

        let id = self.listeners.borrow_mut().insert(closure);
        tracing::trace!(id, "attached resize listener");
        Ok(ListenerId(id))
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        let Some(closure) = self.listeners.borrow_mut().try_remove(id.0) else {
            return;
        };

        if let Err(err) = self
            .window
            .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            tracing::warn!("failed to detach resize listener: {}", js_error("removeEventListener", err));
        }
    }

    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> Result<TimerId, HostError> {
        let mut timers = self.timers.borrow_mut();

        // timeouts that already ran are only kept around until the next one is scheduled. one that
        // is still running its callback is not marked yet, so it is never dropped mid-call
        timers.retain(|_, pending| !pending.fired.get());

        let fired = Rc::new(Cell::new(false));
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, {
            let fired = fired.clone();
            move || {
                callback();
                fired.set(true);
            }
        });

        let id = self.next_timer.get();
        self.next_timer.set(id + 1);
        timers.insert(
            id,
            PendingTimeout {
                _timeout: timeout,
                fired,
            },
        );

        Ok(TimerId(id))
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id.0);
    }
}

fn number(call: &'static str, value: Result<JsValue, JsValue>) -> Result<f64, HostError> {
    value
        .map_err(|err| js_error(call, err))?
        .as_f64()
        .ok_or_else(|| HostError::new(call, "value is not a number"))
}

fn js_error(call: &'static str, err: JsValue) -> HostError {
    HostError::new(call, format!("{err:?}"))
}
