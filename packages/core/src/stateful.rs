//! A reporter with explicit lifecycle methods.
//!
//! [`StatefulReporter`] owns its state and exposes the lifecycle as methods: the embedding code
//! calls [`mount`](StatefulReporter::mount) when the component appears,
//! [`update_props`](StatefulReporter::update_props) when its inputs change and
//! [`unmount`](StatefulReporter::unmount) (or simply drops it) when it goes away.
//!
//! Host callbacks only hold a weak reference to the reporter, so a timer that elapses after the
//! reporter is gone finds nothing to act on.

use crate::{
    FetchTicket, HostHandle, ListenerId, Outcome, ReporterConfig, ReporterState, Result, TimerId,
    View,
};
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

/// The inputs of a [`StatefulReporter`].
///
/// The callback is required to build props at all, so a reporter can never exist without someone
/// to report to.
pub struct ReporterProps {
    pub multiplier: Option<f64>,
    pub on_new_total: Box<dyn FnMut(f64)>,
}

impl ReporterProps {
    pub fn new(on_new_total: impl FnMut(f64) + 'static) -> Self {
        Self {
            multiplier: None,
            on_new_total: Box::new(on_new_total),
        }
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }
}

/// A dimension reporter driven through lifecycle methods.
pub struct StatefulReporter {
    shared: Rc<Shared>,
}

struct Shared {
    host: HostHandle,
    config: ReporterConfig,
    state: RefCell<ReporterState>,
    on_new_total: RefCell<Box<dyn FnMut(f64)>>,
    // filled while `on_new_total` is running and drained once it returns
    queued: Cell<Option<f64>>,
    replacement: Cell<Option<Box<dyn FnMut(f64)>>>,
    listener: Cell<Option<ListenerId>>,
    timer: Cell<Option<TimerId>>,
}

impl StatefulReporter {
    /// Create a reporter. Nothing is registered with the host until [`StatefulReporter::mount`].
    pub fn new(props: ReporterProps, host: HostHandle, config: ReporterConfig) -> Result<Self> {
        let multiplier = config.multiplier(props.multiplier)?;

        Ok(Self {
            shared: Rc::new(Shared {
                host,
                config,
                state: RefCell::new(ReporterState::new(multiplier)),
                on_new_total: RefCell::new(props.on_new_total),
                queued: Cell::new(None),
                replacement: Cell::new(None),
                listener: Cell::new(None),
                timer: Cell::new(None),
            }),
        })
    }

    /// Start listening for resizes.
    pub fn mount(&self) -> Result<()> {
        self.shared.state.borrow_mut().mount()?;

        let weak = Rc::downgrade(&self.shared);
        let listener = self.shared.host.add_resize_listener(Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_resize(&weak);
            }
        }));

        match listener {
            Ok(id) => {
                self.shared.listener.set(Some(id));
                Ok(())
            }
            Err(err) => {
                self.shared.state.borrow_mut().unmount();
                Err(err.into())
            }
        }
    }

    /// Apply a new multiplier input. Re-reports from the measurements already held; never
    /// triggers a fetch.
    pub fn update_props(&self, multiplier: Option<f64>) -> Result<()> {
        let multiplier = self.shared.config.multiplier(multiplier)?;
        let outcome = self.shared.state.borrow_mut().set_multiplier(multiplier);
        self.shared.dispatch(outcome);
        Ok(())
    }

    /// Replace the callback totals are reported to.
    ///
    /// Called from inside the current callback, the swap happens once that call returns.
    pub fn set_on_new_total(&self, on_new_total: impl FnMut(f64) + 'static) {
        let on_new_total: Box<dyn FnMut(f64)> = Box::new(on_new_total);
        match self.shared.on_new_total.try_borrow_mut() {
            Ok(mut current) => *current = on_new_total,
            Err(_) => self.shared.replacement.set(Some(on_new_total)),
        }
    }

    /// Stop listening and drop any outstanding fetch. Calling it twice is harmless.
    pub fn unmount(&self) {
        let pending = self.shared.state.borrow_mut().unmount();

        if let Some(id) = self.shared.listener.take() {
            self.shared.host.remove_resize_listener(id);
        }

        if let Some(timer) = self.shared.timer.take() {
            tracing::debug!(ticket = ?pending.map(FetchTicket::id), "cancelling fetch on unmount");
            self.shared.host.clear_timeout(timer);
        }
    }

    pub fn render(&self) -> View {
        self.shared.state.borrow().view()
    }

    /// A copy of the current state, for inspection.
    pub fn snapshot(&self) -> ReporterState {
        self.shared.state.borrow().clone()
    }
}

impl Drop for StatefulReporter {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl Shared {
    fn on_resize(&self, weak: &Weak<Shared>) {
        let Some(request) = self.state.borrow_mut().resize() else {
            return;
        };

        if let Some(stale) = self.timer.take() {
            self.host.clear_timeout(stale);
        }

        let ticket = request.ticket;
        let weak = weak.clone();
        let scheduled = self.host.set_timeout(
            self.config.fetch_delay(),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_fetch_elapsed(ticket);
                }
            }),
        );

        match scheduled {
            Ok(timer) => self.timer.set(Some(timer)),
            Err(err) => {
                tracing::error!("failed to schedule dimension fetch: {err}");
                self.state.borrow_mut().abandon(ticket);
            }
        }
    }

    fn on_fetch_elapsed(&self, ticket: FetchTicket) {
        if self.state.borrow().pending() == Some(ticket) {
            self.timer.set(None);
        }

        let outcome = match self.host.measure() {
            Ok(dimensions) => self.state.borrow_mut().resolve(ticket, dimensions),
            Err(err) => {
                tracing::error!("failed to measure window: {err}");
                self.state.borrow_mut().abandon(ticket);
                return;
            }
        };

        self.dispatch(outcome);
    }

    fn dispatch(&self, outcome: Outcome) {
        let Outcome::Report(total) = outcome else {
            return;
        };

        let Ok(mut on_new_total) = self.on_new_total.try_borrow_mut() else {
            // raised from inside the callback; the outer call delivers it when the callback returns
            tracing::trace!(total, "queueing report raised from on_new_total");
            self.queued.set(Some(total));
            return;
        };

        let mut next = Some(total);
        while let Some(total) = next {
            on_new_total(total);

            if let Some(replacement) = self.replacement.take() {
                *on_new_total = replacement;
            }

            next = self.queued.take();
        }
    }
}
