use crate::host::resolve_host;
use dimension_reporter_core::{
    derived_total, FetchTicket, Multiplier, Outcome, ReporterConfig, ReporterState, TimerId, View,
};
use dioxus::prelude::*;
use futures_channel::mpsc::{unbounded, UnboundedReceiver};
use futures_util::StreamExt;
use std::{cell::Cell, rc::Rc};

/// Events the fetch loop reacts to.
enum FetchEvent {
    Resize,
    Elapsed(FetchTicket),
}

/// Listen for window resizes and report the derived total of the latest measurements.
///
/// On every resize the hook starts a fetch that resolves after the configured delay (1500ms by
/// default, see [`ReporterConfig`]). A resize during an outstanding fetch replaces it, so only the
/// newest measurements are ever reported. When `multiplier` changes, the total is recomputed from
/// the measurements already held and reported again without measuring.
///
/// The window is read through the [`HostHandle`](dimension_reporter_core::HostHandle) in context.
/// On `wasm32` the browser window is used when no host has been provided.
///
/// Unmounting the component detaches the resize listener, cancels the pending timer and drops the
/// fetch loop, so nothing is reported afterwards.
///
/// ```rust, no_run
/// use dioxus::prelude::*;
/// use dimension_reporter::use_dimension_reporter;
///
/// fn Widths() -> Element {
///     let reporter = use_dimension_reporter(Some(2.0), EventHandler::new(|total: f64| {
///         tracing::info!("total is now {total}");
///     }));
///
///     let view = reporter.view();
///     rsx! { "{view}" }
/// }
/// ```
pub fn use_dimension_reporter(
    multiplier: Option<f64>,
    on_new_total: EventHandler<f64>,
) -> UseDimensionReporter {
    let config = try_use_context::<ReporterConfig>().unwrap_or_default();
    let host = use_hook(resolve_host);

    let mut state = use_signal(|| {
        let mut state = ReporterState::new(initial_multiplier(&config, multiplier));
        if host.is_some() {
            if let Err(err) = state.mount() {
                tracing::error!("failed to mount dimension reporter: {err}");
            }
        }
        state
    });

    // a new prop is rendered right away; the stored multiplier and the report follow in the effect
    let shown = config
        .multiplier(multiplier)
        .unwrap_or_else(|_| state.peek().multiplier());

    let pending_timer = use_hook(|| Rc::new(Cell::new(None::<TimerId>)));

    let fetches = use_coroutine({
        let host = host.clone();
        let config = config.clone();
        let pending_timer = pending_timer.clone();
        move |resizes: UnboundedReceiver<()>| {
            let host = host.clone();
            let config = config.clone();
            let pending_timer = pending_timer.clone();
            async move {
                let Some(host) = host else {
                    return;
                };

                let (elapsed_tx, elapsed_rx) = unbounded();
                let mut events = futures_util::stream::select(
                    resizes.map(|()| FetchEvent::Resize),
                    elapsed_rx.map(FetchEvent::Elapsed),
                );

                while let Some(event) = events.next().await {
                    match event {
                        FetchEvent::Resize => {
                            let Some(request) = state.write().resize() else {
                                continue;
                            };

                            if let Some(stale) = pending_timer.take() {
                                host.clear_timeout(stale);
                            }

                            let elapsed_tx = elapsed_tx.clone();
                            let ticket = request.ticket;
                            let scheduled = host.set_timeout(
                                config.fetch_delay(),
                                Box::new(move || {
                                    _ = elapsed_tx.unbounded_send(ticket);
                                }),
                            );

                            match scheduled {
                                Ok(timer) => pending_timer.set(Some(timer)),
                                Err(err) => {
                                    tracing::error!("failed to schedule dimension fetch: {err}");
                                    state.write().abandon(ticket);
                                }
                            }
                        }

                        FetchEvent::Elapsed(ticket) => {
                            if state.peek().pending() == Some(ticket) {
                                pending_timer.set(None);
                            }

                            let outcome = match host.measure() {
                                Ok(dimensions) => state.write().resolve(ticket, dimensions),
                                Err(err) => {
                                    tracing::error!("failed to measure window: {err}");
                                    state.write().abandon(ticket);
                                    continue;
                                }
                            };

                            if let Outcome::Report(total) = outcome {
                                on_new_total.call(total);
                            }
                        }
                    }
                }
            }
        }
    });

    let listener = use_hook({
        let host = host.clone();
        move || {
            let host = host?;
            let resizes = fetches.tx();
            let attached = host.add_resize_listener(Rc::new(move || {
                _ = resizes.unbounded_send(());
            }));

            match attached {
                Ok(id) => Some(id),
                Err(err) => {
                    tracing::error!("failed to listen for window resizes: {err}");
                    None
                }
            }
        }
    });

    use_drop({
        let host = host.clone();
        let pending_timer = pending_timer.clone();
        move || {
            let Some(host) = host else {
                return;
            };

            if let Some(id) = listener {
                host.remove_resize_listener(id);
            }

            if let Some(timer) = pending_timer.take() {
                host.clear_timeout(timer);
            }
        }
    });

    use_effect(use_reactive((&multiplier,), move |(multiplier,)| {
        let multiplier = match config.multiplier(multiplier) {
            Ok(multiplier) => multiplier,
            Err(err) => {
                tracing::warn!("ignoring multiplier input: {err}");
                return;
            }
        };

        if state.peek().multiplier() == multiplier {
            return;
        }

        // no write guard may be held while the parent runs
        let outcome = state.write().set_multiplier(multiplier);
        if let Outcome::Report(total) = outcome {
            on_new_total.call(total);
        }
    }));

    UseDimensionReporter {
        state,
        multiplier: shown,
    }
}

fn initial_multiplier(config: &ReporterConfig, prop: Option<f64>) -> Multiplier {
    config
        .multiplier(prop)
        .or_else(|err| {
            tracing::warn!("ignoring multiplier input: {err}");
            config.multiplier(None)
        })
        .unwrap_or_default()
}

/// A handle to the state behind [`use_dimension_reporter`].
///
/// Reading through the handle subscribes the current component, so it re-renders whenever a fetch
/// resolves or the multiplier changes.
#[derive(Clone, Copy, PartialEq)]
pub struct UseDimensionReporter {
    state: Signal<ReporterState>,
    multiplier: Multiplier,
}

impl UseDimensionReporter {
    /// What the component should display right now.
    pub fn view(&self) -> View {
        self.state.read().view_with(self.multiplier)
    }

    /// The total for the measurements held and the multiplier this render was given.
    pub fn total(&self) -> Option<f64> {
        self.state
            .read()
            .dimensions()
            .map(|dimensions| derived_total(dimensions, self.multiplier))
    }

    /// True once the first resize has started a fetch.
    pub fn is_visible(&self) -> bool {
        self.state.read().is_visible()
    }

    /// A copy of the full reporter state.
    ///
    /// Its stored multiplier catches up with a changed prop once effects have run.
    pub fn state(&self) -> ReporterState {
        self.state.read().clone()
    }
}
