//! The state machine shared by both reporter adapters.
//!
//! ```text
//!  Created --mount--> Mounted --unmount--> Unmounted
//!                      |    ^
//!               resize |    | resolve(latest ticket)
//!                      v    |
//!                   fetch pending
//! ```
//!
//! Every transition is a plain method. Transitions that can produce a new total return an
//! [`Outcome`]; the adapter owning the state is the only thing that talks to the parent.

use crate::{derived_total, Dimensions, Multiplier, ReporterError, Result, View};

/// Where a reporter is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Constructed but not listening for resizes yet.
    #[default]
    Created,

    /// Listening for resizes.
    Mounted,

    /// Torn down. Terminal.
    Unmounted,
}

/// Identifies one deferred fetch. Only the most recently issued ticket can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A fetch the adapter should schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// The ticket to hand back to [`ReporterState::resolve`].
    pub ticket: FetchTicket,

    /// A fetch that was still outstanding and has now lost; its timer can be cancelled.
    pub superseded: Option<FetchTicket>,
}

/// What the adapter should do after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Call the parent with this total.
    Report(f64),

    /// Nothing new for the parent.
    Quiet,

    /// The event was dropped.
    Ignored(IgnoreReason),
}

/// Why an event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The reporter is not mounted.
    NotMounted,

    /// A newer fetch has superseded this one, or it was abandoned.
    StaleTicket,

    /// The measurements scaled past what an `f64` can hold.
    NonFiniteTotal,
}

/// The state container behind a dimension reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterState {
    lifecycle: Lifecycle,
    visible: bool,
    dimensions: Option<Dimensions>,
    multiplier: Multiplier,
    pending: Option<FetchTicket>,
    next_ticket: u64,
    last_reported: Option<f64>,
}

impl ReporterState {
    pub fn new(multiplier: Multiplier) -> Self {
        Self {
            lifecycle: Lifecycle::Created,
            visible: false,
            dimensions: None,
            multiplier,
            pending: None,
            next_ticket: 0,
            last_reported: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// True once the first fetch has been started, whether or not it has finished.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    /// The fetch currently allowed to resolve, if any.
    pub fn pending(&self) -> Option<FetchTicket> {
        self.pending
    }

    pub fn last_reported(&self) -> Option<f64> {
        self.last_reported
    }

    /// The total for the measurements and multiplier held right now.
    pub fn total(&self) -> Option<f64> {
        self.dimensions
            .as_ref()
            .map(|dimensions| derived_total(dimensions, self.multiplier))
    }

    pub fn mount(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::Created {
            return Err(ReporterError::InvalidTransition {
                from: self.lifecycle,
                event: "mount",
            });
        }

        tracing::trace!("dimension reporter mounted");
        self.lifecycle = Lifecycle::Mounted;
        Ok(())
    }

    /// A resize happened. Starts a new fetch, superseding any outstanding one.
    ///
    /// Returns `None` if the reporter is not mounted.
    pub fn resize(&mut self) -> Option<FetchRequest> {
        if self.lifecycle != Lifecycle::Mounted {
            tracing::trace!(lifecycle = ?self.lifecycle, "ignoring resize");
            return None;
        }

        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.visible = true;

        let superseded = self.pending.replace(ticket);
        if let Some(stale) = superseded {
            tracing::debug!(stale = stale.0, fresh = ticket.0, "resize superseded pending fetch");
        }

        Some(FetchRequest { ticket, superseded })
    }

    /// A fetch finished with a fresh set of measurements.
    pub fn resolve(&mut self, ticket: FetchTicket, dimensions: Dimensions) -> Outcome {
        if self.lifecycle != Lifecycle::Mounted {
            tracing::trace!(ticket = ticket.0, "fetch resolved after teardown");
            return Outcome::Ignored(IgnoreReason::NotMounted);
        }

        if self.pending != Some(ticket) {
            tracing::debug!(ticket = ticket.0, pending = ?self.pending, "dropping stale fetch");
            return Outcome::Ignored(IgnoreReason::StaleTicket);
        }

        self.pending = None;
        self.dimensions = Some(dimensions);
        self.report_if_changed()
    }

    /// The host could not produce measurements for this fetch. The previous measurements stay.
    pub fn abandon(&mut self, ticket: FetchTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }

    /// The multiplier input changed. Recomputes from the measurements already held.
    pub fn set_multiplier(&mut self, multiplier: Multiplier) -> Outcome {
        if self.lifecycle == Lifecycle::Unmounted {
            return Outcome::Ignored(IgnoreReason::NotMounted);
        }

        if self.multiplier == multiplier {
            return Outcome::Quiet;
        }

        tracing::trace!(%multiplier, "multiplier changed");
        self.multiplier = multiplier;
        self.report_if_changed()
    }

    /// Tear the reporter down. Returns the fetch that was still outstanding so its timer can be
    /// cleared.
    pub fn unmount(&mut self) -> Option<FetchTicket> {
        if self.lifecycle == Lifecycle::Unmounted {
            return None;
        }

        tracing::trace!("dimension reporter unmounted");
        self.lifecycle = Lifecycle::Unmounted;
        self.pending.take()
    }

    pub fn view(&self) -> View {
        self.view_with(self.multiplier)
    }

    /// The view for the measurements held, scaled by `multiplier` instead of the stored one.
    pub fn view_with(&self, multiplier: Multiplier) -> View {
        match &self.dimensions {
            None => View::Placeholder {
                fetching: self.pending.is_some(),
            },
            Some(dimensions) => View::Entries {
                scaled: dimensions.scaled(multiplier).collect(),
                window_width: dimensions.inner_width(),
            },
        }
    }

    fn report_if_changed(&mut self) -> Outcome {
        let Some(total) = self.total() else {
            return Outcome::Quiet;
        };

        if !total.is_finite() {
            tracing::warn!(multiplier = %self.multiplier, "derived total overflowed, not reporting");
            return Outcome::Ignored(IgnoreReason::NonFiniteTotal);
        }

        if self.last_reported == Some(total) {
            return Outcome::Quiet;
        }

        self.last_reported = Some(total);
        Outcome::Report(total)
    }
}

impl Default for ReporterState {
    fn default() -> Self {
        Self::new(Multiplier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: Dimensions = Dimensions::new(100.0, 200.0, 300.0, 400.0, 500.0);

    fn mounted(multiplier: f64) -> ReporterState {
        let mut state = ReporterState::new(Multiplier::new(multiplier).unwrap());
        state.mount().unwrap();
        state
    }

    #[test]
    fn starts_hidden_with_placeholder() {
        let state = mounted(2.0);
        assert!(!state.is_visible());
        assert_eq!(state.total(), None);
        assert_eq!(state.view(), View::Placeholder { fetching: false });
    }

    #[test]
    fn resize_then_resolve_reports_total() {
        let mut state = mounted(2.0);
        let request = state.resize().unwrap();
        assert_eq!(request.superseded, None);
        assert!(state.is_visible());
        assert_eq!(state.view(), View::Placeholder { fetching: true });

        assert_eq!(state.resolve(request.ticket, SAMPLE), Outcome::Report(1800.0));
        assert_eq!(
            state.view(),
            View::Entries {
                scaled: vec![200.0, 400.0, 600.0, 800.0, 1000.0],
                window_width: 100.0,
            }
        );
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn multiplier_change_recomputes_from_held_dimensions() {
        let mut state = mounted(2.0);
        let request = state.resize().unwrap();
        state.resolve(request.ticket, SAMPLE);

        let outcome = state.set_multiplier(Multiplier::new(3.0).unwrap());
        assert_eq!(outcome, Outcome::Report(2700.0));
        assert_eq!(state.dimensions(), Some(&SAMPLE));
    }

    #[test]
    fn view_with_scales_without_touching_state() {
        let mut state = mounted(2.0);
        let request = state.resize().unwrap();
        state.resolve(request.ticket, SAMPLE);

        assert_eq!(
            state.view_with(Multiplier::new(3.0).unwrap()),
            View::Entries {
                scaled: vec![300.0, 600.0, 900.0, 1200.0, 1500.0],
                window_width: 100.0,
            }
        );
        assert_eq!(state.multiplier().get(), 2.0);
        assert_eq!(state.last_reported(), Some(1800.0));
    }

    #[test]
    fn multiplier_change_before_load_is_quiet() {
        let mut state = mounted(2.0);
        assert_eq!(
            state.set_multiplier(Multiplier::new(5.0).unwrap()),
            Outcome::Quiet
        );
        assert_eq!(state.multiplier().get(), 5.0);
    }

    #[test]
    fn latest_fetch_wins() {
        let mut state = mounted(1.0);
        let first = state.resize().unwrap();
        let second = state.resize().unwrap();
        assert_eq!(second.superseded, Some(first.ticket));

        let early = Dimensions::new(1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(
            state.resolve(first.ticket, early),
            Outcome::Ignored(IgnoreReason::StaleTicket)
        );
        assert_eq!(state.dimensions(), None);

        assert_eq!(state.resolve(second.ticket, SAMPLE), Outcome::Report(900.0));
        assert_eq!(state.dimensions(), Some(&SAMPLE));
    }

    #[test]
    fn unchanged_total_is_not_reported_twice() {
        let mut state = mounted(1.0);
        let first = state.resize().unwrap();
        assert_eq!(state.resolve(first.ticket, SAMPLE), Outcome::Report(900.0));

        // only the heights changed, which do not contribute
        let taller = Dimensions::new(100.0, 999.0, 300.0, 999.0, 500.0);
        let second = state.resize().unwrap();
        assert_eq!(state.resolve(second.ticket, taller), Outcome::Quiet);
        assert_eq!(state.dimensions(), Some(&taller));
    }

    #[test]
    fn resolution_after_unmount_is_ignored() {
        let mut state = mounted(2.0);
        let request = state.resize().unwrap();
        assert_eq!(state.unmount(), Some(request.ticket));
        assert_eq!(
            state.resolve(request.ticket, SAMPLE),
            Outcome::Ignored(IgnoreReason::NotMounted)
        );
        assert_eq!(state.resize(), None);
        assert_eq!(state.unmount(), None);
    }

    #[test]
    fn lifecycle_rejects_double_mount() {
        let mut state = mounted(1.0);
        assert!(matches!(
            state.mount(),
            Err(ReporterError::InvalidTransition {
                from: Lifecycle::Mounted,
                event: "mount"
            })
        ));
    }

    #[test]
    fn resize_before_mount_does_nothing() {
        let mut state = ReporterState::default();
        assert_eq!(state.resize(), None);
        assert!(!state.is_visible());
    }

    #[test]
    fn abandoned_fetch_keeps_previous_dimensions() {
        let mut state = mounted(1.0);
        let first = state.resize().unwrap();
        state.resolve(first.ticket, SAMPLE);

        let second = state.resize().unwrap();
        state.abandon(second.ticket);
        assert_eq!(state.pending(), None);
        assert_eq!(
            state.resolve(second.ticket, Dimensions::new(0.0, 0.0, 0.0, 0.0, 0.0)),
            Outcome::Ignored(IgnoreReason::StaleTicket)
        );
        assert_eq!(state.dimensions(), Some(&SAMPLE));
    }

    #[test]
    fn overflowing_total_is_withheld() {
        let mut state = mounted(f64::MAX);
        let request = state.resize().unwrap();
        assert_eq!(
            state.resolve(request.ticket, SAMPLE),
            Outcome::Ignored(IgnoreReason::NonFiniteTotal)
        );
        assert_eq!(state.last_reported(), None);
    }
}
