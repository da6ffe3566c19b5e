use crate::{
    Dimensions, Host, HostError, ListenerId, ResizeListener, TimerCallback, TimerId,
};
use slab::Slab;
use std::{cell::RefCell, collections::BTreeMap, rc::Rc, time::Duration};

/// A host driven entirely by hand.
///
/// Time only moves when [`ManualHost::advance`] is called and resizes only happen when
/// [`ManualHost::fire_resize`] is called, which makes reporter behavior reproducible in tests and
/// usable in headless environments. Clones share the same window.
#[derive(Clone, Default)]
pub struct ManualHost {
    inner: Rc<RefCell<ManualWindow>>,
}

#[derive(Default)]
struct ManualWindow {
    dimensions: Option<Dimensions>,
    listeners: Slab<ResizeListener>,
    timers: BTreeMap<(Duration, u64), TimerCallback>,
    next_timer: u64,
    now: Duration,
    measure_count: usize,
}

impl ManualHost {
    pub fn new(dimensions: Dimensions) -> Self {
        let host = Self::default();
        host.set_dimensions(dimensions);
        host
    }

    /// Change what the next measurement returns without notifying anyone.
    pub fn set_dimensions(&self, dimensions: Dimensions) {
        self.inner.borrow_mut().dimensions = Some(dimensions);
    }

    /// Notify every registered listener that the window was resized.
    pub fn fire_resize(&self) {
        // collect first so listeners are free to register timers or unregister themselves
        let listeners: Vec<ResizeListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener();
        }
    }

    /// Change the measurements and then fire a resize.
    pub fn resize_to(&self, dimensions: Dimensions) {
        self.set_dimensions(dimensions);
        self.fire_resize();
    }

    /// Move the clock forward, running every timer that comes due in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.borrow().now + by;

        loop {
            let due = {
                let mut window = self.inner.borrow_mut();
                match window.timers.keys().next().copied() {
                    Some(key @ (deadline, _)) if deadline <= target => {
                        window.now = deadline;
                        window.timers.remove(&key)
                    }
                    _ => None,
                }
            };

            match due {
                Some(callback) => callback(),
                None => break,
            }
        }

        self.inner.borrow_mut().now = target;
    }

    /// Time elapsed since the host was created.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// How many times [`Host::measure`] has been called.
    pub fn measure_count(&self) -> usize {
        self.inner.borrow().measure_count
    }
}

impl Host for ManualHost {
    fn measure(&self) -> Result<Dimensions, HostError> {
        let mut window = self.inner.borrow_mut();
        window.measure_count += 1;
        window
            .dimensions
            .ok_or_else(|| HostError::new("measure", "no dimensions configured"))
    }

    fn add_resize_listener(&self, listener: ResizeListener) -> Result<ListenerId, HostError> {
        let id = self.inner.borrow_mut().listeners.insert(listener);
        Ok(ListenerId(id))
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        self.inner.borrow_mut().listeners.try_remove(id.0);
    }

    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> Result<TimerId, HostError> {
        let mut window = self.inner.borrow_mut();
        let id = window.next_timer;
        window.next_timer += 1;
        let deadline = window.now + delay;
        window.timers.insert((deadline, id), callback);
        Ok(TimerId(id))
    }

    fn clear_timeout(&self, id: TimerId) {
        self.inner
            .borrow_mut()
            .timers
            .retain(|&(_, timer), _| timer != id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn timers_fire_in_deadline_order() {
        let host = ManualHost::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (name, delay) in [("slow", 30), ("fast", 10), ("middle", 20)] {
            let order = order.clone();
            host.set_timeout(
                Duration::from_millis(delay),
                Box::new(move || order.borrow_mut().push(name)),
            )
            .unwrap();
        }

        host.advance(Duration::from_millis(25));
        assert_eq!(*order.borrow(), vec!["fast", "middle"]);
        assert_eq!(host.pending_timers(), 1);

        host.advance(Duration::from_millis(5));
        assert_eq!(*order.borrow(), vec!["fast", "middle", "slow"]);
        assert_eq!(host.now(), Duration::from_millis(30));
    }

    #[test]
    fn cleared_timers_never_fire() {
        let host = ManualHost::default();
        let fired = Rc::new(Cell::new(false));
        let id = host
            .set_timeout(Duration::from_millis(5), {
                let fired = fired.clone();
                Box::new(move || fired.set(true))
            })
            .unwrap();

        host.clear_timeout(id);
        host.advance(Duration::from_secs(1));
        assert!(!fired.get());
    }

    #[test]
    fn timers_scheduled_by_timers_run_when_due() {
        let host = ManualHost::default();
        let fired = Rc::new(Cell::new(0));

        let inner_host = host.clone();
        let inner_fired = fired.clone();
        host.set_timeout(
            Duration::from_millis(10),
            Box::new(move || {
                inner_fired.set(inner_fired.get() + 1);
                let fired = inner_fired.clone();
                inner_host
                    .set_timeout(
                        Duration::from_millis(10),
                        Box::new(move || fired.set(fired.get() + 1)),
                    )
                    .unwrap();
            }),
        )
        .unwrap();

        host.advance(Duration::from_millis(20));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn listeners_can_be_removed() {
        let host = ManualHost::new(Dimensions::new(1.0, 2.0, 3.0, 4.0, 5.0));
        let calls = Rc::new(Cell::new(0));
        let id = host
            .add_resize_listener({
                let calls = calls.clone();
                Rc::new(move || calls.set(calls.get() + 1))
            })
            .unwrap();

        host.fire_resize();
        host.remove_resize_listener(id);
        host.fire_resize();

        assert_eq!(calls.get(), 1);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn measuring_without_dimensions_fails() {
        let host = ManualHost::default();
        assert_eq!(host.measure().unwrap_err().call, "measure");
        host.set_dimensions(Dimensions::new(1.0, 2.0, 3.0, 4.0, 5.0));
        assert_eq!(host.measure().unwrap().screen_width(), 5.0);
        assert_eq!(host.measure_count(), 2);
    }
}
