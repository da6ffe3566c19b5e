use crate::{Dimensions, HostError};
use std::{fmt::Debug, ops::Deref, rc::Rc, time::Duration};

/// A callback run on every window resize.
pub type ResizeListener = Rc<dyn Fn()>;

/// A callback run once when a timer elapses.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Identifies a registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub usize);

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// The window environment a reporter runs in.
///
/// Everything happens on the UI thread, so methods take `&self` and implementations use interior
/// mutability. Implementations must never call back into a listener or timer while holding a
/// borrow of their own state: callbacks routinely schedule new timers.
pub trait Host {
    /// Read the current window and screen measurements.
    fn measure(&self) -> Result<Dimensions, HostError>;

    fn add_resize_listener(&self, listener: ResizeListener) -> Result<ListenerId, HostError>;

    /// Unknown ids are ignored.
    fn remove_resize_listener(&self, id: ListenerId);

    /// Run `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> Result<TimerId, HostError>;

    /// Cancel a timer. Unknown or already elapsed timers are ignored.
    fn clear_timeout(&self, id: TimerId);
}

/// A shared, cloneable handle to a [`Host`].
///
/// Two handles are equal when they point at the same host, which lets the handle travel through
/// component props and context.
#[derive(Clone)]
pub struct HostHandle(Rc<dyn Host>);

impl HostHandle {
    pub fn new(host: impl Host + 'static) -> Self {
        Self(Rc::new(host))
    }
}

impl<H: Host + 'static> From<Rc<H>> for HostHandle {
    fn from(host: Rc<H>) -> Self {
        Self(host)
    }
}

impl Deref for HostHandle {
    type Target = dyn Host;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl Debug for HostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HostHandle")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}
