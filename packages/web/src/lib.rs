//! The browser window as a DimensionReporter host.
//!
//! Measurements come straight from `window` and `window.screen`, resize listeners are attached to
//! `window`, and fetch delays run on `setTimeout` through `gloo-timers`.

mod window;
pub use window::WebHost;
