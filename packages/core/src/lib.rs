#![doc = include_str!("../README.md")]
#![allow(clippy::type_complexity)]

mod config;
pub use config::*;

mod dimensions;
pub use dimensions::*;

mod error;
pub use error::*;

mod host;
pub use host::*;

mod manual;
pub use manual::*;

mod multiplier;
pub use multiplier::*;

pub mod state;
pub use state::{FetchRequest, FetchTicket, IgnoreReason, Lifecycle, Outcome, ReporterState};

pub mod stateful;
pub use stateful::{ReporterProps, StatefulReporter};

mod total;
pub use total::*;

mod view;
pub use view::*;
