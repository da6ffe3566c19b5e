#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod component;
pub use component::*;

mod host;

mod use_dimension_reporter;
pub use use_dimension_reporter::*;

pub use dimension_reporter_core::{
    Dimensions, HostHandle, ManualHost, ReporterConfig, ReporterState, View,
};
