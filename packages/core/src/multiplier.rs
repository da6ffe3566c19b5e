use crate::{ReporterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A finite scale factor applied to every measurement.
///
/// Any sign is allowed. NaN and the infinities are rejected so the reported total is always a
/// finite number as long as the measurements are.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Multiplier(f64);

impl Multiplier {
    /// The multiplier used when the caller leaves it unspecified.
    pub const ONE: Self = Self(1.0);

    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ReporterError::NonFiniteMultiplier(value))
        }
    }

    /// Resolve an optional component input, falling back to [`Multiplier::ONE`].
    pub fn from_prop(value: Option<f64>) -> Result<Self> {
        value.map_or(Ok(Self::ONE), Self::new)
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = ReporterError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Multiplier> for f64 {
    fn from(multiplier: Multiplier) -> Self {
        multiplier.0
    }
}

impl Display for Multiplier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
