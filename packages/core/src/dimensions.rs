use crate::Multiplier;
use serde::{Deserialize, Serialize};

/// The number of measurements taken on every resize.
pub const DIMENSION_COUNT: usize = 5;

/// One snapshot of the window and screen measurements, in a fixed order:
///
/// | index | measurement         |
/// |-------|---------------------|
/// | 0     | window inner width  |
/// | 1     | window inner height |
/// | 2     | window outer width  |
/// | 3     | window outer height |
/// | 4     | screen width        |
///
/// A snapshot is replaced wholesale on every resolved fetch, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimensions([f64; DIMENSION_COUNT]);

impl Dimensions {
    /// Build a snapshot from its five named measurements.
    pub const fn new(
        inner_width: f64,
        inner_height: f64,
        outer_width: f64,
        outer_height: f64,
        screen_width: f64,
    ) -> Self {
        Self([
            inner_width,
            inner_height,
            outer_width,
            outer_height,
            screen_width,
        ])
    }

    pub const fn inner_width(&self) -> f64 {
        self.0[0]
    }

    pub const fn inner_height(&self) -> f64 {
        self.0[1]
    }

    pub const fn outer_width(&self) -> f64 {
        self.0[2]
    }

    pub const fn outer_height(&self) -> f64 {
        self.0[3]
    }

    pub const fn screen_width(&self) -> f64 {
        self.0[4]
    }

    /// The raw measurements in index order.
    pub const fn values(&self) -> &[f64; DIMENSION_COUNT] {
        &self.0
    }

    /// Every measurement multiplied by `multiplier`, in index order.
    pub fn scaled(&self, multiplier: Multiplier) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(move |value| value * multiplier.get())
    }
}

impl From<[f64; DIMENSION_COUNT]> for Dimensions {
    fn from(values: [f64; DIMENSION_COUNT]) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_accessors_follow_measurement_order() {
        let dims = Dimensions::new(1.0, 2.0, 3.0, 4.0, 5.0);
        assert_eq!(dims.inner_width(), 1.0);
        assert_eq!(dims.inner_height(), 2.0);
        assert_eq!(dims.outer_width(), 3.0);
        assert_eq!(dims.outer_height(), 4.0);
        assert_eq!(dims.screen_width(), 5.0);
        assert_eq!(Dimensions::from([1.0, 2.0, 3.0, 4.0, 5.0]), dims);
    }

    #[test]
    fn scaled_multiplies_every_entry() {
        let dims = Dimensions::from([100.0, 200.0, 300.0, 400.0, 500.0]);
        let multiplier = Multiplier::new(2.0).unwrap();
        let scaled: Vec<f64> = dims.scaled(multiplier).collect();
        assert_eq!(scaled, vec![200.0, 400.0, 600.0, 800.0, 1000.0]);
    }

    #[test]
    fn serializes_as_a_plain_array() {
        let dims = Dimensions::from([1.5, 2.0, 3.0, 4.0, 5.0]);
        let json = serde_json::to_string(&dims).unwrap();
        assert_eq!(json, "[1.5,2.0,3.0,4.0,5.0]");
    }
}
