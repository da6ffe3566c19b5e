use crate::{Dimensions, Multiplier};

/// The total reported to the parent: every measurement at an even index (0, 2 and 4) scaled by
/// `multiplier` and summed.
///
/// Index 0 counts as even, so the inner width, outer width and screen width contribute. The odd
/// indices (the two heights) never do.
pub fn derived_total(dimensions: &Dimensions, multiplier: Multiplier) -> f64 {
    dimensions
        .values()
        .iter()
        .step_by(2)
        .map(|value| value * multiplier.get())
        .sum()
}
