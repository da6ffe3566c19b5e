use std::fmt::{Display, Formatter};

/// The prompt shown until the first set of measurements arrives.
pub const PLACEHOLDER_TEXT: &str = "Resize window to make component visible!";

/// Heading above the list of scaled entries.
pub const ENTRIES_HEADING: &str = "Multiplied entries:";

/// What a reporter should display right now.
///
/// Produced by [`ReporterState::view`](crate::ReporterState::view) without touching any state,
/// so renderers can call it as often as they like.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// No measurements are loaded yet.
    Placeholder {
        /// A fetch has been started and has not resolved.
        fetching: bool,
    },

    /// Measurements are loaded.
    Entries {
        /// Each measurement multiplied by the current multiplier.
        scaled: Vec<f64>,

        /// The raw, unscaled window inner width.
        window_width: f64,
    },
}

impl View {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placeholder { .. } => f.write_str(PLACEHOLDER_TEXT),
            Self::Entries {
                scaled,
                window_width,
            } => {
                writeln!(f, "{ENTRIES_HEADING}")?;
                for entry in scaled {
                    writeln!(f, "- {entry}")?;
                }
                write!(f, "Window width = {window_width}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_renders_prompt() {
        let view = View::Placeholder { fetching: true };
        assert!(view.is_placeholder());
        assert_eq!(view.to_string(), PLACEHOLDER_TEXT);
    }

    #[test]
    fn entries_render_as_a_list() {
        let view = View::Entries {
            scaled: vec![200.0, 400.0, 600.0, 800.0, 1000.0],
            window_width: 100.0,
        };

        assert_eq!(
            view.to_string(),
            "Multiplied entries:\n- 200\n- 400\n- 600\n- 800\n- 1000\nWindow width = 100"
        );
    }
}
