use crate::use_dimension_reporter;
use dimension_reporter_core::{View, ENTRIES_HEADING, PLACEHOLDER_TEXT};
use dioxus::prelude::*;

/// Shows the window measurements scaled by `multiplier` and reports their even-indexed total to
/// `on_new_total` after every resize.
///
/// Until the first resize resolves it renders a prompt asking for one.
///
/// ```rust, no_run
/// use dioxus::prelude::*;
/// use dimension_reporter::DimensionReporter;
///
/// fn App() -> Element {
///     let mut total = use_signal(|| 0.0);
///
///     rsx! {
///         h1 { "Total: {total}" }
///         DimensionReporter { multiplier: 2.0, on_new_total: move |new_total: f64| total.set(new_total) }
///     }
/// }
/// ```
#[component]
pub fn DimensionReporter(multiplier: Option<f64>, on_new_total: EventHandler<f64>) -> Element {
    let reporter = use_dimension_reporter(multiplier, on_new_total);

    match reporter.view() {
        View::Placeholder { fetching } => rsx! {
            div { class: "dimension-reporter", aria_busy: fetching, "{PLACEHOLDER_TEXT}" }
        },
        View::Entries {
            scaled,
            window_width,
        } => rsx! {
            div { class: "dimension-reporter",
                p { "{ENTRIES_HEADING}" }
                ul {
                    for (index, entry) in scaled.into_iter().enumerate() {
                        li { key: "{index}", "{entry}" }
                    }
                }
                span { "Window width = {window_width}" }
            }
        },
    }
}
