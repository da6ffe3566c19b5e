use dimension_reporter_core::HostHandle;
use dioxus::prelude::try_consume_context;

/// Find the host for the current component: the [`HostHandle`] in context, or the platform's own
/// window when there is one.
pub(crate) fn resolve_host() -> Option<HostHandle> {
    try_consume_context::<HostHandle>().or_else(platform_host)
}

#[cfg(target_arch = "wasm32")]
fn platform_host() -> Option<HostHandle> {
    match dimension_reporter_web::WebHost::new() {
        Ok(host) => Some(HostHandle::new(host)),
        Err(err) => {
            tracing::error!("dimension reporter cannot reach the browser window: {err}");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_host() -> Option<HostHandle> {
    tracing::error!(
        "no HostHandle was provided to the dimension reporter; it will never leave its placeholder"
    );
    None
}
