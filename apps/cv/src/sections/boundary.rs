use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::sections::view::{el, ViewNode};
use crate::sections::RenderError;

/// Runs `render`, containing both returned errors and panics.
///
/// On failure the error is logged with the section identity and a scoped
/// fallback carrying the same anchor is returned instead.
pub fn render_guarded<F>(name: &str, anchor: &str, render: F) -> ViewNode
where
    F: FnOnce() -> Result<ViewNode, RenderError>,
{
    match panic::catch_unwind(AssertUnwindSafe(render)) {
        Ok(Ok(node)) => node,
        Ok(Err(e)) => {
            error!(section = anchor, error = %e, "section failed to render");
            fallback(name, anchor)
        }
        Err(payload) => {
            error!(
                section = anchor,
                error = %panic_message(payload.as_ref()),
                "section panicked while rendering"
            );
            fallback(name, anchor)
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub fn fallback(name: &str, anchor: &str) -> ViewNode {
    el("section")
        .id(anchor)
        .class("section-error")
        .attr("role", "alert")
        .child(el("h3").text(format!("Unable to load {name}")))
        .child(el("p").text(
            "This section encountered an error. Other sections should work normally.",
        ))
        .child(
            el("button")
                .class("reload-button")
                .attr("onclick", "window.location.reload()")
                .text("Refresh Page"),
        )
}
