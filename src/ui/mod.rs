//! UI layer: the full-screen dashboard and CLI output formatting.

mod event_source;
mod message_rendering;
pub mod print;
pub mod shell;
mod styles;
mod terminal;
mod text_input;
mod view;

pub(crate) use event_source::CrosstermEventSource;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
