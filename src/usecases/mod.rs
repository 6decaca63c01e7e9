//! Use case layer: application workflows and orchestration.

pub mod bookings;
pub mod bootstrap;
pub mod calendar;
pub mod catalog;
pub mod context;
pub mod contracts;
pub mod dashboard;
pub mod kyc;
pub mod list_conversations;
pub mod load_messages;
pub mod mark_read;
pub mod messaging_sync;
pub mod reviews;
pub mod send_message;
pub mod session_gate;
pub mod stats;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
