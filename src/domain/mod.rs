//! Domain layer: marketplace entities, view states and pure formatting.

pub mod booking;
pub mod calendar;
pub mod catalog;
pub mod conversation;
pub mod conversation_list_state;
pub mod dashboard_state;
pub mod events;
mod id;
pub mod input_state;
pub mod kyc;
pub mod message;
pub mod notice;
pub mod presence;
pub mod review;
pub mod session;
pub mod stats;
pub mod thread_state;
pub mod user;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
