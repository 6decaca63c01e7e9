use anyhow::Result;
use chrono::Utc;
use ratatui::{backend::Backend, Terminal};

use crate::usecases::{
    context::AppContext,
    contracts::{AppEventSource, DashboardOrchestrator},
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn DashboardOrchestrator,
) -> Result<()> {
    tracing::info!(
        api_base_url = %context.config.api.base_url,
        poll_interval_ms = context.config.sync.poll_interval_ms,
        user_id = orchestrator.current_user_id(),
        "starting messaging dashboard"
    );

    let mut session = TerminalSession::new()?;
    drive(session.terminal_mut(), event_source, orchestrator)?;

    tracing::info!("messaging dashboard closed");
    Ok(())
}

/// Runs `step` until the orchestrator stops.
pub fn drive<B: Backend>(
    terminal: &mut Terminal<B>,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn DashboardOrchestrator,
) -> Result<()> {
    while orchestrator.state().is_running() {
        step(terminal, event_source, orchestrator)?;
    }

    Ok(())
}

/// Draws one frame, then either runs the work queued by the previous event
/// or hands the next event to the orchestrator. Queued work always follows
/// a draw, so its loading or sending state is on screen while it blocks.
fn step<B: Backend>(
    terminal: &mut Terminal<B>,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn DashboardOrchestrator,
) -> Result<()> {
    terminal.draw(|frame| view::render(frame, orchestrator, Utc::now()))?;

    if orchestrator.has_pending_work() {
        return orchestrator.run_pending_work();
    }

    if let Some(event) = event_source.next_event()? {
        orchestrator.handle_event(event)?;
    }

    Ok(())
}
