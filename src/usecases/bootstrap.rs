use std::{
    path::Path,
    sync::{mpsc, Arc},
};

use crate::{
    api::{poller::ThreadPollScheduler, HttpApi},
    domain::session::Session,
    infra::{
        self, config::FileConfigAdapter, contracts::ConfigAdapter, error::AppError,
        session_store::FileSessionStore, storage_layout::StorageLayout,
    },
    usecases::{
        context::AppContext, dashboard::DefaultDashboardOrchestrator,
        messaging_sync::MessagingSync, session_gate::SessionGate,
    },
};

/// Loads config, prepares the storage dirs, installs logging and builds the
/// HTTP adapter. `full_screen` routes logs to a file so the terminal UI is
/// not overwritten.
pub fn bootstrap(config_path: Option<&Path>, full_screen: bool) -> anyhow::Result<AppContext> {
    let config = FileConfigAdapter::new(config_path).load()?;
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;

    let log_guard = infra::logging::init(&config.logging, &layout, full_screen)?;
    tracing::debug!(
        config_dir = %layout.config_dir.display(),
        base_url = %config.api.base_url,
        "bootstrap complete"
    );

    let api = build_api(&config.api)?;
    let session = SessionGate::new(FileSessionStore::new(&layout));

    Ok(AppContext::new(config, layout, api, session, log_guard))
}

fn build_api(config: &infra::config::ApiConfig) -> Result<Arc<HttpApi>, AppError> {
    Ok(Arc::new(HttpApi::new(config)?))
}

/// Wires the messaging dashboard for `session`: the synchronizer, its poller
/// and the key-handling orchestrator share one HTTP adapter.
pub fn compose_dashboard(
    context: &AppContext,
    session: &Session,
) -> DefaultDashboardOrchestrator<HttpApi> {
    let (events_tx, events_rx) = mpsc::channel();
    let scheduler = ThreadPollScheduler::new(
        Arc::clone(&context.api),
        events_tx,
        context.config.sync.poll_interval(),
    );
    let sync = MessagingSync::new(
        Arc::clone(&context.api),
        session.user.id.clone(),
        Box::new(scheduler),
        events_rx,
    );

    DefaultDashboardOrchestrator::new(sync, context.config.sync.notice_ttl_ticks)
}
