use tokio::runtime::Runtime;
use tracing_appender::non_blocking::WorkerGuard;

use crate::infra::config::AppConfig;

/// Process-wide context assembled by bootstrap: configuration, the
/// background runtime for dispatch and speech tasks, and the logging guard
/// that must live as long as the process.
pub struct AppContext {
    pub config: AppConfig,
    pub runtime: Runtime,
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(config: AppConfig, runtime: Runtime, log_guard: Option<WorkerGuard>) -> Self {
        Self {
            config,
            runtime,
            _log_guard: log_guard,
        }
    }
}
