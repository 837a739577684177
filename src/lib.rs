pub mod config;
pub mod models;
pub mod db;
pub mod pipeline;
pub mod session_registry;

pub use pipeline::intake::{DialogueOrchestrator, TurnResult};
pub use session_registry::SessionRegistry;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over
/// `config::default_log_filter()`. Safe to call more than once.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} intake engine v{}", config::APP_NAME, config::APP_VERSION);
    }
}
