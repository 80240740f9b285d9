use super::commands::{Deploy, Root, Service, ServiceLogs};
use cascade::{App, Settings};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `CASCADE_LOG=cascade=debug`.
pub const LOG_ENV: &str = "CASCADE_LOG";

/// Logs go to stderr so command output on stdout stays clean.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn build_app(settings: Settings) -> App {
    let root = settings.root.clone();
    App::new(settings)
        .register::<Root>(&root)
        .register::<Service>(&format!("{}_Service", root))
        .register::<ServiceLogs>(&format!("{}_Service_Logs", root))
        .register::<Deploy>(&format!("{}_Deploy", root))
}
