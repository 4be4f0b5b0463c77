use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "patchnote_notifier=info";

/// Installs the global subscriber (stderr, filtered by `RUST_LOG`) and routes
/// panics through it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Unable to set global default subscriber");
    }

    std::panic::set_hook(Box::new(|info| {
        error!("Panicked: {}", info);
    }));
}
