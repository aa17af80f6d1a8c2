use std::{path::PathBuf, sync::Once};

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "seiva_school=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}

/// Root directory for settings, collections and backups.
pub fn data_dir() -> PathBuf {
    seiva_config::default_data_dir()
}
