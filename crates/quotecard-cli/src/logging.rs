use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Filter taken from `QUOTECARD_LOG`, then `RUST_LOG`, else `warn`.
pub(crate) fn log_filter() -> String {
    for key in ["QUOTECARD_LOG", "RUST_LOG"] {
        if let Ok(value) = env::var(key) {
            if !value.trim().is_empty() {
                return value;
            }
        }
    }
    "warn".to_string()
}

/// Installs the stderr logger. Later calls are ignored.
pub(crate) fn init_logging() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&log_filter());
        builder.write_style(env_logger::WriteStyle::Auto);
        builder.format_timestamp(None);
        builder.init();
        log::debug!("logging initialized");
    });
}
