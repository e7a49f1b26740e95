use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "trigon_engine=debug"). On Android only the level part is honored.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,

    /// Logcat tag.
    pub tag: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            tag: "trigon".to_string(),
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call it first thing in `android_main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        install(config);
        log::debug!("logging initialized");
    });
}

#[cfg(target_os = "android")]
fn install(config: LoggingConfig) {
    let level = config
        .env_filter
        .as_deref()
        .and_then(|f| f.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Debug);

    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag(config.tag),
    );
}

#[cfg(not(target_os = "android"))]
fn install(config: LoggingConfig) {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = config.env_filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }

    builder.write_style(config.write_style);

    // Tests may have installed a logger already.
    let _ = builder.try_init();
}
