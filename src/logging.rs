use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the JSON subscriber on stderr; `RUST_LOG` overrides `default_level`.
pub fn init(default_level: &str) {
    let fmt_layer = fmt::layer().json().with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
