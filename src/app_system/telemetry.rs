/// Installs the global subscriber.
///
/// `default_level` applies when `RUST_LOG` is unset:
/// ```bash
/// RUST_LOG=debug clozzet orders
/// RUST_LOG=clozzet::http=debug,clozzet::pages=info clozzet manufacturing
/// ```
pub fn setup_tracing(default_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .with_writer(std::io::stderr)
        .try_init();
}
