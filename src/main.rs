use tracing_subscriber::EnvFilter;

use onda::runtime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never fight the status line; silence by
    // default, opt in with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    runtime::run()
}
