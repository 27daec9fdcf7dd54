use pygcode::cli::{self, Args};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // stdout may carry the generated script, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args: Args = argh::from_env();
    cli::run(args)
}
