use clap::Parser;
use logsynth::cli::Cli;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr; stdout carries only generated records.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    if let Err(error) = Cli::parse().run() {
        eprintln!("logsynth: {}", error);

        let mut source = error.source();
        while let Some(inner) = source {
            eprintln!("  caused by: {}", inner);
            source = inner.source();
        }

        std::process::exit(1);
    }
}
