use clap::Parser;
use std::process::ExitCode;
use wafermap_cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match wafermap_cli::run(&cli, &mut stdout) {
        Ok(verdict) => verdict.into(),
        Err(error) => {
            eprintln!("wafermap: {error:#}");
            ExitCode::from(2)
        }
    }
}
