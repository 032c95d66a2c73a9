mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "lyrictag=info",
        1 => "lyrictag=debug",
        2 => "lyrictag=trace",
        _ => "trace",
    };

    // Logs go to stderr so converted lyrics can be piped from stdout
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Split {
            input,
            plain_out,
            lrc_out,
        } => commands::convert::split(&input, plain_out.as_deref(), lrc_out.as_deref()).await,
        Commands::Entries { input, json } => commands::convert::entries(&input, json).await,
        Commands::Srt { input, output } => commands::convert::srt(&input, output.as_deref()).await,
        Commands::Tag { audio, options } => commands::tag::run(&audio, &options, config_path).await,
        Commands::Batch {
            input,
            parallel,
            output,
        } => commands::batch::run(&input, parallel, output.as_deref(), config_path).await,
        Commands::Estimate { duration, quality } => commands::quality::estimate(duration, quality),
        Commands::QualityReport { input, track_id } => {
            commands::quality::report(&input, track_id).await
        }
        Commands::Doctor => commands::doctor::run(config_path).await,
        Commands::Config => commands::config::run(config_path).await,
    }
}
