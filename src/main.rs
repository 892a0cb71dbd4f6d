use clap::Parser;
use tracing_subscriber::EnvFilter;

use cryo_fasta::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("cryo_fasta=debug,info")
    } else {
        EnvFilter::new("cryo_fasta=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let settings = cli::load_settings(cli.config.as_deref())?;

    match cli.command {
        cli::Commands::Classify(args) => {
            cli::classify::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Fetch(args) => {
            cli::fetch::run(args, settings, cli.format, cli.verbose)?;
        }
        cli::Commands::Entity(args) => {
            cli::fetch::run_entities(args, settings, cli.format, cli.verbose)?;
        }
        cli::Commands::Search(args) => {
            cli::search::run(args, settings, cli.format, cli.verbose)?;
        }
        cli::Commands::Annotate(args) => {
            cli::annotate::run(args, settings, cli.format, cli.verbose)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, settings, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
