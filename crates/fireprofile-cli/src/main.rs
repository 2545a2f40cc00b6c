use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use fireprofile_cli::commands;
use fireprofile_core::ConfigStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fireprofile")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Open URLs in the right Firefox profile",
    long_about = "FireProfile picks a browser profile for each URL from your domain rules \
                  and asks you to choose one when no rule matches. \
                  Run without a URL (or with --config) to edit profiles and rules."
)]
struct Cli {
    /// URL to open
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Edit profiles and domain rules instead of opening a URL
    #[arg(long, conflicts_with = "url")]
    config: bool,

    /// Path to the config file (default: ~/.fireprofile.json)
    #[arg(long, value_name = "PATH", env = "FIREPROFILE_CONFIG")]
    config_file: Option<PathBuf>,

    /// Print the browser command instead of launching it
    #[arg(long, requires = "url")]
    dry_run: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    if let Some(shell) = cli.completions {
        return commands::completion::execute(shell, &mut Cli::command());
    }

    let config_path = match cli.config_file {
        Some(path) => path,
        None => ConfigStore::default_path()?,
    };

    match cli.url {
        Some(url) if !cli.config => commands::open::execute(&config_path, &url, cli.dry_run),
        _ => commands::config::execute(&config_path),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("fireprofile=debug,fireprofile_cli=debug,fireprofile_core=debug,fireprofile_launcher=debug")
    } else {
        EnvFilter::new("fireprofile=info,fireprofile_cli=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
