use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use super::Output;

pub mod config;
pub mod crack;
pub mod plan;
pub mod version;

#[derive(Parser)]
#[command(
    name = "unlatch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Staged password recovery for encrypted ZIP archives",
    long_about = "unlatch tries likely password shapes first (digits, letters followed by digits, \
                  digits followed by letters) and falls back to an exhaustive search, \
                  spreading the work across all CPU cores."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recover the password of an encrypted ZIP archive
    Crack(crack::CrackArgs),
    /// Show the stages a search would run
    Plan(plan::PlanArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Set up logging based on verbosity
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Some(Commands::Crack(args)) => {
                crack::execute(args, self.config.as_deref(), &output).await
            }
            Some(Commands::Plan(args)) => plan::execute(args, self.config.as_deref(), &output).await,
            Some(Commands::Config(args)) => config::execute(args, self.config.as_deref()).await,
            Some(Commands::Version(args)) => version::execute(args, &output).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,zip=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,zip=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"), // -vvv also shows rejected candidates
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
