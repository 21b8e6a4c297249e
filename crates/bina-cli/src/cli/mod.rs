use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for the `bina` binary.
#[derive(Debug, Parser)]
#[command(name = "bina", version, about = "BinaKata - early reading screening")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format for command results: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Raw,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the screening API.
    Serve(ServeArgs),
    /// Run the risk scoring service.
    MlServe(ServeArgs),
    /// Create the demo account and its children if they do not exist.
    Seed,
    /// Retrain the risk model on synthetic data and print its metadata.
    Train,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding the configured one.
    #[arg(long)]
    pub bind: Option<String>,
}
