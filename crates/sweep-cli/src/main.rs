//! Sweep CLI - finds and removes dead code in JavaScript/TypeScript projects

mod commands;
mod logging;
mod output;

use clap::Parser;
use commands::SweepArgs;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "sweep",
    author,
    version,
    about = "Scope-aware dead code scanner for JavaScript/TypeScript",
    long_about = "Sweep finds variables, functions, and components that are declared but\n\
                  never used, honouring lexical scoping and shadowing.\n\n\
                  It can list them, comment them out behind a marker, or delete them."
)]
pub struct Cli {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Minimum log level written to stderr
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_json);
    cli.sweep.run()
}
