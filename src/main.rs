use std::process::ExitCode;

use analysis_admin::cli;
use clap::Parser;

fn main() -> ExitCode {
    cli::init_tracing();
    let cli = cli::Cli::parse();
    cli.run()
}
