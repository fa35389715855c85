use clap::Parser;
use std::process::ExitCode;

use chatloop::cli::commands::{chat, providers};
use chatloop::cli::{Args, Command, exit_code_for};
use chatloop::logging;
use chatloop::output::{self, OutputConfig};
use chatloop::ui::Style;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    output::init(OutputConfig::detect(args.quiet, args.no_color));
    logging::init(args.verbose);

    let result = match args.command {
        Some(Command::Providers { ref provider }) => providers::print_providers(provider.as_deref()),
        None => chat::run_chat(&args.resolve_options()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "exiting with error");
            eprintln!("{} {err:#}", Style::error("Error:"));
            ExitCode::from(u8::try_from(exit_code_for(&err)).unwrap_or(1))
        }
    }
}
