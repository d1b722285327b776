mod render;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
pub use render::RenderCommandArguments;

use crate::cnf::{DEFAULT_LOG_FILTER, PKG_NAME};
use crate::telemetry;

const INFO: &str = "
Reconstructs the SELECT statements executed by query plans.

Plans are read from TOML documents holding the plan, its range table and
the catalog entries needed to name tables, columns and operators. Every
rendered statement is logged as QUERY: { ... } and printed to stdout.
";

#[derive(Parser, Debug)]
#[command(name = PKG_NAME, version, about = INFO)]
struct Cli {
	#[arg(help = "The logging level or filter directives")]
	#[arg(long = "log", env = "PLANSQL_LOG", default_value = DEFAULT_LOG_FILTER, global = true)]
	log: String,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	#[command(about = "Render the statements of plan documents")]
	Render(RenderCommandArguments),
}

pub fn init() -> ExitCode {
	let args = Cli::parse();
	if let Err(e) = telemetry::builder().with_log_level(&args.log).init() {
		eprintln!("{e:#}");
		return ExitCode::FAILURE;
	}
	let output = match args.command {
		Commands::Render(args) => render::init(args),
	};
	if let Err(e) = output {
		error!("{e:#}");
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn verify_cli() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_render_arguments() {
		let cli = Cli::try_parse_from(["plansql", "--log", "debug", "render", "a/*.plan.toml"]).unwrap();
		assert_eq!(cli.log, "debug");
		assert!(matches!(cli.command, Commands::Render(_)));
	}
}
