#[macro_use]
extern crate tracing;

mod cli;
mod cnf;
mod telemetry;

use std::process::ExitCode;

fn main() -> ExitCode {
	cli::init()
}
