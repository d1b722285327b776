use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use glob::glob;
use plansql_core::plan::{CatalogDocument, PlanDocument};
use plansql_core::render::RenderOptions;

use crate::cnf::DEFAULT_PLAN_PATTERN;

#[derive(Args, Debug)]
pub struct RenderCommandArguments {
	#[arg(help = "Glob pattern for the plan documents to render")]
	#[arg(default_value = DEFAULT_PLAN_PATTERN)]
	patterns: Vec<String>,
	#[arg(help = "A catalog document whose entries are shared by every plan")]
	#[arg(long, env = "PLANSQL_CATALOG")]
	catalog: Option<PathBuf>,
	#[arg(help = "How deeply expressions may nest before rendering is cut short")]
	#[arg(long_help = "How deeply expressions may nest before rendering is cut short. \
		Defaults to PLANSQL_MAX_RENDER_DEPTH, or 256 when that is unset or not a number")]
	#[arg(long)]
	max_depth: Option<usize>,
}

pub fn init(args: RenderCommandArguments) -> Result<()> {
	let RenderCommandArguments {
		patterns,
		catalog,
		max_depth,
	} = args;

	let shared = match catalog {
		Some(path) => Some(read_catalog(&path)?),
		None => None,
	};
	let options = match max_depth {
		Some(max_depth) => RenderOptions {
			max_depth,
		},
		None => RenderOptions::default(),
	};

	let mut entries = vec![];

	for pattern in patterns {
		let pattern_entries = glob(&pattern)
			.with_context(|| format!("Error parsing glob pattern '{pattern}'"))?;
		entries.extend(pattern_entries.flatten());
	}

	if entries.is_empty() {
		eprintln!("No files found");
		bail!("No plan documents found");
	}

	let mut failures = 0;

	for entry in entries {
		match render_file(&entry, shared.as_ref(), options) {
			Ok(Some(statement)) => {
				println!("{}: {statement}", entry.display());
			}
			Ok(None) => {
				println!("{}: skipped", entry.display());
			}
			Err(error) => {
				println!("{}: KO", entry.display());
				eprintln!("{error:#}");
				failures += 1;
			}
		}
	}

	if failures > 0 {
		bail!("Failed to render {failures} plan document(s)");
	}

	Ok(())
}

fn read_catalog(path: &Path) -> Result<CatalogDocument> {
	let text = fs::read_to_string(path)
		.with_context(|| format!("Unable to read catalog document '{}'", path.display()))?;
	CatalogDocument::parse(&text)
		.with_context(|| format!("Invalid catalog document '{}'", path.display()))
}

fn render_file(
	path: &Path,
	shared: Option<&CatalogDocument>,
	options: RenderOptions,
) -> Result<Option<String>> {
	let text = fs::read_to_string(path)
		.with_context(|| format!("Unable to read plan document '{}'", path.display()))?;
	let doc = PlanDocument::parse(&text)
		.with_context(|| format!("Invalid plan document '{}'", path.display()))?;
	debug!(path = %path.display(), "Rendering plan document");
	doc.log(shared, options).with_context(|| format!("Unable to render '{}'", path.display()))
}
