use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cnf::DEFAULT_LOG_FILTER;

#[derive(Default, Debug, Clone)]
pub struct Builder {
	log_level: Option<String>,
}

pub fn builder() -> Builder {
	Builder::default()
}

impl Builder {
	/// Set the log level on the builder
	pub fn with_log_level(mut self, log_level: &str) -> Self {
		self.log_level = Some(log_level.to_string());
		self
	}

	/// Build a tracing dispatcher writing compact log lines to stderr
	pub fn build(self) -> Result<Box<dyn Subscriber + Send + Sync + 'static>> {
		let level = self.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER);
		let filter = EnvFilter::builder()
			.parse(level)
			.with_context(|| format!("Invalid log filter '{level}'"))?;
		let registry = tracing_subscriber::registry().with(
			tracing_subscriber::fmt::layer()
				.compact()
				.with_ansi(false)
				.with_span_events(FmtSpan::NONE)
				.with_writer(std::io::stderr)
				.with_filter(filter),
		);
		Ok(Box::new(registry))
	}

	/// tracing pipeline
	pub fn init(self) -> Result<()> {
		self.build()?.try_init().context("Unable to install the log subscriber")
	}
}
