use std::collections::TryReserveError;

use thiserror::Error;

use crate::expr::{AttrNumber, Oid};

/// An error raised while rendering a plan or loading a plan document.
///
/// Input the renderer does not understand is not an error: it is written
/// into the output as a placeholder. The variants here are the cases where
/// no meaningful statement can be produced at all.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The text buffer could not grow to hold the rendered output
	#[error("Unable to grow the text buffer to {requested} bytes: {source}")]
	Allocation {
		requested: usize,
		source: TryReserveError,
	},

	/// A value refused to be formatted
	#[error("A value could not be formatted into the text buffer")]
	Format(#[from] std::fmt::Error),

	/// The rendered text contains a NUL byte and cannot be exposed as a C string
	#[error("The rendered text contains a NUL byte at position {0}")]
	InteriorNul(usize),

	/// The rendered text is not valid UTF-8
	#[error("The rendered text is not valid UTF-8: {0}")]
	InvalidUtf8(#[from] std::str::Utf8Error),

	/// The catalog has no name for a column a plan refers to
	#[error("The catalog has no column {attno} on relation {relid}")]
	ColumnNotFound {
		relid: Oid,
		attno: AttrNumber,
	},

	/// The scan relation slot is not bound in the range table
	#[error("The scan relation slot {0} is not in the range table")]
	UnknownScanSlot(u32),

	/// The catalog has no name for the relation a plan scans
	#[error("The catalog has no relation with oid {0}")]
	RelationNotFound(Oid),

	/// The scan relation slot does not refer to a table
	#[error("The scan relation at range table slot {slot} is not a table ({kind})")]
	UnsupportedScanRelation {
		slot: u32,
		kind: String,
	},

	/// A plan document could not be decoded
	#[error("Unable to decode the plan document: {0}")]
	Document(#[from] toml::de::Error),
}
