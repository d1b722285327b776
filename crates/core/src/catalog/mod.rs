//! Lookups the renderer needs to turn identifiers back into names.
//!
//! The [`RangeTable`] maps the slot numbers used by column references to the
//! relations a plan reads from. The [`Catalog`] trait resolves relation,
//! column and operator identifiers to their display names; hosts implement
//! it over their own metadata, and [`MemoryCatalog`] serves tests and plan
//! documents.

mod memory;

use std::fmt;

use serde::Deserialize;

pub use self::memory::{BUILTIN_OPERATORS, MemoryCatalog};
use crate::expr::{AttrNumber, Index, Oid};

/// Name lookups for the identifiers found in a plan.
///
/// Implementations must not panic on unknown identifiers.
pub trait Catalog {
	/// The name of the relation with the given oid
	fn relation_name(&self, relid: Oid) -> Option<String>;

	/// The name of a column of a relation.
	///
	/// A plan only refers to columns which exist, so `None` means the
	/// catalog and the plan disagree.
	fn column_name(&self, relid: Oid, attno: AttrNumber) -> Option<String>;

	/// The display symbol of an operator.
	///
	/// `None` is expected for operators which have since been dropped.
	fn operator_name(&self, opno: Oid) -> Option<String>;
}

/// One binding in a range table
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RangeEntry {
	/// A plain table
	Relation {
		relid: Oid,
	},
	Subquery,
	Join,
	Function,
	TableFunction,
	Values,
	Cte,
	NamedTuplestore,
	Result,
}

impl RangeEntry {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Relation {
				..
			} => "relation",
			Self::Subquery => "subquery",
			Self::Join => "join",
			Self::Function => "function",
			Self::TableFunction => "table-function",
			Self::Values => "values",
			Self::Cte => "cte",
			Self::NamedTuplestore => "named-tuplestore",
			Self::Result => "result",
		}
	}
}

impl fmt::Display for RangeEntry {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.kind())
	}
}

/// The outcome of looking up a range table slot
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolved {
	/// The slot binds a table
	Relation(Oid),
	/// The slot binds something other than a table
	Unsupported(&'static str),
	/// There is no such slot
	Missing,
}

/// The relations a plan reads from, addressed by 1-based slot
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RangeTable(Vec<RangeEntry>);

impl RangeTable {
	pub fn new(entries: Vec<RangeEntry>) -> Self {
		Self(entries)
	}

	/// Appends an entry, returning the slot it was bound to
	pub fn push(&mut self, entry: RangeEntry) -> Index {
		self.0.push(entry);
		self.0.len() as Index
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn get(&self, slot: Index) -> Option<&RangeEntry> {
		let pos = slot.checked_sub(1)?;
		self.0.get(pos as usize)
	}

	pub fn resolve(&self, slot: Index) -> Resolved {
		match self.get(slot) {
			Some(RangeEntry::Relation {
				relid,
			}) => Resolved::Relation(*relid),
			Some(entry) => Resolved::Unsupported(entry.kind()),
			None => Resolved::Missing,
		}
	}
}

impl FromIterator<RangeEntry> for RangeTable {
	fn from_iter<I: IntoIterator<Item = RangeEntry>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn table() -> RangeTable {
		RangeTable::new(vec![
			RangeEntry::Relation {
				relid: 16384,
			},
			RangeEntry::Subquery,
			RangeEntry::Relation {
				relid: 16390,
			},
		])
	}

	#[rstest]
	#[case::first(1, Resolved::Relation(16384))]
	#[case::subquery(2, Resolved::Unsupported("subquery"))]
	#[case::last(3, Resolved::Relation(16390))]
	#[case::zero(0, Resolved::Missing)]
	#[case::past_end(4, Resolved::Missing)]
	fn resolves_slots(#[case] slot: Index, #[case] expected: Resolved) {
		assert_eq!(table().resolve(slot), expected);
	}

	#[test]
	fn push_returns_one_based_slot() {
		let mut rt = RangeTable::default();
		assert_eq!(rt.push(RangeEntry::Values), 1);
		assert_eq!(
			rt.push(RangeEntry::Relation {
				relid: 1
			}),
			2
		);
		assert_eq!(rt.len(), 2);
	}

	#[test]
	fn decodes_range_entries() {
		#[derive(Deserialize)]
		struct Doc {
			entries: RangeTable,
		}
		let doc: Doc = toml::from_str(
			r#"
			entries = [
				{ kind = "relation", relid = 42 },
				{ kind = "named-tuplestore" },
			]
			"#,
		)
		.unwrap();
		assert_eq!(doc.entries.resolve(1), Resolved::Relation(42));
		assert_eq!(doc.entries.resolve(2), Resolved::Unsupported("named-tuplestore"));
	}
}
