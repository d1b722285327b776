use std::collections::BTreeMap;

use super::Catalog;
use crate::expr::{AttrNumber, Oid};

/// The int4 comparison and arithmetic operators, keyed by their stock oids
pub const BUILTIN_OPERATORS: &[(Oid, &str)] = &[
	(96, "="),
	(97, "<"),
	(514, "*"),
	(518, "<>"),
	(521, ">"),
	(523, "<="),
	(525, ">="),
	(528, "/"),
	(530, "%"),
	(551, "+"),
	(555, "-"),
];

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Relation {
	name: String,
	/// Column names, in attribute number order
	columns: Vec<String>,
}

/// A catalog held entirely in memory
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryCatalog {
	relations: BTreeMap<Oid, Relation>,
	operators: BTreeMap<Oid, String>,
}

impl MemoryCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a catalog which knows the [`BUILTIN_OPERATORS`]
	pub fn with_builtin_operators() -> Self {
		let mut catalog = Self::new();
		for (oid, name) in BUILTIN_OPERATORS {
			catalog.add_operator(*oid, *name);
		}
		catalog
	}

	/// Defines a relation, replacing any previous definition with the same oid
	pub fn add_relation<I, S>(&mut self, relid: Oid, name: impl Into<String>, columns: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let relation = Relation {
			name: name.into(),
			columns: columns.into_iter().map(Into::into).collect(),
		};
		self.relations.insert(relid, relation);
	}

	/// Defines an operator, replacing any previous definition with the same oid
	pub fn add_operator(&mut self, opno: Oid, name: impl Into<String>) {
		self.operators.insert(opno, name.into());
	}
}

impl Catalog for MemoryCatalog {
	fn relation_name(&self, relid: Oid) -> Option<String> {
		self.relations.get(&relid).map(|r| r.name.clone())
	}

	fn column_name(&self, relid: Oid, attno: AttrNumber) -> Option<String> {
		let pos = usize::try_from(attno).ok()?.checked_sub(1)?;
		self.relations.get(&relid)?.columns.get(pos).cloned()
	}

	fn operator_name(&self, opno: Oid) -> Option<String> {
		self.operators.get(&opno).cloned()
	}
}
