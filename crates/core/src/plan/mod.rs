//! Plans, and the documents used to describe them outside a host process.
//!
//! A [`PlanDocument`] is a TOML file holding a plan together with the range
//! table and catalog entries needed to render it:
//!
//! ```toml
//! range-table = [{ kind = "relation", relid = 16384 }]
//!
//! [[relations]]
//! oid = 16384
//! name = "t"
//! columns = ["a", "b"]
//!
//! [plan]
//! kind = "seq-scan"
//! scan-relid = 1
//! target-list = [
//! 	{ kind = "projected", wrapped = { kind = "column", relation-slot = 1, attribute-position = 1 } },
//! ]
//! ```

use serde::Deserialize;

use crate::catalog::{Catalog, MemoryCatalog, RangeTable, Resolved};
use crate::err::Error;
use crate::expr::{Expr, Index, Oid};
use crate::render::{RenderContext, RenderOptions, render_statement};

/// The top of a plan tree
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Plan {
	/// A sequential scan over a single table
	SeqScan(SeqScan),
	/// Any other plan node, identified by the host's node tag
	Other {
		tag: u32,
	},
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeqScan {
	/// The range table slot of the scanned table
	pub scan_relid: Index,
	#[serde(default)]
	pub target_list: Vec<Expr>,
	/// The implicitly AND-ed filter conjuncts, if any
	#[serde(default)]
	pub qual: Option<Vec<Expr>>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelationDef {
	pub oid: Oid,
	pub name: String,
	/// Column names, in attribute number order
	#[serde(default)]
	pub columns: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OperatorDef {
	pub oid: Oid,
	pub name: String,
}

/// Catalog entries, either embedded in a plan document or shared between many
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogDocument {
	#[serde(default)]
	pub relations: Vec<RelationDef>,
	#[serde(default)]
	pub operators: Vec<OperatorDef>,
}

impl CatalogDocument {
	pub fn parse(text: &str) -> Result<Self, Error> {
		Ok(toml::from_str(text)?)
	}

	/// Adds every entry to the catalog, replacing existing ones
	pub fn apply_to(&self, catalog: &mut MemoryCatalog) {
		for rel in &self.relations {
			catalog.add_relation(rel.oid, rel.name.as_str(), &rel.columns);
		}
		for op in &self.operators {
			catalog.add_operator(op.oid, op.name.as_str());
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlanDocument {
	#[serde(default)]
	pub range_table: RangeTable,
	#[serde(default)]
	pub relations: Vec<RelationDef>,
	#[serde(default)]
	pub operators: Vec<OperatorDef>,
	pub plan: Plan,
}

impl PlanDocument {
	pub fn parse(text: &str) -> Result<Self, Error> {
		Ok(toml::from_str(text)?)
	}

	/// Builds a catalog from the builtin operators, then `shared`, then the
	/// entries of this document, each overriding the ones before
	pub fn catalog(&self, shared: Option<&CatalogDocument>) -> MemoryCatalog {
		let mut catalog = MemoryCatalog::with_builtin_operators();
		if let Some(shared) = shared {
			shared.apply_to(&mut catalog);
		}
		CatalogDocument {
			relations: self.relations.clone(),
			operators: self.operators.clone(),
		}
		.apply_to(&mut catalog);
		catalog
	}

	/// Renders and logs the plan, see [`log_select_plan`]
	pub fn log(
		&self,
		shared: Option<&CatalogDocument>,
		options: RenderOptions,
	) -> Result<Option<String>, Error> {
		let catalog = self.catalog(shared);
		log_select_plan(&self.plan, &self.range_table, &catalog, options)
	}
}

/// Reconstructs the statement a sequential scan executes and logs it.
///
/// Other plan kinds are skipped and `None` is returned. The scanned range
/// table entry must be a table the catalog can name.
pub fn log_select_plan(
	plan: &Plan,
	range_table: &RangeTable,
	catalog: &dyn Catalog,
	options: RenderOptions,
) -> Result<Option<String>, Error> {
	let scan = match plan {
		Plan::SeqScan(scan) => scan,
		Plan::Other {
			tag,
		} => {
			debug!(tag, "Skipping plan which is not a sequential scan");
			return Ok(None);
		}
	};
	let slot = scan.scan_relid;
	let relid = match range_table.resolve(slot) {
		Resolved::Relation(relid) => relid,
		Resolved::Unsupported(kind) => {
			return Err(Error::UnsupportedScanRelation {
				slot,
				kind: kind.to_string(),
			});
		}
		Resolved::Missing => return Err(Error::UnknownScanSlot(slot)),
	};
	let table = catalog.relation_name(relid).ok_or(Error::RelationNotFound(relid))?;
	let ctx = RenderContext::new(range_table, catalog).with_options(options);
	let statement = render_statement(&table, &scan.target_list, scan.qual.as_deref(), &ctx)?;
	info!(target: "plansql::query", "QUERY: {{ {statement} }}");
	Ok(Some(statement))
}
