//! Rendering of plan expressions back into SQL text.
//!
//! Rendering never fails because of input it does not understand. Unknown
//! node kinds, unsupported constants, non-table range entries and unknown
//! operators are written inline as bracketed placeholders such as
//! `[Unknown node tag: 42]`, and the rest of the statement is rendered as
//! usual. The only errors are those which leave nothing sensible to print:
//! the buffer failing to grow, or the catalog missing a column the plan
//! refers to.

use crate::buf::TextBuffer;
use crate::catalog::{Catalog, RangeTable, Resolved};
use crate::cnf::MAX_RENDER_DEPTH;
use crate::err::Error;
use crate::expr::{BinaryOperator, ColumnRef, Expr, Literal};

/// Separator between the entries of a target list
pub const TARGET_SEPARATOR: &str = ", ";

/// Separator between the conjuncts of a filter
pub const PREDICATE_SEPARATOR: &str = " AND ";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderOptions {
	/// How many levels of nesting are rendered before a placeholder is
	/// written instead
	pub max_depth: usize,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			max_depth: *MAX_RENDER_DEPTH,
		}
	}
}

/// Everything needed to resolve the identifiers in an expression
pub struct RenderContext<'a> {
	range_table: &'a RangeTable,
	catalog: &'a dyn Catalog,
	options: RenderOptions,
}

impl<'a> RenderContext<'a> {
	pub fn new(range_table: &'a RangeTable, catalog: &'a dyn Catalog) -> Self {
		Self {
			range_table,
			catalog,
			options: RenderOptions::default(),
		}
	}

	pub fn with_options(mut self, options: RenderOptions) -> Self {
		self.options = options;
		self
	}
}

/// Appends the text of an expression to the buffer.
///
/// An absent expression contributes nothing.
pub fn render_expression(
	buf: &mut TextBuffer,
	node: Option<&Expr>,
	ctx: &RenderContext<'_>,
) -> Result<(), Error> {
	render_node(buf, node, ctx, 0)
}

/// Appends each expression in turn, with `separator` between neighbours
pub fn render_list(
	buf: &mut TextBuffer,
	nodes: &[Expr],
	separator: &str,
	ctx: &RenderContext<'_>,
) -> Result<(), Error> {
	for (i, node) in nodes.iter().enumerate() {
		if i > 0 {
			buf.append_str(separator)?;
		}
		render_node(buf, Some(node), ctx, 0)?;
	}
	Ok(())
}

/// Reconstructs a `SELECT ... FROM ... [WHERE ...]` statement.
///
/// The `WHERE` clause is only written when there is at least one predicate.
pub fn render_statement(
	relation_name: &str,
	target_list: &[Expr],
	predicate_list: Option<&[Expr]>,
	ctx: &RenderContext<'_>,
) -> Result<String, Error> {
	let mut buf = TextBuffer::new();
	buf.append_str("SELECT ")?;
	render_list(&mut buf, target_list, TARGET_SEPARATOR, ctx)?;
	write_buf!(&mut buf, " FROM {relation_name}")?;
	if let Some(predicates) = predicate_list.filter(|p| !p.is_empty()) {
		buf.append_str(" WHERE ")?;
		render_list(&mut buf, predicates, PREDICATE_SEPARATOR, ctx)?;
	}
	Ok(buf.into_string())
}

fn render_node(
	buf: &mut TextBuffer,
	node: Option<&Expr>,
	ctx: &RenderContext<'_>,
	depth: usize,
) -> Result<(), Error> {
	let Some(node) = node else {
		return Ok(());
	};
	if depth >= ctx.options.max_depth {
		debug!(depth, "Expression nests too deeply to render");
		return buf.append_str("[Max render depth exceeded]");
	}
	match node {
		Expr::Column(col) => render_column(buf, col, ctx),
		Expr::Literal(lit) => render_literal(buf, lit),
		Expr::Operator(op) => render_operator(buf, op, ctx, depth),
		Expr::Projected(entry) => render_node(buf, entry.wrapped.as_deref(), ctx, depth + 1),
		Expr::Unknown {
			tag,
		} => {
			debug!(tag, "Unknown expression node");
			write_buf!(buf, "[Unknown node tag: {tag}]")
		}
	}
}

fn render_column(buf: &mut TextBuffer, col: &ColumnRef, ctx: &RenderContext<'_>) -> Result<(), Error> {
	let relid = match ctx.range_table.resolve(col.relation_slot) {
		Resolved::Relation(relid) => relid,
		Resolved::Unsupported(kind) => {
			debug!(slot = col.relation_slot, kind, "Column of a non-table range entry");
			return write_buf!(buf, "[Unsupported range entry kind: {kind}]");
		}
		Resolved::Missing => {
			debug!(slot = col.relation_slot, "Column of a missing range entry");
			return write_buf!(buf, "[Unknown range table slot: {}]", col.relation_slot);
		}
	};
	let attno = col.attribute_position;
	if attno <= 0 {
		return write_buf!(buf, "[Unsupported attribute number: {attno}]");
	}
	let name = ctx.catalog.column_name(relid, attno).ok_or(Error::ColumnNotFound {
		relid,
		attno,
	})?;
	buf.append_str(&name)
}

fn render_literal(buf: &mut TextBuffer, lit: &Literal) -> Result<(), Error> {
	match lit.as_int4() {
		Some(v) => write_buf!(buf, "{v}"),
		None => write_buf!(buf, "[Unknown literal type oid: {}]", lit.type_oid),
	}
}

fn render_operator(
	buf: &mut TextBuffer,
	op: &BinaryOperator,
	ctx: &RenderContext<'_>,
	depth: usize,
) -> Result<(), Error> {
	render_node(buf, Some(&op.left), ctx, depth + 1)?;
	match ctx.catalog.operator_name(op.operator_id) {
		Some(name) => write_buf!(buf, " {name} ")?,
		None => {
			debug!(operator_id = op.operator_id, "Unknown operator");
			write_buf!(buf, " [Unknown operator: {}] ", op.operator_id)?
		}
	}
	render_node(buf, Some(&op.right), ctx, depth + 1)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::catalog::{MemoryCatalog, RangeEntry};
	use crate::expr::{Datum, ProjectedEntry};

	const T: u32 = 16384;
	const EQ: u32 = 96;
	const GT: u32 = 521;

	fn range_table() -> RangeTable {
		RangeTable::new(vec![
			RangeEntry::Relation {
				relid: T,
			},
			RangeEntry::Subquery,
		])
	}

	fn catalog() -> MemoryCatalog {
		let mut catalog = MemoryCatalog::with_builtin_operators();
		catalog.add_relation(T, "t", ["a", "b", "x"]);
		catalog
	}

	fn render(node: Option<&Expr>) -> String {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog);
		let mut buf = TextBuffer::new();
		render_expression(&mut buf, node, &ctx).unwrap();
		buf.into_string()
	}

	fn render_joined(nodes: &[Expr], separator: &str) -> String {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog);
		let mut buf = TextBuffer::new();
		render_list(&mut buf, nodes, separator, &ctx).unwrap();
		buf.into_string()
	}

	fn a() -> Expr {
		Expr::column(1, 1)
	}

	fn b() -> Expr {
		Expr::column(1, 2)
	}

	fn x() -> Expr {
		Expr::column(1, 3)
	}

	#[rstest]
	#[case::column(a(), "a")]
	#[case::int4(Expr::int4(42), "42")]
	#[case::negative_int4(Expr::int4(-7), "-7")]
	#[case::text_literal(Expr::literal(25, Datum(0)), "[Unknown literal type oid: 25]")]
	#[case::equality(Expr::operator(EQ, x(), Expr::int4(42)), "x = 42")]
	#[case::unknown_operator(Expr::operator(9999, a(), b()), "a [Unknown operator: 9999] b")]
	#[case::nested_operators(
		Expr::operator(EQ, Expr::operator(551, a(), Expr::int4(1)), b()),
		"a + 1 = b"
	)]
	#[case::projected(Expr::projected(b()), "b")]
	#[case::empty_projection(Expr::Projected(ProjectedEntry::default()), "")]
	#[case::unknown_node(Expr::unknown(42), "[Unknown node tag: 42]")]
	#[case::unknown_operand(Expr::operator(GT, a(), Expr::unknown(7)), "a > [Unknown node tag: 7]")]
	#[case::subquery_column(Expr::column(2, 1), "[Unsupported range entry kind: subquery]")]
	#[case::missing_slot(Expr::column(5, 1), "[Unknown range table slot: 5]")]
	#[case::whole_row(Expr::column(1, 0), "[Unsupported attribute number: 0]")]
	#[case::system_column(Expr::column(1, -3), "[Unsupported attribute number: -3]")]
	fn renders_expression(#[case] node: Expr, #[case] expected: &str) {
		assert_eq!(render(Some(&node)), expected);
	}

	#[test]
	fn absent_expression_renders_nothing() {
		assert_eq!(render(None), "");
	}

	#[test]
	fn missing_column_aborts_render() {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog);
		let mut buf = TextBuffer::new();
		let res = render_expression(&mut buf, Some(&Expr::column(1, 4)), &ctx);
		assert!(matches!(
			res,
			Err(Error::ColumnNotFound {
				relid: T,
				attno: 4
			})
		));
	}

	#[rstest]
	#[case::empty(vec![], "")]
	#[case::single(vec![a()], "a")]
	#[case::pair(vec![a(), b()], "a, b")]
	#[case::triple(vec![a(), b(), Expr::int4(3)], "a, b, 3")]
	fn renders_list(#[case] nodes: Vec<Expr>, #[case] expected: &str) {
		assert_eq!(render_joined(&nodes, TARGET_SEPARATOR), expected);
	}

	#[test]
	fn list_has_one_separator_less_than_elements() {
		let nodes: Vec<Expr> = (0..10).map(Expr::int4).collect();
		let text = render_joined(&nodes, "|");
		assert_eq!(text.matches('|').count(), 9);
		assert!(!text.starts_with('|'));
		assert!(!text.ends_with('|'));
	}

	#[test]
	fn statement_with_filter() {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog);
		let targets = [Expr::projected(a()), Expr::projected(b())];
		let quals = [Expr::operator(GT, a(), Expr::int4(5))];
		let sql = render_statement("t", &targets, Some(&quals), &ctx).unwrap();
		assert_eq!(sql, "SELECT a, b FROM t WHERE a > 5");
	}

	#[test]
	fn statement_joins_conjuncts() {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog);
		let targets = [Expr::projected(x())];
		let quals = [
			Expr::operator(GT, a(), Expr::int4(5)),
			Expr::operator(EQ, b(), Expr::int4(1)),
		];
		let sql = render_statement("t", &targets, Some(&quals), &ctx).unwrap();
		assert_eq!(sql, "SELECT x FROM t WHERE a > 5 AND b = 1");
		assert_eq!(sql.matches("WHERE").count(), 1);
	}

	#[rstest]
	#[case::absent(None)]
	#[case::empty(Some(vec![]))]
	fn statement_without_filter(#[case] quals: Option<Vec<Expr>>) {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog);
		let targets = [Expr::projected(a())];
		let sql = render_statement("t", &targets, quals.as_deref(), &ctx).unwrap();
		assert_eq!(sql, "SELECT a FROM t");
		assert!(!sql.contains(" WHERE "));
	}

	#[test]
	fn statement_keeps_placeholders_inline() {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog);
		let targets = [Expr::projected(a()), Expr::unknown(108)];
		let sql = render_statement("t", &targets, None, &ctx).unwrap();
		assert_eq!(sql, "SELECT a, [Unknown node tag: 108] FROM t");
	}

	#[test]
	fn rendering_twice_is_identical() {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog);
		let targets = [Expr::projected(a()), Expr::projected(Expr::column(2, 1))];
		let quals = [Expr::operator(9999, b(), Expr::literal(1700, Datum(3)))];
		let first = render_statement("t", &targets, Some(&quals), &ctx).unwrap();
		let second = render_statement("t", &targets, Some(&quals), &ctx).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn deep_nesting_is_cut_short() {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog).with_options(RenderOptions {
			max_depth: 3,
		});
		let mut node = a();
		for _ in 0..5 {
			node = Expr::projected(node);
		}
		let mut buf = TextBuffer::new();
		render_expression(&mut buf, Some(&node), &ctx).unwrap();
		assert_eq!(buf.into_string(), "[Max render depth exceeded]");
	}

	#[test]
	fn nesting_within_limit_renders_fully() {
		let (rt, catalog) = (range_table(), catalog());
		let ctx = RenderContext::new(&rt, &catalog).with_options(RenderOptions {
			max_depth: 3,
		});
		let node = Expr::projected(Expr::operator(EQ, a(), Expr::int4(1)));
		let mut buf = TextBuffer::new();
		render_expression(&mut buf, Some(&node), &ctx).unwrap();
		assert_eq!(buf.into_string(), "a = 1");
	}
}
