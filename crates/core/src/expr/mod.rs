//! The expression nodes found in a planned statement.
//!
//! Only the handful of node kinds needed to describe a filtered table scan
//! are modelled. Anything else the producer encounters is carried as
//! [`Expr::Unknown`] with the host's node tag, so that rendering can still
//! point at it.

use serde::Deserialize;

use crate::cnf::INT4_TYPE_OID;

/// An object identifier, as used for relations, types and operators
pub type Oid = u32;

/// A 1-based column position within a relation
pub type AttrNumber = i16;

/// A 1-based slot within a range table
pub type Index = u32;

/// A raw constant value, stored as a machine word.
///
/// Pass-by-value types keep their value in the low bits of the word, so an
/// int4 constant is the sign-extended 32-bit integer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Datum(pub i64);

impl Datum {
	pub fn from_i32(v: i32) -> Self {
		Self(v as i64)
	}

	/// Reads the low 32 bits of the word as a signed integer
	pub fn as_i32(self) -> i32 {
		self.0 as i32
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Expr {
	/// A column of a relation bound in the range table
	Column(ColumnRef),
	/// A constant value
	Literal(Literal),
	/// An operator applied to two operands
	Operator(BinaryOperator),
	/// An entry of a target list
	Projected(ProjectedEntry),
	/// A node kind this model does not describe
	Unknown {
		tag: u32,
	},
}

impl Expr {
	pub fn column(relation_slot: Index, attribute_position: AttrNumber) -> Self {
		Self::Column(ColumnRef {
			relation_slot,
			attribute_position,
		})
	}

	pub fn literal(type_oid: Oid, value: Datum) -> Self {
		Self::Literal(Literal {
			type_oid,
			value,
		})
	}

	pub fn int4(v: i32) -> Self {
		Self::literal(INT4_TYPE_OID, Datum::from_i32(v))
	}

	pub fn operator(operator_id: Oid, left: Expr, right: Expr) -> Self {
		Self::Operator(BinaryOperator {
			operator_id,
			left: Box::new(left),
			right: Box::new(right),
		})
	}

	pub fn projected(wrapped: Expr) -> Self {
		Self::Projected(ProjectedEntry {
			wrapped: Some(Box::new(wrapped)),
		})
	}

	pub fn unknown(tag: u32) -> Self {
		Self::Unknown {
			tag,
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ColumnRef {
	/// The range table slot of the relation
	pub relation_slot: Index,
	/// The column position within the relation. Zero refers to the whole
	/// row and negative numbers to system columns.
	pub attribute_position: AttrNumber,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Literal {
	pub type_oid: Oid,
	pub value: Datum,
}

impl Literal {
	/// Returns the integer value if this is an int4 constant
	pub fn as_int4(&self) -> Option<i32> {
		(self.type_oid == INT4_TYPE_OID).then(|| self.value.as_i32())
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BinaryOperator {
	pub operator_id: Oid,
	pub left: Box<Expr>,
	pub right: Box<Expr>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectedEntry {
	#[serde(default)]
	pub wrapped: Option<Box<Expr>>,
}
