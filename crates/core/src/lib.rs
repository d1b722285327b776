//! # plansql core
//!
//! Reconstructs a readable `SELECT ... FROM ... WHERE ...` statement from an
//! already planned query, so that what a compiled plan executes can be
//! logged or audited without the original query text.
//!
//! The pieces, from the bottom up:
//!
//! - [`buf::TextBuffer`]: the append-only buffer statements are rendered into
//! - [`expr::Expr`]: the expression nodes found in target lists and filters
//! - [`catalog`]: the range table and the name lookups a host provides
//! - [`render`]: the recursive printer over expressions and statements
//! - [`plan`]: plans, plan documents, and [`plan::log_select_plan`]

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

pub mod buf;
pub mod catalog;
pub mod cnf;
pub mod err;
pub mod expr;
pub mod plan;
pub mod render;
