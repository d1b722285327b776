use std::sync::LazyLock;

use crate::expr::Oid;

/// The number of bytes a fresh text buffer starts out with
pub const INITIAL_BUFFER_CAPACITY: usize = 8;

/// The type oid of a 32-bit signed integer constant
pub const INT4_TYPE_OID: Oid = 23;

/// How deep an expression tree may nest before rendering is cut short (defaults to 256)
pub static MAX_RENDER_DEPTH: LazyLock<usize> =
	lazy_env_parse!("PLANSQL_MAX_RENDER_DEPTH", usize, 256);
