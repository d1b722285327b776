/// Lazily parses a `$t` from the environment variable `$key`, falling back
/// to `$default` when the variable is unset or does not parse.
#[macro_export]
macro_rules! lazy_env_parse {
	// With a static expression for the default value
	($key:expr_2021, $t:ty, $default:expr_2021) => {
		std::sync::LazyLock::new(|| {
			std::env::var($key).ok().and_then(|s| s.parse::<$t>().ok()).unwrap_or($default)
		})
	};
}

/// Appends formatted text to a [`TextBuffer`](crate::buf::TextBuffer).
///
/// Expands to a call to `append_fmt`, so the result is a
/// `Result<(), Error>` which the caller is expected to propagate.
#[macro_export]
macro_rules! write_buf {
	($buf:expr, $($tt:tt)*) => {{
		let __buf: &mut $crate::buf::TextBuffer = $buf;
		__buf.append_fmt(format_args!($($tt)*))
	}};
}
