//! An append-only text buffer used as the target for statement rendering.
//!
//! The buffer grows by doubling: whenever an append would reach or exceed
//! the current capacity, the storage is reallocated to twice the length
//! required after the append. Formatted appends are measured before they
//! are written, so the buffer grows at most once per append and never
//! truncates output.
//!
//! The buffer can be read back as a NUL-terminated byte string without the
//! terminator ever becoming part of the logical content: subsequent appends
//! continue from the same length and overwrite it.

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;

use crate::cnf::INITIAL_BUFFER_CAPACITY;
use crate::err::Error;

#[derive(Debug)]
pub struct TextBuffer {
	/// Backing storage. Holds `len` content bytes, optionally followed by a
	/// single terminator left behind by [`TextBuffer::as_terminated`].
	mem: Vec<u8>,
	/// The number of bytes appended so far
	len: usize,
}

impl Default for TextBuffer {
	fn default() -> Self {
		Self::new()
	}
}

impl TextBuffer {
	/// Creates an empty buffer with the default initial capacity
	pub fn new() -> Self {
		Self::with_capacity(INITIAL_BUFFER_CAPACITY)
	}

	/// Creates an empty buffer with at least the given capacity
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			mem: Vec::with_capacity(capacity),
			len: 0,
		}
	}

	/// The number of content bytes written so far
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// The number of bytes currently allocated
	pub fn capacity(&self) -> usize {
		self.mem.capacity()
	}

	/// Appends raw bytes to the end of the buffer
	pub fn append(&mut self, bytes: &[u8]) -> Result<(), Error> {
		self.reserve(bytes.len())?;
		self.mem.extend_from_slice(bytes);
		self.len += bytes.len();
		Ok(())
	}

	/// Appends a string to the end of the buffer
	pub fn append_str(&mut self, text: &str) -> Result<(), Error> {
		self.append(text.as_bytes())
	}

	/// Appends formatted text to the end of the buffer.
	///
	/// The arguments are formatted twice: once into a counter to learn the
	/// exact length, and once directly into the reserved tail. Prefer the
	/// [`write_buf!`](crate::write_buf) macro over calling this directly.
	pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Error> {
		let mut counter = Counter(0);
		fmt::write(&mut counter, args)?;
		self.reserve(counter.0)?;
		let mut tail = Tail(&mut self.mem);
		if let Err(e) = fmt::write(&mut tail, args) {
			// Leave no partial output behind
			self.mem.truncate(self.len);
			return Err(e.into());
		}
		self.len = self.mem.len();
		Ok(())
	}

	/// Returns the written bytes followed by a single NUL terminator.
	///
	/// The terminator is not counted in [`TextBuffer::len`]. If the buffer
	/// is exactly full, it is grown first.
	pub fn as_terminated(&mut self) -> Result<&[u8], Error> {
		if self.mem.len() == self.len {
			if self.len == self.mem.capacity() {
				self.reserve(1)?;
			}
			self.mem.push(0);
		}
		debug_assert_eq!(self.mem.len(), self.len + 1);
		Ok(&self.mem[..=self.len])
	}

	/// Returns the written bytes as a C string
	pub fn as_c_str(&mut self) -> Result<&CStr, Error> {
		if let Some(pos) = self.as_bytes().iter().position(|b| *b == 0) {
			return Err(Error::InteriorNul(pos));
		}
		let len = self.len;
		let bytes = self.as_terminated()?;
		CStr::from_bytes_with_nul(bytes).map_err(|_| Error::InteriorNul(len))
	}

	/// Returns the written bytes, without a terminator
	pub fn as_bytes(&self) -> &[u8] {
		&self.mem[..self.len]
	}

	/// Returns the written text, failing if it is not valid UTF-8
	pub fn as_str(&self) -> Result<&str, Error> {
		Ok(std::str::from_utf8(self.as_bytes())?)
	}

	/// Returns the written text, replacing any invalid UTF-8 sequences
	pub fn to_string_lossy(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(self.as_bytes())
	}

	/// Consumes the buffer, returning the written text as an owned string
	pub fn into_string(mut self) -> String {
		self.mem.truncate(self.len);
		match String::from_utf8(self.mem) {
			Ok(text) => text,
			Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
		}
	}

	/// Makes room for `additional` bytes after the current content.
	///
	/// Any terminator left behind by a previous read is dropped, so the
	/// storage length equals `len` afterwards.
	fn reserve(&mut self, additional: usize) -> Result<(), Error> {
		self.mem.truncate(self.len);
		let required = self.len.saturating_add(additional);
		if required < self.mem.capacity() {
			return Ok(());
		}
		let requested = required.saturating_mul(2);
		self.mem.try_reserve_exact(requested - self.len).map_err(|source| Error::Allocation {
			requested,
			source,
		})?;
		trace!(len = self.len, capacity = self.mem.capacity(), "Grew text buffer");
		Ok(())
	}
}

/// Counts the bytes a formatting pass would produce
struct Counter(usize);

impl fmt::Write for Counter {
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.0 += s.len();
		Ok(())
	}
}

/// Writes into storage which has already been reserved
struct Tail<'a>(&'a mut Vec<u8>);

impl fmt::Write for Tail<'_> {
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.0.extend_from_slice(s.as_bytes());
		Ok(())
	}
}
