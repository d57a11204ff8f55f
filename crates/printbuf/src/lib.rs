#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `printbuf` provides [`PrintBuf`], a string buffer that grows as necessary
//! and keeps account of the total length callers *asked* to write, even when
//! capacity runs out. The content is never interpreted, so the buffer is
//! encoding-agnostic and can hold binary data.
//!
//! Small contents live in storage embedded in the buffer value itself, which
//! makes a stack-local `PrintBuf` almost as cheap as declaring a local
//! `[u8; 1024]`. Only when content outgrows the embedded region does the
//! buffer move to the heap.
//!
//! # Design
//!
//! The logical length can exceed the allocated capacity: the content is then
//! truncated, but [`PrintBuf::len`] still records the total length of what
//! would have been written with unlimited memory. Append operations therefore
//! never return errors. If an allocation fails or the configured ceiling is
//! reached, data stops being appended while the length keeps advancing; the
//! situation is observable through [`PrintBuf::is_complete`].
//!
//! The [`SizeLimit`] chosen at construction selects between three behaviours:
//!
//! - [`SizeLimit::Unlimited`] (or a large [`SizeLimit::Bytes`] value) lets the
//!   buffer reallocate as needed with amortized linear cost.
//! - [`SizeLimit::CountOnly`] prevents writing anything; only the total length
//!   is computed. The writes can then be repeated into a buffer with exactly
//!   the necessary size.
//! - [`SizeLimit::Automatic`] pins the ceiling to the embedded region, ruling
//!   out dynamic allocation entirely.
//!
//! # Invariants
//!
//! - Whenever `capacity > 0`, the stored content is NUL-terminated within
//!   capacity, so at most `capacity - 1` content bytes are materialized.
//! - `len` equals the sum of all requested append lengths regardless of how
//!   many were materialized in full.
//! - `is_complete()` holds iff `len < capacity`; once it turns false it stays
//!   false until [`PrintBuf::clear`] or re-initialisation.
//! - All size arithmetic saturates instead of wrapping.
//!
//! # Errors
//!
//! Appends have no error path by design. The only fallible operation is
//! [`PrintBuf::into_bytes`], which surfaces allocation failures as
//! [`FinalizeError`] instead of aborting.
//!
//! # Examples
//!
//! Build a line incrementally, then take an exact-sized copy:
//!
//! ```
//! use printbuf::PrintBuf;
//! use std::fmt::Write;
//!
//! let mut buf = PrintBuf::unlimited();
//! buf.append_str("status: ");
//! write!(buf, "{} of {}", 3, 7).unwrap();
//!
//! assert!(buf.is_complete());
//! assert_eq!(buf.bytes(), b"status: 3 of 7");
//!
//! let owned = buf.into_bytes().expect("allocation succeeds");
//! assert_eq!(owned, b"status: 3 of 7");
//! ```
//!
//! Measure first, then materialize into exactly the right size:
//!
//! ```
//! use printbuf::{PrintBuf, SizeLimit};
//!
//! let mut meter = PrintBuf::counting();
//! meter.append_str("hello world");
//! let needed = meter.len() + 1;
//!
//! let mut exact = PrintBuf::new(needed, SizeLimit::Bytes(needed));
//! exact.append_str("hello world");
//! assert!(exact.is_complete());
//! ```

mod append;
mod buffer;
mod limit;

pub use buffer::{FinalizeError, INLINE_CAPACITY, PrintBuf};
pub use limit::SizeLimit;
