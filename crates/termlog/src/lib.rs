#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `termlog` is a leveled logging pipeline for terminal programs: printf-shape
//! call sites, a severity scale with eight color buckets, ANSI (or native
//! console) colorization, continued-line prefixes, and suppression of
//! consecutive repeated lines. Line composition runs on
//! [`printbuf`]'s growable buffers, so a log call performs no fallible
//! allocation on its hot path and degrades to truncation instead of failing.
//!
//! # Design
//!
//! A [`Logger`] owns the pipeline state: the level threshold, the behaviour
//! [`Flags`], and the installed [`LogSink`]. Messages at or below the
//! threshold (numerically, lower being more severe) are dispatched; everything
//! else is dropped before any formatting happens. The default
//! [`ConsoleSink`] composes each line from four independently colorized
//! segments, compares it against the previous line for
//! [`SKIP_REPEATED`](Flags::SKIP_REPEATED) handling, sanitizes control bytes,
//! and writes to standard error under a single lock.
//!
//! Color capability resolves once per sink from the environment
//! ([`ENV_FORCE_COLOR`], [`ENV_FORCE_NOCOLOR`], [`ENV_FORCE_256COLOR`], and
//! `TERM`) with tty autodetection as the fallback.
//!
//! # Invariants
//!
//! - A rejected call has no side effects: no bytes, no repeat-tracking, no
//!   prefix-state changes.
//! - Lines from concurrent callers never interleave character-by-character;
//!   the sink lock spans format and write.
//! - `log()` cannot fail observably. Callers needing delivery guarantees
//!   format through [`format_line_into`] and check the returned length.
//!
//! # Examples
//!
//! ```
//! use termlog::{log, Context, Flags, Level, Logger};
//!
//! let logger = Logger::global();
//! logger.set_level(Level::VERBOSE);
//! logger.set_flags(Flags::SKIP_REPEATED | Flags::PRINT_LEVEL);
//!
//! let ctx = Context::with_origin("decoder", "stream-0");
//! log!(&ctx, Level::WARNING, "missing reference frame {}\n", 4);
//! log!(None, Level::VERBOSE, "flushed {} frames\n", 17);
//! ```
//!
//! # See also
//!
//! - [`printbuf`] for the underlying growable, truncation-aware buffer.
//! - The `tracing` feature for routing `tracing` events through a [`Logger`].

mod color;
#[cfg(windows)]
#[allow(unsafe_code)]
mod console;
mod context;
mod flags;
mod format;
mod level;
mod logger;
mod macros;
mod sink;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use color::{ColorMode, ENV_FORCE_256COLOR, ENV_FORCE_COLOR, ENV_FORCE_NOCOLOR, ENV_TERM};
pub use context::Context;
pub use flags::Flags;
pub use format::{format_line, format_line_into};
pub use level::{Level, ParseLevelError};
pub use logger::Logger;
pub use sink::{ConsoleSink, LogSink, SinkFn, sink_fn};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{LoggerLayer, init_tracing};
