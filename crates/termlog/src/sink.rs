use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use is_terminal::IsTerminal;
use printbuf::PrintBuf;

use crate::color::{ColorMode, write_colored};
use crate::context::Context;
use crate::flags::Flags;
use crate::format::compose;
use crate::level::Level;

/// Size of the line cache used for repeat detection; identical lines are
/// compared over at most this many bytes.
const LINE_MAX: usize = 1024;

/// Receives every log call that passed the level filter.
///
/// Implementations must be callable from multiple threads; the built-in
/// [`ConsoleSink`] serializes internally. For ad-hoc capture sinks in tests
/// and embedders, [`sink_fn`] wraps a plain function or closure.
pub trait LogSink: Send + Sync {
    /// Renders and delivers a single log call.
    ///
    /// `level` arrives as passed by the caller, tint included; split it with
    /// [`Level::split_tint`] when colorizing. `flags` is the pipeline's flag
    /// state at call time.
    fn emit(&self, context: Option<&Context<'_>>, level: Level, flags: Flags, message: fmt::Arguments<'_>);
}

/// Adapter returned by [`sink_fn`], dispatching every call to the wrapped
/// function.
pub struct SinkFn<F>(F);

/// Wraps a function as a [`LogSink`].
///
/// # Examples
///
/// ```
/// use std::fmt;
/// use std::sync::Arc;
/// use termlog::{sink_fn, Context, Flags, Level, Logger};
///
/// fn forward(
///     _context: Option<&Context<'_>>,
///     level: Level,
///     _flags: Flags,
///     message: fmt::Arguments<'_>,
/// ) {
///     eprintln!("{level}: {message}");
/// }
///
/// let logger = Logger::with_sink(Arc::new(sink_fn(forward)));
/// logger.log(None, Level::WARNING, format_args!("redirected"));
/// ```
pub fn sink_fn<F>(function: F) -> SinkFn<F>
where
    F: Fn(Option<&Context<'_>>, Level, Flags, fmt::Arguments<'_>) + Send + Sync,
{
    SinkFn(function)
}

impl<F> LogSink for SinkFn<F>
where
    F: Fn(Option<&Context<'_>>, Level, Flags, fmt::Arguments<'_>) + Send + Sync,
{
    fn emit(&self, context: Option<&Context<'_>>, level: Level, flags: Flags, message: fmt::Arguments<'_>) {
        (self.0)(context, level, flags, message);
    }
}

/// Mutable emission state, guarded as one unit so that composing, the
/// repeat decision, and the write are atomic with respect to other callers.
struct Emitter<W> {
    writer: W,
    is_tty: bool,
    color: Option<ColorMode>,
    prefix_due: bool,
    prev: Vec<u8>,
    repeat: u32,
    #[cfg(windows)]
    console: Option<crate::console::WinConsole>,
}

/// The default sink: formats, colorizes, and writes each accepted call to a
/// byte stream, swallowing consecutive repeats when asked to.
///
/// One mutex is held for the whole of formatting, suppression bookkeeping,
/// and emission, so lines from concurrent callers never interleave
/// character-by-character. A stalled writer therefore blocks every logging
/// thread; sinks are expected to point at streams that drain promptly.
///
/// # Examples
///
/// Capture output in memory instead of writing to the terminal:
///
/// ```
/// use std::sync::Arc;
/// use termlog::{ColorMode, ConsoleSink, Level, Logger};
///
/// let sink = Arc::new(ConsoleSink::with_parts(Vec::new(), false, Some(ColorMode::Disabled)));
/// let logger = Logger::with_sink(sink.clone());
/// logger.log(None, Level::ERROR, format_args!("boom\n"));
///
/// drop(logger);
/// let output = Arc::try_unwrap(sink).ok().expect("no other handles").into_inner();
/// assert_eq!(output, b"boom\n");
/// ```
pub struct ConsoleSink<W> {
    inner: Mutex<Emitter<W>>,
}

impl ConsoleSink<io::Stderr> {
    /// Builds the sink the pipeline installs by default: standard error,
    /// with tty detection and environment-driven color resolution.
    #[must_use]
    pub fn stderr() -> Self {
        let stream = io::stderr();
        let is_tty = stream.is_terminal();
        let sink = Self::with_parts(stream, is_tty, None);
        #[cfg(windows)]
        {
            let mut emitter = sink.inner.lock().unwrap_or_else(PoisonError::into_inner);
            emitter.console = crate::console::WinConsole::stderr();
            emitter.is_tty |= emitter.console.is_some();
            drop(emitter);
        }
        sink
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Builds a sink over an arbitrary writer, treated as non-interactive;
    /// colors still resolve lazily from the environment.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_parts(writer, false, None)
    }

    /// Builds a sink from explicit parts.
    ///
    /// `color` of `None` defers resolution to the first colorized write,
    /// consulting the environment; a `Some` pins the mode, which test
    /// pipelines use to stay independent of the calling environment.
    #[must_use]
    pub fn with_parts(writer: W, is_tty: bool, color: Option<ColorMode>) -> Self {
        Self {
            inner: Mutex::new(Emitter {
                writer,
                is_tty,
                color,
                prefix_due: true,
                prev: Vec::new(),
                repeat: 0,
                #[cfg(windows)]
                console: None,
            }),
        }
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }
}

impl<W: Write + Send> LogSink for ConsoleSink<W> {
    fn emit(&self, context: Option<&Context<'_>>, level: Level, flags: Flags, message: fmt::Arguments<'_>) {
        // A panic mid-emission only ever leaves cosmetic state behind;
        // keep logging rather than poisoning every later call.
        let mut emitter = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        emitter.emit(context, level, flags, message);
    }
}

impl<W: Write> Emitter<W> {
    fn emit(&mut self, context: Option<&Context<'_>>, level: Level, flags: Flags, message: fmt::Arguments<'_>) {
        let (severity, tint) = level.split_tint();
        let mut segments = compose(context, level, flags, message, &mut self.prefix_due);

        let mut line_storage = [0u8; LINE_MAX];
        let mut line = PrintBuf::with_fixed_storage(&mut line_storage);
        segments.write_into(&mut line);
        let line_bytes = line.bytes();

        if self.prefix_due
            && flags.contains(Flags::SKIP_REPEATED)
            && !line_bytes.is_empty()
            && line_bytes == self.prev.as_slice()
            && line_bytes.last() != Some(&b'\r')
        {
            self.repeat += 1;
            if self.is_tty {
                let _ = write!(self.writer, "    Last message repeated {} times\r", self.repeat);
            }
            return;
        }
        if self.repeat > 0 {
            let _ = writeln!(self.writer, "    Last message repeated {} times", self.repeat);
            self.repeat = 0;
        }
        self.prev.clear();
        self.prev.extend_from_slice(line_bytes);

        let color = self.resolve_color();
        let bucket = severity.bucket();
        for (index, part) in segments.parts_mut().iter_mut().enumerate() {
            sanitize(part.bytes_mut());
            let mode = if index < 2 {
                ColorMode::Disabled
            } else {
                segment_mode(color, bucket, tint)
            };
            self.write_segment(mode, bucket, tint, part.bytes());
        }
    }

    fn resolve_color(&mut self) -> ColorMode {
        if let Some(mode) = self.color {
            return mode;
        }
        let mode = ColorMode::from_env(self.is_tty);
        self.color = Some(mode);
        mode
    }

    fn write_segment(&mut self, mode: ColorMode, bucket: usize, tint: u8, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        #[cfg(windows)]
        if let Some(console) = &self.console {
            let text = String::from_utf8_lossy(bytes);
            if mode.is_enabled() {
                console.set_level_color(bucket);
            }
            console.write(&text);
            if mode.is_enabled() {
                console.restore();
            }
            return;
        }
        let _ = write_colored(&mut self.writer, mode, bucket, tint, bytes);
    }
}

/// Color selection for the level-tag and body segments: the info bucket
/// stays plain unless a tint is in play under 256-color output.
fn segment_mode(color: ColorMode, bucket: usize, tint: u8) -> ColorMode {
    if bucket == Level::INFO.bucket() && !(tint != 0 && color == ColorMode::Ansi256) {
        ColorMode::Disabled
    } else {
        color
    }
}

/// Replaces control bytes that could corrupt a terminal with a placeholder.
/// Backspace through carriage return (0x08..=0x0D) pass through.
fn sanitize(bytes: &mut [u8]) {
    for byte in bytes {
        if *byte < 0x08 || (*byte > 0x0D && *byte < 0x20) {
            *byte = b'?';
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_low_controls() {
        let mut bytes = *b"a\x01b\x1bc";
        sanitize(&mut bytes);
        assert_eq!(&bytes, b"a?b?c");
    }

    #[test]
    fn sanitize_keeps_whitespace_controls() {
        let mut bytes = *b"a\tb\nc\rd";
        sanitize(&mut bytes);
        assert_eq!(&bytes, b"a\tb\nc\rd");
    }

    #[test]
    fn sanitize_boundaries_are_exact() {
        let mut bytes = [0x07, 0x08, 0x0D, 0x0E, 0x1F, 0x20];
        sanitize(&mut bytes);
        assert_eq!(bytes, [b'?', 0x08, 0x0D, b'?', b'?', 0x20]);
    }

    #[test]
    fn info_segment_stays_plain_without_tint() {
        assert_eq!(
            segment_mode(ColorMode::Ansi16, Level::INFO.bucket(), 0),
            ColorMode::Disabled
        );
        assert_eq!(
            segment_mode(ColorMode::Ansi256, Level::INFO.bucket(), 0),
            ColorMode::Disabled
        );
    }

    #[test]
    fn info_segment_honors_a_256color_tint() {
        assert_eq!(
            segment_mode(ColorMode::Ansi256, Level::INFO.bucket(), 99),
            ColorMode::Ansi256
        );
        // a tint without 256-color support changes nothing
        assert_eq!(
            segment_mode(ColorMode::Ansi16, Level::INFO.bucket(), 99),
            ColorMode::Disabled
        );
    }

    #[test]
    fn non_info_segments_use_the_resolved_mode() {
        assert_eq!(
            segment_mode(ColorMode::Ansi16, Level::ERROR.bucket(), 0),
            ColorMode::Ansi16
        );
        assert_eq!(
            segment_mode(ColorMode::Disabled, Level::ERROR.bucket(), 0),
            ColorMode::Disabled
        );
    }

    #[test]
    fn into_inner_returns_the_writer() {
        let sink = ConsoleSink::with_parts(Vec::new(), false, Some(ColorMode::Disabled));
        sink.emit(None, Level::ERROR, Flags::NONE, format_args!("x\n"));
        let output = sink.into_inner();
        assert_eq!(output, b"x\n");
    }
}
