use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::context::Context;
use crate::flags::Flags;
use crate::level::Level;
use crate::sink::{ConsoleSink, LogSink};

/// The log pipeline: level threshold, behaviour flags, and the sink that
/// accepted calls are dispatched to.
///
/// A `Logger` is an explicitly constructed value rather than hidden process
/// state, so tests and embedders can run independent pipelines side by side;
/// [`Logger::global`] provides the shared process-wide instance normal code
/// logs through.
///
/// Every entry point is callable from multiple threads. Threshold and flags
/// are read with relaxed atomics on the hot path; the default sink serializes
/// formatting and emission behind its own single lock.
///
/// # Examples
///
/// ```
/// use termlog::{Context, Flags, Level, Logger};
///
/// let logger = Logger::global();
/// logger.set_level(Level::VERBOSE);
/// logger.set_flags(Flags::SKIP_REPEATED | Flags::PRINT_LEVEL);
///
/// let ctx = Context::new("startup");
/// logger.log(Some(&ctx), Level::INFO, format_args!("ready in {} ms\n", 12));
/// ```
pub struct Logger {
    threshold: AtomicI32,
    flags: AtomicU32,
    sink: RwLock<Arc<dyn LogSink>>,
}

impl Logger {
    /// Creates a pipeline with the default colorized stderr sink, an
    /// [`INFO`](Level::INFO) threshold, and no flags.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(ConsoleSink::stderr()))
    }

    /// Creates a pipeline dispatching to the given sink.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self {
            threshold: AtomicI32::new(Level::INFO.raw()),
            flags: AtomicU32::new(Flags::NONE.bits()),
            sink: RwLock::new(sink),
        }
    }

    /// The process-wide pipeline, created on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Logger> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// The current level threshold.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_raw(self.threshold.load(Ordering::Relaxed))
    }

    /// Sets the level threshold. Only messages at or below it (numerically)
    /// are emitted; [`Level::QUIET`] disables all named levels.
    pub fn set_level(&self, level: Level) {
        self.threshold.store(level.raw(), Ordering::Relaxed);
    }

    /// The current behaviour flags.
    #[must_use]
    pub fn flags(&self) -> Flags {
        Flags::from_bits(self.flags.load(Ordering::Relaxed))
    }

    /// Replaces the behaviour flags.
    pub fn set_flags(&self, flags: Flags) {
        self.flags.store(flags.bits(), Ordering::Relaxed);
    }

    /// Replaces the sink.
    ///
    /// Installation is not synchronized against in-flight log calls: a call
    /// that already passed the filter may still deliver to the previous
    /// sink. Install sinks before logging begins where that matters.
    pub fn set_sink(&self, sink: Arc<dyn LogSink>) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = sink;
    }

    /// Sends a message to the log if `level` passes the current threshold.
    ///
    /// Rejected calls have no side effect at all; in particular they do not
    /// touch the default sink's repeat tracking or prefix state. The level
    /// may carry a [tint](Level::with_tint); filtering looks at the severity
    /// part only.
    ///
    /// Use the [`log!`](crate::log) macro for the format-string call shape.
    pub fn log(&self, context: Option<&Context<'_>>, level: Level, message: fmt::Arguments<'_>) {
        let (severity, _tint) = level.split_tint();
        if !severity.is_within(self.level()) {
            return;
        }
        let sink = Arc::clone(&self.sink.read().unwrap_or_else(PoisonError::into_inner));
        sink.emit(context, level, self.flags(), message);
    }

    /// Sends a message with `first` the first time a call site runs and
    /// `later` on every subsequent run, tracked through `state`.
    ///
    /// `state` must start out `false` and belongs to the caller; the
    /// exclusive borrow is what keeps one state from being updated by two
    /// threads at once. This is unrelated to the repeated-*line* suppression
    /// of [`Flags::SKIP_REPEATED`].
    ///
    /// # Examples
    ///
    /// ```
    /// use termlog::{Level, Logger};
    ///
    /// let logger = Logger::global();
    /// let mut warned = false;
    /// for _ in 0..3 {
    ///     logger.log_once(
    ///         None,
    ///         Level::WARNING,
    ///         Level::VERBOSE,
    ///         &mut warned,
    ///         format_args!("codec is experimental\n"),
    ///     );
    /// }
    /// assert!(warned);
    /// ```
    pub fn log_once(
        &self,
        context: Option<&Context<'_>>,
        first: Level,
        later: Level,
        state: &mut bool,
        message: fmt::Arguments<'_>,
    ) {
        let level = if *state { later } else { first };
        self.log(context, level, message);
        *state = true;
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.level())
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Capture(Arc<Mutex<Vec<String>>>);

    impl LogSink for Capture {
        fn emit(
            &self,
            _context: Option<&Context<'_>>,
            level: Level,
            _flags: Flags,
            message: fmt::Arguments<'_>,
        ) {
            let (severity, _tint) = level.split_tint();
            self.0.lock().unwrap().push(format!("{severity}:{message}"));
        }
    }

    fn capture() -> (Arc<dyn LogSink>, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (Arc::new(Capture(Arc::clone(&lines))), lines)
    }

    fn swallow(_: Option<&Context<'_>>, _: Level, _: Flags, _: fmt::Arguments<'_>) {}

    #[test]
    fn plain_functions_wrap_into_sinks() {
        let logger = Logger::with_sink(Arc::new(crate::sink::sink_fn(swallow)));
        logger.log(None, Level::ERROR, format_args!("delivered nowhere"));
    }

    #[test]
    fn default_threshold_is_info() {
        let (sink, _lines) = capture();
        let logger = Logger::with_sink(sink);
        assert_eq!(logger.level(), Level::INFO);
        assert_eq!(logger.flags(), Flags::NONE);
    }

    #[test]
    fn rejected_levels_never_reach_the_sink() {
        let (sink, lines) = capture();
        let logger = Logger::with_sink(sink);
        logger.log(None, Level::DEBUG, format_args!("hidden"));
        logger.log(None, Level::ERROR, format_args!("shown"));
        assert_eq!(*lines.lock().unwrap(), vec!["error:shown".to_owned()]);
    }

    #[test]
    fn quiet_threshold_drops_every_named_level() {
        let (sink, lines) = capture();
        let logger = Logger::with_sink(sink);
        logger.set_level(Level::QUIET);
        logger.log(None, Level::PANIC, format_args!("even panic"));
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn tint_does_not_affect_filtering() {
        let (sink, lines) = capture();
        let logger = Logger::with_sink(sink);
        logger.set_level(Level::ERROR);
        logger.log(None, Level::ERROR.with_tint(200), format_args!("tinted"));
        logger.log(None, Level::WARNING.with_tint(200), format_args!("dropped"));
        assert_eq!(lines.lock().unwrap().len(), 1);
    }

    #[test]
    fn log_once_switches_levels_after_the_first_call() {
        let (sink, lines) = capture();
        let logger = Logger::with_sink(sink);
        logger.set_level(Level::WARNING);

        let mut state = false;
        for _ in 0..3 {
            logger.log_once(None, Level::WARNING, Level::VERBOSE, &mut state, format_args!("x"));
        }
        // the first call logs at WARNING; later VERBOSE calls fall under the
        // threshold and disappear
        assert_eq!(lines.lock().unwrap().len(), 1);
        assert!(state);
    }

    #[test]
    fn set_sink_replaces_the_destination() {
        let (first_sink, first_lines) = capture();
        let (second_sink, second_lines) = capture();
        let logger = Logger::with_sink(first_sink);

        logger.log(None, Level::INFO, format_args!("one"));
        logger.set_sink(second_sink);
        logger.log(None, Level::INFO, format_args!("two"));

        assert_eq!(first_lines.lock().unwrap().len(), 1);
        assert_eq!(second_lines.lock().unwrap().len(), 1);
    }

    #[test]
    fn max_offset_threshold_accepts_everything() {
        let (sink, lines) = capture();
        let logger = Logger::with_sink(sink);
        logger.set_level(Level::MAX_OFFSET);
        logger.log(None, Level::TRACE, format_args!("deep"));
        assert_eq!(lines.lock().unwrap().len(), 1);
    }
}
