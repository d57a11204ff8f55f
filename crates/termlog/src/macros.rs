/// Sends a formatted message through the process-wide [`Logger`].
///
/// The first argument is the [`Context`](crate::Context): pass `None` for
/// general messages or `&ctx` for component-attributed ones; both convert.
/// The remaining arguments are a level and a standard format string.
///
/// # Examples
///
/// ```
/// use termlog::{log, Context, Level};
///
/// let ctx = Context::new("net");
/// log!(&ctx, Level::WARNING, "retrying ({} left)\n", 2);
/// log!(None, Level::VERBOSE, "handshake done\n");
/// ```
///
/// [`Logger`]: crate::Logger
#[macro_export]
macro_rules! log {
    ($ctx:expr, $level:expr, $($arg:tt)+) => {
        $crate::Logger::global().log(($ctx).into(), $level, ::core::format_args!($($arg)+))
    };
}

/// Like [`log!`], but uses `$first` the first time the call site runs and
/// `$later` afterwards, tracked through caller-owned state.
///
/// # Examples
///
/// ```
/// use termlog::{log_once, Level};
///
/// let mut state = false;
/// for attempt in 0..3 {
///     log_once!(None, Level::WARNING, Level::VERBOSE, &mut state,
///               "deprecated option used (attempt {})\n", attempt);
/// }
/// assert!(state);
/// ```
#[macro_export]
macro_rules! log_once {
    ($ctx:expr, $first:expr, $later:expr, $state:expr, $($arg:tt)+) => {
        $crate::Logger::global().log_once(
            ($ctx).into(),
            $first,
            $later,
            $state,
            ::core::format_args!($($arg)+),
        )
    };
}
