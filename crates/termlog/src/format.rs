use std::fmt;

use printbuf::{PrintBuf, SizeLimit};

use crate::context::Context;
use crate::flags::Flags;
use crate::level::Level;

/// Ceiling for the message-body segment. Prefix segments stay within the
/// buffer's embedded region.
const BODY_CAPACITY_MAX: usize = 65536;

/// One composed log line, kept as its four logical segments so the sink can
/// colorize them independently: a reserved leading segment, the context
/// prefix, the level tag, and the message body.
pub(crate) struct LineSegments {
    parts: [PrintBuf<'static>; 4],
}

impl LineSegments {
    fn new() -> Self {
        Self {
            parts: [
                PrintBuf::automatic(),
                PrintBuf::automatic(),
                PrintBuf::automatic(),
                PrintBuf::new(0, SizeLimit::Bytes(BODY_CAPACITY_MAX)),
            ],
        }
    }

    pub(crate) fn parts(&self) -> &[PrintBuf<'static>; 4] {
        &self.parts
    }

    pub(crate) fn parts_mut(&mut self) -> &mut [PrintBuf<'static>; 4] {
        &mut self.parts
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| part.bytes().is_empty())
    }

    /// Appends every segment's materialized content to `out`.
    pub(crate) fn write_into(&self, out: &mut PrintBuf<'_>) {
        for part in &self.parts {
            out.append_bytes(part.bytes());
        }
    }
}

/// Composes the segments of one log line and advances the prefix state.
///
/// The context prefix and level tag are emitted only when a prefix is due,
/// i.e. when the previous line ended at a line boundary. Afterwards
/// `prefix_due` reflects whether *this* line ended at one: a body without a
/// trailing newline suppresses the prefix on the next call, modeling
/// continued-line output. The state only moves when something was composed,
/// so an entirely empty call leaves it untouched.
pub(crate) fn compose(
    context: Option<&Context<'_>>,
    level: Level,
    flags: Flags,
    message: fmt::Arguments<'_>,
    prefix_due: &mut bool,
) -> LineSegments {
    let (severity, _tint) = level.split_tint();
    let mut segments = LineSegments::new();

    if *prefix_due {
        if let Some(context) = context {
            let part = &mut segments.parts[1];
            match context.origin() {
                Some(origin) => {
                    part.append_format(format_args!("[{} @ {}] ", context.name(), origin));
                }
                None => part.append_format(format_args!("[{}] ", context.name())),
            }
        }
        if severity.raw() > Level::QUIET.raw() && flags.contains(Flags::PRINT_LEVEL) {
            segments.parts[2].append_format(format_args!("[{}] ", severity.name()));
        }
    }
    segments.parts[3].append_format(message);

    if !segments.is_empty() {
        let body = &segments.parts[3];
        let last = if body.is_empty() || !body.is_complete() {
            None
        } else {
            body.bytes().last().copied()
        };
        *prefix_due = matches!(last, Some(b'\n' | b'\r'));
    }
    segments
}

/// Formats one log line the same way the default sink renders it, without
/// color, suppression, or locking.
///
/// `prefix_due` must persist across calls and start out `true`; it carries
/// the continued-line state between lines.
///
/// # Examples
///
/// ```
/// use termlog::{format_line, Context, Flags, Level};
///
/// let ctx = Context::new("engine");
/// let mut prefix_due = true;
/// let line = format_line(
///     Some(&ctx),
///     Level::ERROR,
///     Flags::PRINT_LEVEL,
///     format_args!("stall detected\n"),
///     &mut prefix_due,
/// );
/// assert_eq!(line, "[engine] [error] stall detected\n");
/// assert!(prefix_due);
/// ```
#[must_use]
pub fn format_line(
    context: Option<&Context<'_>>,
    level: Level,
    flags: Flags,
    message: fmt::Arguments<'_>,
    prefix_due: &mut bool,
) -> String {
    let segments = compose(context, level, flags, message, prefix_due);
    let mut line = String::new();
    for part in segments.parts() {
        line.push_str(&String::from_utf8_lossy(part.bytes()));
    }
    line
}

/// Formats one log line into a caller-provided buffer.
///
/// Returns the number of bytes the full line needs, excluding the
/// terminator the buffer receives in its final byte. A return value greater
/// than or equal to `line.len()` means the line was truncated to fit, the
/// same convention as a bounded formatted print.
///
/// # Examples
///
/// ```
/// use termlog::{format_line_into, Flags, Level};
///
/// let mut line = [0u8; 8];
/// let mut prefix_due = true;
/// let needed = format_line_into(
///     &mut line,
///     None,
///     Level::INFO,
///     Flags::NONE,
///     format_args!("0123456789"),
///     &mut prefix_due,
/// );
/// assert_eq!(needed, 10);
/// assert!(needed >= line.len()); // truncated
/// assert_eq!(&line[..7], b"0123456");
/// ```
pub fn format_line_into(
    line: &mut [u8],
    context: Option<&Context<'_>>,
    level: Level,
    flags: Flags,
    message: fmt::Arguments<'_>,
    prefix_due: &mut bool,
) -> usize {
    let segments = compose(context, level, flags, message, prefix_due);
    let mut out = PrintBuf::with_fixed_storage(line);
    segments.write_into(&mut out);
    out.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_and_level_tag_render_in_order() {
        let ctx = Context::with_origin("http", "conn-4");
        let mut prefix_due = true;
        let line = format_line(
            Some(&ctx),
            Level::WARNING,
            Flags::PRINT_LEVEL,
            format_args!("slow response\n"),
            &mut prefix_due,
        );
        assert_eq!(line, "[http @ conn-4] [warning] slow response\n");
    }

    #[test]
    fn level_tag_requires_the_flag() {
        let ctx = Context::new("http");
        let mut prefix_due = true;
        let line = format_line(
            Some(&ctx),
            Level::WARNING,
            Flags::NONE,
            format_args!("slow response\n"),
            &mut prefix_due,
        );
        assert_eq!(line, "[http] slow response\n");
    }

    #[test]
    fn quiet_level_never_gets_a_tag() {
        let mut prefix_due = true;
        let line = format_line(
            None,
            Level::QUIET,
            Flags::PRINT_LEVEL,
            format_args!("x"),
            &mut prefix_due,
        );
        assert_eq!(line, "x");
    }

    #[test]
    fn unterminated_body_suppresses_next_prefix() {
        let ctx = Context::new("dl");
        let mut prefix_due = true;

        let first = format_line(
            Some(&ctx),
            Level::INFO,
            Flags::NONE,
            format_args!("progress: "),
            &mut prefix_due,
        );
        assert_eq!(first, "[dl] progress: ");
        assert!(!prefix_due);

        let second = format_line(
            Some(&ctx),
            Level::INFO,
            Flags::NONE,
            format_args!("42%\n"),
            &mut prefix_due,
        );
        assert_eq!(second, "42%\n");
        assert!(prefix_due);
    }

    #[test]
    fn carriage_return_re_arms_the_prefix() {
        let mut prefix_due = true;
        let _ = format_line(
            None,
            Level::INFO,
            Flags::NONE,
            format_args!("spinner\r"),
            &mut prefix_due,
        );
        assert!(prefix_due);
    }

    #[test]
    fn empty_call_leaves_prefix_state_untouched() {
        let mut prefix_due = false;
        let line = format_line(None, Level::QUIET, Flags::NONE, format_args!(""), &mut prefix_due);
        assert!(line.is_empty());
        assert!(!prefix_due);
    }

    #[test]
    fn tinted_level_formats_like_its_severity() {
        let mut prefix_due = true;
        let plain = format_line(
            None,
            Level::DEBUG,
            Flags::PRINT_LEVEL,
            format_args!("probe\n"),
            &mut prefix_due,
        );
        prefix_due = true;
        let tinted = format_line(
            None,
            Level::DEBUG.with_tint(134),
            Flags::PRINT_LEVEL,
            format_args!("probe\n"),
            &mut prefix_due,
        );
        assert_eq!(plain, tinted);
    }

    #[test]
    fn format_line_into_reports_exact_requirement_when_it_fits() {
        let mut line = [0u8; 64];
        let mut prefix_due = true;
        let needed = format_line_into(
            &mut line,
            None,
            Level::INFO,
            Flags::NONE,
            format_args!("done\n"),
            &mut prefix_due,
        );
        assert_eq!(needed, 5);
        assert_eq!(&line[..5], b"done\n");
        assert_eq!(line[5], 0);
    }

    #[test]
    fn two_compositions_of_the_same_input_are_identical() {
        let ctx = Context::new("codec");
        let mut first_state = true;
        let mut second_state = true;
        let first = format_line(
            Some(&ctx),
            Level::VERBOSE,
            Flags::PRINT_LEVEL,
            format_args!("frame {}\n", 9),
            &mut first_state,
        );
        let second = format_line(
            Some(&ctx),
            Level::VERBOSE,
            Flags::PRINT_LEVEL,
            format_args!("frame {}\n", 9),
            &mut second_state,
        );
        assert_eq!(first, second);
        assert_eq!(first_state, second_state);
    }
}
