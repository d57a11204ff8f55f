use std::env;
use std::io::{self, Write};

use crate::level::Level;

/// Environment variable that forces color output off.
pub const ENV_FORCE_NOCOLOR: &str = "TERMLOG_FORCE_NOCOLOR";
/// Environment variable that forces color output on, tty or not.
pub const ENV_FORCE_COLOR: &str = "TERMLOG_FORCE_COLOR";
/// Environment variable that forces 256-color output.
pub const ENV_FORCE_256COLOR: &str = "TERMLOG_FORCE_256COLOR";
/// Terminal-type variable consulted for 256-color capability.
pub const ENV_TERM: &str = "TERM";

/// Resolved color capability of a sink.
///
/// Resolution happens once per sink, on the first colorized write, and is
/// cached for the sink's lifetime.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ColorMode {
    /// Plain bytes, no escape sequences.
    Disabled,
    /// 16-color ANSI escapes.
    Ansi16,
    /// 256-color ANSI escapes, enabling per-call tints.
    Ansi256,
}

impl ColorMode {
    /// Reports whether any colorization is active.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Resolves a color mode from explicit signals.
    ///
    /// Forcing color off wins over everything. Forcing it on wins over tty
    /// detection. Otherwise color requires both a terminal-type variable and
    /// an interactive stream. 256-color mode upgrades an enabled result when
    /// forced or when the terminal type advertises it.
    ///
    /// # Examples
    ///
    /// ```
    /// use termlog::ColorMode;
    ///
    /// assert_eq!(ColorMode::detect(true, true, true, Some("xterm-256color"), true), ColorMode::Disabled);
    /// assert_eq!(ColorMode::detect(false, false, false, Some("xterm"), true), ColorMode::Ansi16);
    /// assert_eq!(ColorMode::detect(false, false, false, Some("xterm-256color"), true), ColorMode::Ansi256);
    /// assert_eq!(ColorMode::detect(false, false, false, Some("xterm"), false), ColorMode::Disabled);
    /// assert_eq!(ColorMode::detect(false, true, false, None, false), ColorMode::Ansi16);
    /// ```
    #[must_use]
    pub fn detect(
        force_nocolor: bool,
        force_color: bool,
        force_256color: bool,
        term: Option<&str>,
        stream_is_tty: bool,
    ) -> Self {
        let enabled = if force_nocolor {
            false
        } else if force_color {
            true
        } else {
            term.is_some() && stream_is_tty
        };
        if !enabled {
            return Self::Disabled;
        }
        if force_256color || term.is_some_and(|term| term.contains("256color")) {
            Self::Ansi256
        } else {
            Self::Ansi16
        }
    }

    /// Resolves a color mode from the process environment.
    pub(crate) fn from_env(stream_is_tty: bool) -> Self {
        let term = env::var(ENV_TERM).ok();
        Self::detect(
            env::var_os(ENV_FORCE_NOCOLOR).is_some(),
            env::var_os(ENV_FORCE_COLOR).is_some(),
            env::var_os(ENV_FORCE_256COLOR).is_some(),
            term.as_deref(),
            stream_is_tty,
        )
    }
}

/// Per-bucket colors, packed as `background << 16 | foreground256 << 8 |
/// attribute << 4 | foreground16`.
const LEVEL_COLORS: [u32; Level::BUCKETS] = [
    52 << 16 | 196 << 8 | 0x41, // panic
    208 << 8 | 0x41,            // fatal
    196 << 8 | 0x11,            // error
    226 << 8 | 0x03,            // warning
    253 << 8 | 0x09,            // info
    40 << 8 | 0x02,             // verbose
    34 << 8 | 0x02,             // debug
    34 << 8 | 0x07,             // trace
];

/// 16-color console attributes for the same buckets, used by the native
/// console backend where ANSI escapes are unavailable.
#[cfg(windows)]
pub(crate) const LEVEL_ATTRIBUTES: [u16; Level::BUCKETS] = [12, 12, 12, 14, 7, 10, 10, 8];

/// Writes one segment with the escape sequence its mode calls for.
///
/// A nonzero tint replaces the 256-color foreground while keeping the
/// bucket's background; the 16-color mode has no tint channel.
pub(crate) fn write_colored<W: Write>(
    writer: &mut W,
    mode: ColorMode,
    bucket: usize,
    tint: u8,
    text: &[u8],
) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let packed = LEVEL_COLORS[bucket];
    match mode {
        ColorMode::Disabled => writer.write_all(text),
        ColorMode::Ansi16 => {
            write!(writer, "\x1b[{};3{}m", (packed >> 4) & 15, packed & 15)?;
            writer.write_all(text)?;
            writer.write_all(b"\x1b[0m")
        }
        ColorMode::Ansi256 => {
            let foreground = if tint == 0 { (packed >> 8) & 0xff } else { u32::from(tint) };
            write!(writer, "\x1b[48;5;{}m\x1b[38;5;{}m", (packed >> 16) & 0xff, foreground)?;
            writer.write_all(text)?;
            writer.write_all(b"\x1b[0m")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_nocolor_beats_every_other_signal() {
        assert_eq!(
            ColorMode::detect(true, true, true, Some("xterm-256color"), true),
            ColorMode::Disabled
        );
    }

    #[test]
    fn force_color_enables_without_a_tty() {
        assert_eq!(ColorMode::detect(false, true, false, None, false), ColorMode::Ansi16);
    }

    #[test]
    fn force_256color_upgrades_a_forced_result() {
        assert_eq!(ColorMode::detect(false, true, true, None, false), ColorMode::Ansi256);
    }

    #[test]
    fn autodetection_needs_term_and_tty() {
        assert_eq!(ColorMode::detect(false, false, false, None, true), ColorMode::Disabled);
        assert_eq!(ColorMode::detect(false, false, false, Some("xterm"), false), ColorMode::Disabled);
        assert_eq!(ColorMode::detect(false, false, false, Some("xterm"), true), ColorMode::Ansi16);
    }

    #[test]
    fn term_advertising_256color_upgrades() {
        assert_eq!(
            ColorMode::detect(false, false, false, Some("screen-256color"), true),
            ColorMode::Ansi256
        );
    }

    #[test]
    fn disabled_mode_passes_bytes_through() {
        let mut out = Vec::new();
        write_colored(&mut out, ColorMode::Disabled, Level::ERROR.bucket(), 0, b"plain").unwrap();
        assert_eq!(out, b"plain");
    }

    #[test]
    fn ansi16_wraps_text_in_escapes() {
        let mut out = Vec::new();
        write_colored(&mut out, ColorMode::Ansi16, Level::ERROR.bucket(), 0, b"bad").unwrap();
        assert_eq!(out, b"\x1b[1;31mbad\x1b[0m");
    }

    #[test]
    fn ansi256_uses_the_palette_foreground() {
        let mut out = Vec::new();
        write_colored(&mut out, ColorMode::Ansi256, Level::WARNING.bucket(), 0, b"w").unwrap();
        assert_eq!(out, b"\x1b[48;5;0m\x1b[38;5;226mw\x1b[0m");
    }

    #[test]
    fn tint_substitutes_the_256color_foreground() {
        let mut out = Vec::new();
        write_colored(&mut out, ColorMode::Ansi256, Level::DEBUG.bucket(), 134, b"t").unwrap();
        assert_eq!(out, b"\x1b[48;5;0m\x1b[38;5;134mt\x1b[0m");
    }

    #[test]
    fn empty_text_writes_nothing_at_all() {
        let mut out = Vec::new();
        write_colored(&mut out, ColorMode::Ansi16, 0, 0, b"").unwrap();
        assert!(out.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_kebab_case_labels() {
        assert_eq!(serde_json::to_string(&ColorMode::Ansi256).unwrap(), "\"ansi256\"");
    }
}
