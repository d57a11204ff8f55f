use std::fmt;
use std::str::FromStr;

/// Importance of a log message on a fixed integer scale.
///
/// Lower values are more severe, and adjacent named levels are 8 apart. The
/// unused low bits of each named value leave room for the per-call color
/// [tint](Self::with_tint) carried in bits 8..16, so a `Level` travels through
/// the pipeline as a single integer the way callers pass it.
///
/// # Examples
///
/// ```
/// use termlog::Level;
///
/// assert!(Level::ERROR.raw() < Level::INFO.raw());
/// assert_eq!(Level::WARNING.name(), "warning");
/// assert_eq!("debug".parse::<Level>().unwrap(), Level::DEBUG);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Level(i32);

impl Level {
    /// Print no output.
    pub const QUIET: Self = Self(-8);
    /// Something went really wrong; the program will crash now.
    pub const PANIC: Self = Self(0);
    /// Something went wrong and recovery is not possible.
    pub const FATAL: Self = Self(8);
    /// Something went wrong and cannot losslessly be recovered, but not all
    /// future data is affected.
    pub const ERROR: Self = Self(16);
    /// Something somehow does not look correct and may or may not lead to
    /// problems.
    pub const WARNING: Self = Self(24);
    /// Standard information.
    pub const INFO: Self = Self(32);
    /// Detailed information.
    pub const VERBOSE: Self = Self(40);
    /// Information useful mostly to developers.
    pub const DEBUG: Self = Self(48);
    /// Extremely verbose debugging.
    pub const TRACE: Self = Self(56);

    /// Span of the scale; as a threshold it accepts every named level.
    pub const MAX_OFFSET: Self = Self(Self::TRACE.0 - Self::QUIET.0);

    /// Number of color buckets the scale maps onto.
    pub(crate) const BUCKETS: usize = 8;

    /// Builds a level from its raw integer value.
    #[must_use]
    pub const fn from_raw(value: i32) -> Self {
        Self(value)
    }

    /// The raw integer value, tint included if one was packed in.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Packs a 256-color tint into the unused bits of the level value.
    ///
    /// The tint substitutes the foreground color of the message body when the
    /// sink has resolved 256-color output; other modes ignore it. Intended
    /// for extended debugging sessions.
    ///
    /// # Examples
    ///
    /// ```
    /// use termlog::Level;
    ///
    /// let purple = Level::DEBUG.with_tint(134);
    /// assert_eq!(purple.split_tint(), (Level::DEBUG, 134));
    /// ```
    #[must_use]
    pub const fn with_tint(self, tint: u8) -> Self {
        Self(self.0 | (tint as i32) << 8)
    }

    /// Splits the level into its severity part and the packed tint.
    ///
    /// Negative levels carry no tint; they pass through unchanged.
    #[must_use]
    pub const fn split_tint(self) -> (Self, u8) {
        if self.0 >= 0 {
            (Self(self.0 & 0xff), ((self.0 >> 8) & 0xff) as u8)
        } else {
            (self, 0)
        }
    }

    /// Reports whether a message at this level passes the given threshold.
    ///
    /// Filtering keeps messages at or below the threshold numerically, so a
    /// lower (more severe) threshold admits fewer messages.
    #[must_use]
    pub const fn is_within(self, threshold: Self) -> bool {
        self.0 <= threshold.0
    }

    /// Index of the color bucket for this level, clamped onto the scale.
    #[must_use]
    pub(crate) const fn bucket(self) -> usize {
        clip(self.0 >> 3, 0, (Self::BUCKETS - 1) as i32) as usize
    }

    /// The lowercase label used when rendering the level tag.
    ///
    /// Unnamed values render as an empty label, which keeps the prefix
    /// printable for levels produced by arithmetic on the raw scale.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self.0 {
            -8 => "quiet",
            0 => "panic",
            8 => "fatal",
            16 => "error",
            24 => "warning",
            32 => "info",
            40 => "verbose",
            48 => "debug",
            56 => "trace",
            _ => "",
        }
    }
}

/// Clips `value` into the `min..=max` range.
///
/// An inverted range is a programming error, not input-dependent, and panics.
const fn clip(value: i32, min: i32, max: i32) -> i32 {
    assert!(min <= max, "inverted clip range");
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        if name.is_empty() {
            write!(f, "{}", self.0)
        } else {
            f.write_str(name)
        }
    }
}

/// Error returned when parsing a [`Level`] from a string fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseLevelError {
    _private: (),
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unrecognised log level")
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "quiet" => Ok(Self::QUIET),
            "panic" => Ok(Self::PANIC),
            "fatal" => Ok(Self::FATAL),
            "error" => Ok(Self::ERROR),
            "warning" => Ok(Self::WARNING),
            "info" => Ok(Self::INFO),
            "verbose" => Ok(Self::VERBOSE),
            "debug" => Ok(Self::DEBUG),
            "trace" => Ok(Self::TRACE),
            _ => Err(ParseLevelError { _private: () }),
        }
    }
}
