use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Behaviour toggles for a [`Logger`](crate::Logger), combinable with `|`.
///
/// # Examples
///
/// ```
/// use termlog::Flags;
///
/// let flags = Flags::SKIP_REPEATED | Flags::PRINT_LEVEL;
/// assert!(flags.contains(Flags::SKIP_REPEATED));
/// assert!(flags.contains(Flags::PRINT_LEVEL));
/// assert!(!Flags::NONE.contains(Flags::SKIP_REPEATED));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Flags(u32);

impl Flags {
    /// No behaviour toggles set; the default.
    pub const NONE: Self = Self(0);

    /// Swallow consecutive identical lines, replacing them with a single
    /// "Last message repeated N times" summary.
    ///
    /// This requires the application to route all terminal output through
    /// the logger; a stray direct write to the stream would interleave with
    /// the summary line. To flush a pending summary at program end, send an
    /// empty [`QUIET`](crate::Level::QUIET)-level message.
    pub const SKIP_REPEATED: Self = Self(1);

    /// Include the level tag in the line prefix, as in
    /// `[http @ conn-4] [error] connection reset`.
    pub const PRINT_LEVEL: Self = Self(2);

    /// Builds a flag set from raw bits. Unknown bits are preserved so the
    /// value round-trips through configuration layers.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Reports whether every flag in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for (flag, label) in [
            (Self::SKIP_REPEATED, "skip-repeated"),
            (Self::PRINT_LEVEL, "print-level"),
        ] {
            if self.contains(flag) {
                if wrote {
                    f.write_str("|")?;
                }
                f.write_str(label)?;
                wrote = true;
            }
        }
        if !wrote {
            f.write_str("none")?;
        }
        Ok(())
    }
}
