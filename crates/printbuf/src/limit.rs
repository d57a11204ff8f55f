/// Ceiling policy for a [`PrintBuf`](crate::PrintBuf), fixed at construction.
///
/// The limit decides how far [`PrintBuf`](crate::PrintBuf) may grow and
/// therefore which storage transitions are possible. It replaces the magic
/// sentinel sizes (`0`, `1`, `-1`) historically used for this purpose with
/// named variants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SizeLimit {
    /// Do not write anything; only compute the total length.
    ///
    /// Useful as a measuring pass before a second, exactly-sized write pass.
    CountOnly,
    /// Cap the buffer at the embedded inline region, ruling out heap
    /// allocation entirely.
    Automatic,
    /// Cap the buffer at the given number of bytes (terminator included).
    Bytes(usize),
    /// Reallocate as necessary, up to the platform maximum.
    Unlimited,
}

impl SizeLimit {
    /// Resolves the policy to a concrete byte ceiling.
    ///
    /// `inline_capacity` substitutes for [`SizeLimit::Automatic`], mirroring
    /// the size of the embedded region of the buffer being configured.
    #[must_use]
    pub(crate) const fn resolve(self, inline_capacity: usize) -> usize {
        match self {
            Self::CountOnly => 0,
            Self::Automatic => inline_capacity,
            Self::Bytes(max) => max,
            Self::Unlimited => usize::MAX,
        }
    }
}

impl Default for SizeLimit {
    /// Defaults to [`SizeLimit::Unlimited`], the policy expected by callers
    /// that just want an append-only string.
    fn default() -> Self {
        Self::Unlimited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_only_resolves_to_zero() {
        assert_eq!(SizeLimit::CountOnly.resolve(1000), 0);
    }

    #[test]
    fn automatic_resolves_to_inline_capacity() {
        assert_eq!(SizeLimit::Automatic.resolve(1000), 1000);
        assert_eq!(SizeLimit::Automatic.resolve(64), 64);
    }

    #[test]
    fn bytes_resolves_to_itself() {
        assert_eq!(SizeLimit::Bytes(4096).resolve(1000), 4096);
    }

    #[test]
    fn unlimited_resolves_to_platform_maximum() {
        assert_eq!(SizeLimit::Unlimited.resolve(1000), usize::MAX);
    }

    #[test]
    fn default_is_unlimited() {
        assert_eq!(SizeLimit::default(), SizeLimit::Unlimited);
    }
}
