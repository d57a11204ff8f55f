use std::collections::TryReserveError;
use std::fmt;

use crate::limit::SizeLimit;

/// Size in bytes of the storage region embedded in a [`PrintBuf`] value.
///
/// Content up to this size (terminator included) never touches the heap.
/// The region is large enough to hold a reasonable paragraph of text.
pub const INLINE_CAPACITY: usize = 1000;

/// Storage backing a [`PrintBuf`], selected at construction.
///
/// Only `Inline` to `Heap` transitions happen afterwards (on growth); the
/// other kinds never change.
enum Storage<'a> {
    /// Caller-owned memory. Never reallocated or released by the buffer.
    Fixed(&'a mut [u8]),
    /// The embedded region. No heap allocation while content fits.
    Inline([u8; INLINE_CAPACITY]),
    /// Buffer-owned heap memory, reallocated on growth.
    Heap(Vec<u8>),
}

/// Reason an internal growth request was denied. Appends translate every
/// variant into the truncated state rather than surfacing it.
#[derive(Debug, thiserror::Error)]
pub(crate) enum GrowError {
    #[error("capacity ceiling reached")]
    CeilingReached,
    #[error("buffer is already truncated")]
    AlreadyTruncated,
    #[error(transparent)]
    Alloc(#[from] TryReserveError),
}

/// Error returned by [`PrintBuf::into_bytes`] when allocating the owned,
/// exact-sized copy fails.
#[derive(Debug, thiserror::Error)]
#[error("allocating the finalized copy failed")]
pub struct FinalizeError(#[from] TryReserveError);

/// Buffer to print data progressively.
///
/// The buffer grows as necessary and its content is always NUL-terminated
/// within capacity. The logical length can go beyond the allocated size: the
/// content is then truncated, but [`len`](Self::len) still records the total
/// length of what would have been written given enough memory.
///
/// Append operations do not need to be tested for failure: when memory runs
/// out, data stops being appended but the length is still updated. The
/// situation can be tested with [`is_complete`](Self::is_complete).
///
/// # Examples
///
/// ```
/// use printbuf::PrintBuf;
///
/// let mut buf = PrintBuf::unlimited();
/// buf.append_str("alpha ");
/// buf.append_str("beta");
/// assert_eq!(buf.bytes(), b"alpha beta");
/// assert_eq!(buf.len(), 10);
/// assert!(buf.is_complete());
/// ```
///
/// A buffer bound to caller-provided storage records, but does not
/// materialize, whatever does not fit:
///
/// ```
/// use printbuf::PrintBuf;
///
/// let mut backing = [0u8; 8];
/// let mut buf = PrintBuf::with_fixed_storage(&mut backing);
/// buf.append_str("overlong content");
/// assert_eq!(buf.len(), 16);
/// assert_eq!(buf.bytes(), b"overlon");
/// assert!(!buf.is_complete());
/// ```
pub struct PrintBuf<'a> {
    storage: Storage<'a>,
    len: usize,
    capacity: usize,
    capacity_max: usize,
}

impl PrintBuf<'static> {
    /// Creates a buffer with the given initial size and growth ceiling.
    ///
    /// `size_init` includes the final terminator. Storage starts in the
    /// embedded region whenever the ceiling permits; an initial size beyond
    /// that region triggers an immediate growth request.
    #[must_use]
    pub fn new(size_init: usize, limit: SizeLimit) -> Self {
        let capacity_max = limit.resolve(INLINE_CAPACITY);
        let mut buf = Self {
            storage: Storage::Inline([0; INLINE_CAPACITY]),
            len: 0,
            capacity: INLINE_CAPACITY.min(capacity_max),
            capacity_max,
        };
        if size_init > buf.capacity {
            let _ = buf.grow(size_init - 1);
        }
        buf
    }

    /// Creates an unbounded buffer that starts in the embedded region.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(0, SizeLimit::Unlimited)
    }

    /// Creates a buffer capped at the embedded region, so it never allocates.
    #[must_use]
    pub fn automatic() -> Self {
        Self::new(0, SizeLimit::Automatic)
    }

    /// Creates a measuring buffer that counts lengths without writing.
    ///
    /// A counting buffer reports [`is_complete`](Self::is_complete) as
    /// `false` from the start; it exists purely to compute the size a second,
    /// exactly-dimensioned pass would need.
    #[must_use]
    pub fn counting() -> Self {
        Self::new(0, SizeLimit::CountOnly)
    }
}

impl<'a> PrintBuf<'a> {
    /// Binds the buffer to pre-existing caller-owned storage.
    ///
    /// The storage is never reallocated; writes beyond its size are recorded
    /// in [`len`](Self::len) but not materialized.
    #[must_use]
    pub fn with_fixed_storage(buffer: &'a mut [u8]) -> Self {
        let capacity = buffer.len();
        if capacity > 0 {
            buffer[0] = 0;
        }
        Self {
            storage: Storage::Fixed(buffer),
            len: 0,
            capacity,
            capacity_max: capacity,
        }
    }

    /// Total length of everything appended so far, truncated or not.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether nothing has been appended yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes currently usable, terminator included.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The growth ceiling fixed at construction.
    #[must_use]
    pub const fn capacity_max(&self) -> usize {
        self.capacity_max
    }

    /// Tests whether the buffer is complete (not truncated).
    ///
    /// It may have been truncated due to an allocation failure or to the
    /// configured ceiling; compare [`capacity`](Self::capacity) with
    /// [`capacity_max`](Self::capacity_max) to tell the two apart.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.len < self.capacity
    }

    /// Reports whether content has moved to buffer-owned heap storage.
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        matches!(self.storage, Storage::Heap(_))
    }

    /// The materialized content, terminator excluded.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        let end = self.len.min(self.capacity.saturating_sub(1));
        &self.storage()[..end]
    }

    /// Mutable view of the materialized content, for in-place rewrites such
    /// as sanitization. The terminator stays out of reach.
    #[must_use]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let end = self.len.min(self.capacity.saturating_sub(1));
        &mut self.storage_mut()[..end]
    }

    /// The materialized content as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.bytes()).ok()
    }

    /// Resets the content to empty while retaining capacity and any owned
    /// allocation for reuse.
    pub fn clear(&mut self) {
        if self.len > 0 {
            self.len = 0;
            if self.capacity > 0 {
                self.storage_mut()[0] = 0;
            }
        }
    }

    /// Reserves room at the end of the buffer for direct writing.
    ///
    /// Grows if needed, then returns the currently-available tail region,
    /// which can be larger or smaller than `size`. After filling it, call
    /// [`advance`](Self::advance) with the number of bytes actually written.
    ///
    /// This is the escape hatch for producers the buffer cannot drive itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use printbuf::PrintBuf;
    ///
    /// let mut buf = PrintBuf::unlimited();
    /// let tail = buf.get_buffer(3);
    /// tail[..3].copy_from_slice(b"abc");
    /// buf.advance(3);
    /// assert_eq!(buf.bytes(), b"abc");
    /// ```
    pub fn get_buffer(&mut self, size: usize) -> &mut [u8] {
        if size > self.room() {
            let _ = self.grow(size);
        }
        let room = self.room();
        let at = self.len.min(self.capacity);
        &mut self.storage_mut()[at..at + room]
    }

    /// Advances the logical length after a direct write into the region
    /// returned by [`get_buffer`](Self::get_buffer).
    ///
    /// `written` must not exceed the size of that region.
    pub fn advance(&mut self, written: usize) {
        debug_assert!(
            written <= self.room(),
            "advance({written}) exceeds the reserved room ({})",
            self.room()
        );
        self.advance_len(written);
    }

    /// Finalizes the buffer into an owned, exact-sized copy of the
    /// materialized content.
    ///
    /// Consuming the buffer releases any owned storage; the logical length
    /// should be read (and truncation checked) before finalizing.
    pub fn into_bytes(self) -> Result<Vec<u8>, FinalizeError> {
        let content = self.bytes();
        let mut owned = Vec::new();
        owned.try_reserve_exact(content.len())?;
        owned.extend_from_slice(content);
        Ok(owned)
    }

    /// Room left between the logical length and capacity.
    pub(crate) const fn room(&self) -> usize {
        self.capacity - min_usize(self.len, self.capacity)
    }

    /// Copies `data` into the tail of the storage region, up to `max` bytes.
    pub(crate) fn write_at_tail(&mut self, data: &[u8], max: usize) {
        let at = self.len;
        let real = data.len().min(max);
        self.storage_mut()[at..at + real].copy_from_slice(&data[..real]);
    }

    /// Fills the tail of the storage region with `count` copies of `byte`.
    pub(crate) fn fill_at_tail(&mut self, byte: u8, count: usize) {
        let at = self.len;
        self.storage_mut()[at..at + count].fill(byte);
    }

    /// Advances the logical length by `extra` and restores the terminator.
    ///
    /// The extra length is clamped a few bytes short of the platform maximum
    /// so later `len + 1` style arithmetic cannot overflow.
    pub(crate) fn advance_len(&mut self, extra: usize) {
        let extra = extra.min((usize::MAX - 5).saturating_sub(self.len));
        self.len += extra;
        if self.capacity > 0 {
            let at = self.len.min(self.capacity - 1);
            self.storage_mut()[at] = 0;
        }
    }

    /// Grows capacity so that `room` more bytes (plus terminator) fit.
    ///
    /// Capacity doubles until past half the ceiling, then jumps straight to
    /// it; if doubling still cannot hold the request, capacity is set to
    /// exactly the required minimum (ceiling permitting). Refuses to grow a
    /// buffer that is at its ceiling or already truncated, since the
    /// already-written prefix would no longer be an accurate prefix of the
    /// logical content.
    pub(crate) fn grow(&mut self, room: usize) -> Result<(), GrowError> {
        if self.capacity == self.capacity_max {
            return Err(GrowError::CeilingReached);
        }
        if !self.is_complete() {
            return Err(GrowError::AlreadyTruncated);
        }
        let min_size = self.len.saturating_add(1).saturating_add(room);
        let mut new_size = if self.capacity > self.capacity_max / 2 {
            self.capacity_max
        } else {
            self.capacity.saturating_mul(2)
        };
        if new_size < min_size {
            new_size = self.capacity_max.min(min_size);
        }

        if let Storage::Heap(vec) = &mut self.storage {
            vec.try_reserve_exact(new_size - vec.len())?;
            vec.resize(new_size, 0);
        } else {
            let mut vec = Vec::new();
            vec.try_reserve_exact(new_size)?;
            vec.resize(new_size, 0);
            // is_complete() held above, so content occupies exactly len bytes
            vec[..self.len].copy_from_slice(&self.storage()[..self.len]);
            self.storage = Storage::Heap(vec);
        }
        self.capacity = new_size;
        Ok(())
    }

    fn storage(&self) -> &[u8] {
        match &self.storage {
            Storage::Fixed(buffer) => buffer,
            Storage::Inline(region) => region,
            Storage::Heap(vec) => vec,
        }
    }

    fn storage_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Fixed(buffer) => buffer,
            Storage::Inline(region) => region,
            Storage::Heap(vec) => vec,
        }
    }
}

const fn min_usize(a: usize, b: usize) -> usize {
    if a < b { a } else { b }
}

impl Default for PrintBuf<'static> {
    /// Defaults to [`PrintBuf::unlimited`].
    fn default() -> Self {
        Self::unlimited()
    }
}

impl fmt::Debug for PrintBuf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintBuf")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("capacity_max", &self.capacity_max)
            .field("complete", &self.is_complete())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PrintBuf<'_> {
    /// Renders the materialized content, replacing invalid UTF-8 lossily.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.bytes()))
    }
}
