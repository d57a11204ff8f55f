//! Integration tests for the growth policies of `PrintBuf`.
//!
//! These exercise the three storage modes end to end: inline storage that
//! migrates to the heap, bounded storage that converges on its ceiling, and
//! caller-provided storage that never grows.

use printbuf::{INLINE_CAPACITY, PrintBuf, SizeLimit};

// ============================================================================
// Inline to Heap Migration
// ============================================================================

/// A large single append jumps straight past doubling to the exact size.
#[test]
fn large_single_append_converges_in_one_step() {
    let mut buf = PrintBuf::unlimited();
    let content = "x".repeat(2000);
    buf.append_str(&content);

    assert!(buf.is_allocated());
    assert!(buf.capacity() >= 2001);
    assert_eq!(buf.bytes(), content.as_bytes());
    assert!(buf.is_complete());
}

/// Repeated small appends stay amortized: capacity grows by doubling, so the
/// final capacity is within a constant factor of the content size.
#[test]
fn repeated_small_appends_double_capacity() {
    let mut buf = PrintBuf::unlimited();
    for _ in 0..1000 {
        buf.append_str("abcdefgh");
    }

    assert_eq!(buf.len(), 8000);
    assert!(buf.is_complete());
    assert!(buf.capacity() >= 8001);
    assert!(buf.capacity() <= 4 * 8000);
}

/// Content written while inline survives the migration to the heap intact.
#[test]
fn migration_preserves_existing_content() {
    let mut buf = PrintBuf::unlimited();
    buf.append_str("prefix|");
    assert!(!buf.is_allocated());

    buf.append_str(&"y".repeat(INLINE_CAPACITY * 2));
    assert!(buf.is_allocated());
    assert!(buf.bytes().starts_with(b"prefix|"));
}

// ============================================================================
// Bounded Growth
// ============================================================================

/// Past half the ceiling, growth jumps straight to the ceiling.
#[test]
fn growth_jumps_to_ceiling_past_half() {
    let mut buf = PrintBuf::new(0, SizeLimit::Bytes(1800));
    buf.append_str(&"a".repeat(1600));

    assert_eq!(buf.capacity(), 1800);
    assert!(buf.is_complete());
}

/// Once at the ceiling the buffer truncates instead of growing further.
#[test]
fn ceiling_turns_overflow_into_truncation() {
    let mut buf = PrintBuf::new(0, SizeLimit::Bytes(100));
    buf.append_str(&"b".repeat(500));

    assert_eq!(buf.capacity(), 100);
    assert_eq!(buf.len(), 500);
    assert_eq!(buf.bytes().len(), 99);
    assert!(!buf.is_complete());
}

/// An automatic buffer never allocates, no matter how much is appended.
#[test]
fn automatic_buffer_never_allocates() {
    let mut buf = PrintBuf::automatic();
    for _ in 0..100 {
        buf.append_str(&"c".repeat(100));
    }

    assert!(!buf.is_allocated());
    assert_eq!(buf.capacity(), INLINE_CAPACITY);
    assert_eq!(buf.len(), 10_000);
}

// ============================================================================
// Truncation Is Sticky
// ============================================================================

/// A truncated buffer refuses to grow again even under its ceiling, since the
/// written prefix would no longer be an accurate prefix of the content.
#[test]
fn truncation_is_permanent_until_cleared() {
    let mut buf = PrintBuf::new(0, SizeLimit::Bytes(10));
    buf.append_str("0123456789ABC");
    assert!(!buf.is_complete());
    let capacity = buf.capacity();

    buf.append_str("more");
    assert_eq!(buf.capacity(), capacity);
    assert!(!buf.is_complete());

    buf.clear();
    assert!(buf.is_complete());
    buf.append_str("ok");
    assert_eq!(buf.bytes(), b"ok");
}
