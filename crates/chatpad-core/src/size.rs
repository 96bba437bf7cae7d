//! Byte budget of a single chat message.

/// Largest message the chat protocol accepts, in UTF-8 bytes.
pub const LIMIT: usize = 500;

/// Room kept free for an enumeration suffix such as ` (99/99)`.
///
/// Batches of 100 or more chat messages get longer suffixes; a message
/// packed to the budget can then end up over [`LIMIT`].
pub const ENUM_OVERHEAD: usize = 8;

/// Encoded size of `s`.  Multi-byte characters count for every byte they
/// occupy on the wire, not as one character.
#[inline]
pub fn byte_length(s: &str) -> usize {
    s.len()
}

/// Whether `s` fits in one message.
#[inline]
pub fn within_limit(s: &str) -> bool {
    byte_length(s) <= LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_bytes_not_chars() {
        assert_eq!(byte_length("abc"), 3);
        assert_eq!(byte_length("—"), 3);
        assert_eq!(byte_length("é"), 2);
        assert_eq!(byte_length("🐈"), 4);
    }

    #[test]
    fn limit_boundary() {
        assert!(within_limit(&"a".repeat(LIMIT)));
        assert!(!within_limit(&"a".repeat(LIMIT + 1)));
        // 167 three-byte characters are 501 bytes.
        assert!(!within_limit(&"—".repeat(167)));
    }

    #[test]
    fn overhead_covers_two_digit_enumeration() {
        assert_eq!(byte_length(" (99/99)"), ENUM_OVERHEAD);
    }
}
