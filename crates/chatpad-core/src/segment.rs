//! Greedy word wrap of one logical line into message-sized segments.

use tracing::trace;

use crate::prefix::{finish_with, ResolvedLine};
use crate::size::{byte_length, ENUM_OVERHEAD, LIMIT};

/// Appended to the prefix of every segment after the first.
pub const CONTINUATION_MARKER: &str = "|";

/// Bytes the continuation marker adds: a space and the marker.
const CONTINUATION_OVERHEAD: usize = 2;

/// Split `line` into finished message strings.
///
/// `singular` is true when this line is the only non-blank line of the
/// batch; such a line can never be enumerated and may use the bytes that
/// are otherwise reserved for the ` (k/n)` suffix.
///
/// A word longer than the whole budget is emitted on its own and left over
/// the limit; callers flag it.
pub fn segment_line(line: &ResolvedLine, singular: bool) -> Vec<String> {
    let body_len = byte_length(&line.body);
    let mut offset = line.total_offset;

    if singular && body_len + offset <= LIMIT {
        return vec![line.finish(&line.body)];
    }
    if body_len + offset + ENUM_OVERHEAD <= LIMIT {
        return vec![line.finish(&line.body)];
    }

    let mut prefix = line.prefix.clone();
    let mut continued = false;
    let mut segments = Vec::new();
    let mut open = String::new();

    for word in line.body.split(' ') {
        if !open.is_empty() {
            let candidate = byte_length(&open) + 1 + byte_length(word);
            if candidate + 1 + ENUM_OVERHEAD + offset > LIMIT {
                trace!(bytes = byte_length(&open), next = word, "closing segment");
                segments.push(finish_with(&prefix, &open, line.ooc));
                open.clear();
                if !continued {
                    continued = true;
                    offset += CONTINUATION_OVERHEAD;
                    prefix.push(' ');
                    prefix.push_str(CONTINUATION_MARKER);
                }
            }
        }
        if !open.is_empty() {
            open.push(' ');
        }
        open.push_str(word);
    }
    segments.push(finish_with(&prefix, &open, line.ooc));

    segments
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::resolve;
    use chatpad_config::FormatterSettings;

    fn settings() -> FormatterSettings {
        FormatterSettings::default()
    }

    fn words(word: &str, count: usize) -> String {
        vec![word; count].join(" ")
    }

    #[test]
    fn singular_line_may_use_reserved_bytes() {
        // 494 + "/say " = 499 bytes: fits alone, not with a suffix reserved.
        let body = "a".repeat(494);
        let line = resolve(&body, "/say", &settings());
        assert_eq!(segment_line(&line, true).len(), 1);

        let split = segment_line(&resolve(&words("abcd", 99), "/say", &settings()), false);
        assert!(split.len() > 1);
    }

    #[test]
    fn short_line_in_batch_is_one_segment() {
        let line = resolve("just a few words", "/p", &settings());
        assert_eq!(segment_line(&line, false), vec!["/p just a few words".to_string()]);
    }

    #[test]
    fn six_hundred_bytes_of_words_make_two_segments() {
        let body = words("XXXXX", 100);
        assert_eq!(body.len(), 599);
        let segments = segment_line(&resolve(&format!("/say {body}"), "/p", &settings()), true);

        assert_eq!(segments.len(), 2);
        assert!(segments[0].starts_with("/say X"));
        assert!(segments[1].starts_with("/say | X"));
        for s in &segments {
            assert!(byte_length(s) + ENUM_OVERHEAD <= LIMIT, "{}", byte_length(s));
        }
    }

    #[test]
    fn continuation_marker_added_once() {
        let segments = segment_line(&resolve(&words("word", 400), "/fc", &settings()), false);
        assert!(segments.len() >= 4);
        assert!(!segments[0].contains('|'));
        for s in &segments[1..] {
            assert!(s.starts_with("/fc | word"), "{s}");
            assert_eq!(s.matches('|').count(), 1);
        }
    }

    #[test]
    fn no_words_are_lost_or_reordered() {
        let body: Vec<String> = (0..300).map(|i| format!("w{i}")).collect();
        let segments = segment_line(&resolve(&body.join(" "), "/say", &settings()), false);
        let rejoined: Vec<&str> = segments
            .iter()
            .flat_map(|s| s.split(' ').filter(|w| *w != "/say" && *w != "|"))
            .collect();
        assert_eq!(rejoined, body);
    }

    #[test]
    fn multibyte_text_respects_byte_budget() {
        let segments = segment_line(&resolve(&words("ねこ", 300), "/say", &settings()), false);
        assert!(segments.len() > 1);
        for s in &segments {
            assert!(byte_length(s) + ENUM_OVERHEAD <= LIMIT);
        }
    }

    #[test]
    fn oversized_word_is_kept_whole() {
        let giant = "X".repeat(600);
        let segments = segment_line(&resolve(&format!("/say {giant}"), "/say", &settings()), true);
        assert_eq!(segments, vec![format!("/say {giant}")]);

        let mixed = segment_line(&resolve(&format!("hello {giant} bye"), "/say", &settings()), false);
        assert_eq!(mixed.len(), 3);
        assert_eq!(mixed[0], "/say hello");
        assert_eq!(mixed[1], format!("/say | {giant}"));
        assert_eq!(mixed[2], "/say | bye");
    }

    #[test]
    fn ooc_segments_are_wrapped_and_in_budget() {
        let ooc = FormatterSettings { out_of_character: true, ..FormatterSettings::default() };
        let segments = segment_line(&resolve(&words("lorem", 150), "/say", &ooc), false);
        assert!(segments.len() > 1);
        assert!(segments[0].starts_with("/say ((") && segments[0].ends_with("))"));
        assert!(segments[1].starts_with("/say | (("));
        for s in &segments {
            assert!(byte_length(s) + ENUM_OVERHEAD <= LIMIT);
        }
    }
}
