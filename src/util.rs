// src/util.rs — Shared utility functions

/// Truncate a string for display/logging (UTF-8 safe).
///
/// Returns a substring of at most `max_len` bytes, ensuring the cut
/// point falls on a valid UTF-8 character boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

/// Keep the last `max_len` bytes of a string (UTF-8 safe).
///
/// Interpreter tracebacks put the actual error at the end, so when
/// stderr is clamped the tail is the part worth keeping.
pub fn tail_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut start = s.len() - max_len;
        while start < s.len() && !s.is_char_boundary(start) {
            start += 1;
        }
        &s[start..]
    }
}
