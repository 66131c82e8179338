//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log lines, marking the
/// cut with an ellipsis. Newlines are flattened so one message stays on one
/// log line.
pub fn log_preview(s: &str, max_chars: usize) -> String {
    let flat = s.replace('\n', "\\n");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut out: String = flat.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_is_unchanged() {
        assert_eq!(log_preview("hi", 10), "hi");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(log_preview("あのね", 2), "あの…");
    }

    #[test]
    fn preview_flattens_newlines() {
        assert_eq!(log_preview("a\nb", 10), "a\\nb");
    }
}
