/// Truncate a string to at most `max_chars` characters, never splitting a
/// multi-byte character. Used for keeping user text out of full log lines.
#[inline]
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Like [`safe_truncate`] but appends `...` when anything was cut.
#[inline]
pub fn safe_truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate_ascii() {
        assert_eq!(safe_truncate("persistent dry cough", 10), "persistent");
    }

    #[test]
    fn test_safe_truncate_multibyte() {
        assert_eq!(safe_truncate("fiebre alta é tos", 12), "fiebre alta ");
    }

    #[test]
    fn test_safe_truncate_shorter() {
        assert_eq!(safe_truncate("flu", 10), "flu");
    }

    #[test]
    fn test_safe_truncate_ellipsis() {
        assert_eq!(safe_truncate_ellipsis("runny nose and sneezing", 10), "runny nose...");
        assert_eq!(safe_truncate_ellipsis("cough", 10), "cough");
    }
}
