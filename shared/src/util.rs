//! Small shared utilities

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Strip trailing slashes from a URL so matching stays consistent
/// between write and lookup.
pub fn remove_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(remove_trailing_slash("https://example.com/"), "https://example.com");
        assert_eq!(remove_trailing_slash("https://example.com"), "https://example.com");
        assert_eq!(remove_trailing_slash("https://example.com//"), "https://example.com");
        assert_eq!(remove_trailing_slash(""), "");
    }
}
