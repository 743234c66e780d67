use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Everything but the RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes a value substituted into a path template.
pub fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Encodes each value and joins them with commas, the convention for
/// multi-valued path parameters.
pub fn encode_list(segments: &[String]) -> String {
    segments
        .iter()
        .map(|segment| encode(segment))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_unreserved_characters() {
        assert_eq!(encode("logs-2021.01_a~"), "logs-2021.01_a~");
    }

    #[test]
    fn should_escape_reserved_characters() {
        assert_eq!(encode("a/b c"), "a%2Fb%20c");
        assert_eq!(encode("my?id#1"), "my%3Fid%231");
        assert_eq!(encode("été"), "%C3%A9t%C3%A9");
    }

    #[test]
    fn should_join_lists() {
        let indices = vec!["a".to_string(), "b/c".to_string()];
        assert_eq!(encode_list(&indices), "a,b%2Fc");
    }
}
