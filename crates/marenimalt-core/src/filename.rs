//! Portable output filenames.

/// Default upper bound on sanitized filename length, in characters.
pub const DEFAULT_MAX_FILENAME_LEN: usize = 200;

const FALLBACK_NAME: &str = "default_filename";

const INVALID_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '.')
}

fn trim_end(s: &str) -> &str {
    s.trim_end_matches(|c: char| c.is_whitespace() || c == '.')
}

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Turn an arbitrary string into a filename that is legal on common filesystems.
///
/// The result never exceeds `max_length` characters and is never empty for
/// `max_length > 0`. Applying the function twice gives the same result.
pub fn sanitize_filename(input: &str, max_length: usize) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let mut sanitized = trim_edges(&replaced).to_string();

    if is_reserved(&sanitized) {
        sanitized.push_str("_file");
    }

    if sanitized.chars().count() > max_length {
        let truncated: String = sanitized.chars().take(max_length).collect();
        sanitized = trim_end(&truncated).to_string();
    }

    if sanitized.is_empty() {
        return FALLBACK_NAME.chars().take(max_length).collect();
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(s: &str) -> String {
        sanitize_filename(s, DEFAULT_MAX_FILENAME_LEN)
    }

    #[test]
    fn test_replaces_invalid_chars() {
        assert_eq!(sanitize(r#"a\b/c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_trims_whitespace_and_dots() {
        assert_eq!(sanitize("  ..video.mp4.. "), "video.mp4");
        assert_eq!(sanitize(" . a"), "a");
    }

    #[test]
    fn test_reserved_names() {
        assert_eq!(sanitize("CON"), "CON_file");
        assert_eq!(sanitize("lpt3"), "lpt3_file");
        assert_eq!(sanitize("CONSOLE"), "CONSOLE");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(sanitize(""), "default_filename");
        assert_eq!(sanitize(" ... "), "default_filename");
    }

    #[test]
    fn test_truncation_retrims() {
        assert_eq!(sanitize_filename("abcd. efgh", 6), "abcd");
        assert_eq!(sanitize_filename("abcdef", 3), "abc");
    }

    #[test]
    fn test_length_bound_holds() {
        let inputs = ["", "CON", " ... ", "a very long name with spaces", "é/é/é/é", "x."];
        for input in inputs {
            for n in 1..30 {
                let out = sanitize_filename(input, n);
                assert!(out.chars().count() <= n, "{input:?} n={n} -> {out:?}");
                assert!(!out.is_empty());
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "CON",
            "nul",
            " . a",
            "  ..hidden..  ",
            r#"dialogue: "hello" <world>?"#,
            "trailing dots...",
            "Letting the mares go by.",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "{input:?}");
        }
    }
}
