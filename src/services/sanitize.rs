use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Normalize raw chat input before anything else looks at it: drop markup
/// tags and control bytes, then entity-escape what is left.
pub fn sanitize_input(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, "");

    let mut out = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_ascii_control() => {}
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Undo the apostrophe escape so contraction patterns ("it's") still match.
pub fn unescape_apostrophes(text: &str) -> String {
    text.replace("&#x27;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(sanitize_input("<script>alert(1)</script>hello"), "alert(1)hello");
        assert_eq!(sanitize_input("<b>Coco</b>"), "Coco");
    }

    #[test]
    fn test_removes_control_bytes() {
        assert_eq!(sanitize_input("do\u{0}g\u{7f}"), "dog");
        assert_eq!(sanitize_input("  line\none  "), "line\none");
    }

    #[test]
    fn test_escapes_specials() {
        assert_eq!(sanitize_input("Spay & Neuter"), "Spay &amp; Neuter");
        assert_eq!(sanitize_input("it's \"Max\""), "it&#x27;s &quot;Max&quot;");
        assert_eq!(sanitize_input("a > b"), "a &gt; b");
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        assert_eq!(sanitize_input("   <br/>  "), "");
    }

    #[test]
    fn test_unescape_apostrophes() {
        assert_eq!(unescape_apostrophes(&sanitize_input("it's Max")), "it's Max");
    }
}
