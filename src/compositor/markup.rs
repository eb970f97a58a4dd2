//! Fragment clean-up before nesting into the composite document

use lazy_regex::regex;

/// Strip document-level wrapping from a fragment: XML declaration, DOCTYPE,
/// comments, `<metadata>` and the outermost `<svg>` element. Markup that is
/// already a bare layer passes through trimmed.
pub fn strip_wrapper(markup: &str) -> String {
    let cleaned = regex!(r"(?s)<\?xml.*?\?>").replace_all(markup, "");
    let cleaned = regex!(r"(?i)<!DOCTYPE[^>]*>").replace_all(&cleaned, "");
    let cleaned = regex!(r"(?s)<!--.*?-->").replace_all(&cleaned, "");
    let cleaned = regex!(r"(?s)<metadata\b[^>]*/>|<metadata\b.*?</metadata>").replace_all(&cleaned, "");
    let trimmed = cleaned.trim();

    if regex!(r"(?s)^<svg\b[^>]*/>$").is_match(trimmed) {
        return String::new();
    }

    match regex!(r"(?s)^<svg\b[^>]*>(.*)</svg>$").captures(trimmed) {
        Some(caps) => caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        None => trimmed.to_string(),
    }
}

/// Escape text for use inside an XML attribute or text node
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_full_document() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<!-- exported by an editor -->
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1024 1024">
  <metadata><rdf:RDF/></metadata>
  <circle cx="512" cy="512" r="100"/>
</svg>
"#;
        assert_eq!(strip_wrapper(doc), r#"<circle cx="512" cy="512" r="100"/>"#);
    }

    #[test]
    fn test_strip_bare_fragment_untouched() {
        let fragment = "  <rect width=\"10\" height=\"10\"/>\n";
        assert_eq!(strip_wrapper(fragment), "<rect width=\"10\" height=\"10\"/>");
    }

    #[test]
    fn test_strip_keeps_nested_svg() {
        let doc = "<svg><svg x=\"10\"><rect/></svg></svg>";
        assert_eq!(strip_wrapper(doc), "<svg x=\"10\"><rect/></svg>");
    }

    #[test]
    fn test_strip_self_closing_svg() {
        assert_eq!(strip_wrapper("<svg xmlns=\"http://www.w3.org/2000/svg\"/>"), "");
    }

    #[test]
    fn test_strip_no_duplicate_headers() {
        let doc = "<?xml version=\"1.0\"?><svg><g id=\"a\"/></svg>";
        let stripped = strip_wrapper(doc);
        assert!(!stripped.contains("<?xml"));
        assert!(!stripped.contains("<svg"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape("#12345"), "#12345");
    }
}
