//! Minimal HTML scanning: tags, attributes, and visible text.
//!
//! Not a tree builder. The analyzer needs tag counts, attribute lookups,
//! the title, and the page text; one flat pass over the markup provides
//! all four. Script and style bodies are excluded from the text.

/// One opening tag with its attributes.
///
/// Tag and attribute names are lowercased; values keep their original
/// form with character entities decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl Tag {
    /// Value of the first attribute with this (lowercase) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A scanned document: every opening tag plus the visible text.
#[derive(Debug, Default)]
pub struct Document {
    tags: Vec<Tag>,
    text: String,
    title: Option<String>,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let mut doc = Document::default();
        let mut text_parts: Vec<String> = Vec::new();
        let bytes = html.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'<' {
                let rest = &html[i..];
                if rest.starts_with("<!--") {
                    i = match html[i + 4..].find("-->") {
                        Some(end) => i + 4 + end + 3,
                        None => bytes.len(),
                    };
                } else if rest.starts_with("</") || rest.starts_with("<!") || rest.starts_with("<?")
                {
                    // Closing tags and declarations carry no content.
                    i = match rest.find('>') {
                        Some(end) => i + end + 1,
                        None => bytes.len(),
                    };
                } else if i + 1 < bytes.len() && bytes[i + 1].is_ascii_alphabetic() {
                    let (tag, self_closed, next) = parse_tag(html, i);
                    i = next;
                    if !self_closed && matches!(tag.name.as_str(), "script" | "style" | "title") {
                        // Raw-text elements: consume up to the matching closer.
                        let closer = format!("</{}", tag.name);
                        let body = &html[i..];
                        let end = find_ci(body, &closer).unwrap_or(body.len());
                        if tag.name == "title" {
                            let content = decode_entities(&body[..end]);
                            if doc.title.is_none() {
                                let collapsed = collapse_whitespace(&content);
                                if !collapsed.is_empty() {
                                    doc.title = Some(collapsed);
                                }
                            }
                            text_parts.push(content);
                        }
                        i += end;
                    }
                    doc.tags.push(tag);
                } else {
                    // A bare '<' is just text.
                    text_parts.push("<".to_owned());
                    i += 1;
                }
            } else {
                let end = html[i..].find('<').map_or(bytes.len(), |pos| i + pos);
                let segment = &html[i..end];
                if !segment.trim().is_empty() {
                    text_parts.push(decode_entities(segment));
                }
                i = end;
            }
        }

        doc.text = collapse_whitespace(&text_parts.join(" "));
        doc
    }

    /// Visible text, whitespace-collapsed, space-separated.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content of the first non-empty `<title>`.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// All opening tags with this (lowercase) name, in document order.
    pub fn tags(&self, name: &str) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.tags(name).count()
    }

    /// `<meta name="…" content="…">` lookup, case-insensitive on the name.
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.tags("meta")
            .find(|tag| tag.attr("name").is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .and_then(|tag| tag.attr("content"))
    }

    /// `<link rel="canonical" href="…">`, if present.
    pub fn canonical(&self) -> Option<&str> {
        self.tags("link")
            .find(|tag| {
                tag.attr("rel")
                    .is_some_and(|rel| rel.eq_ignore_ascii_case("canonical"))
            })
            .and_then(|tag| tag.attr("href"))
    }
}

/// Parse one opening tag starting at the `<` at `start`.
///
/// Returns the tag, whether it was self-closed, and the index just past
/// the closing `>`.
fn parse_tag(html: &str, start: usize) -> (Tag, bool, usize) {
    let bytes = html.as_bytes();
    let mut i = start + 1;

    let name_start = i;
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b':')
    {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closed = false;
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'>' {
                    self_closed = true;
                    i += 2;
                    break;
                }
                i += 1;
            }
            _ => {
                let key_start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'=' | b'>' | b'/')
                {
                    i += 1;
                }
                let key = html[key_start..i].to_ascii_lowercase();

                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                let value = if i < bytes.len() && bytes[i] == b'=' {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                        let quote = bytes[i];
                        i += 1;
                        let value_start = i;
                        while i < bytes.len() && bytes[i] != quote {
                            i += 1;
                        }
                        let raw = &html[value_start..i];
                        if i < bytes.len() {
                            i += 1;
                        }
                        decode_entities(raw)
                    } else {
                        let value_start = i;
                        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>'
                        {
                            i += 1;
                        }
                        decode_entities(&html[value_start..i])
                    }
                } else {
                    String::new()
                };

                if !key.is_empty() {
                    attrs.push((key, value));
                }
            }
        }
    }

    (Tag { name, attrs }, self_closed, i)
}

/// Byte index of the first case-insensitive occurrence of `needle`.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&at| h[at..at + n.len()].eq_ignore_ascii_case(n))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the common named entities plus numeric references; anything
/// unrecognized passes through unchanged.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let semi = rest[1..].find(';').filter(|&at| at <= 8);
        let decoded = semi.and_then(|at| {
            let entity = &rest[1..1 + at];
            match entity {
                "amp" => Some(('&', at)),
                "lt" => Some(('<', at)),
                "gt" => Some(('>', at)),
                "quot" => Some(('"', at)),
                "apos" => Some(('\'', at)),
                "nbsp" => Some((' ', at)),
                _ => entity
                    .strip_prefix('#')
                    .and_then(|num| {
                        if let Some(hex) = num.strip_prefix(['x', 'X']) {
                            // arch-lint: allow(no-silent-result-drop) reason="a malformed numeric entity is emitted verbatim, not an error"
                            u32::from_str_radix(hex, 16).ok()
                        } else {
                            // arch-lint: allow(no-silent-result-drop) reason="a malformed numeric entity is emitted verbatim, not an error"
                            num.parse().ok()
                        }
                    })
                    .and_then(char::from_u32)
                    .map(|c| (c, at)),
            }
        });
        match decoded {
            Some((c, at)) => {
                out.push(c);
                rest = &rest[1 + at + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_tags_case_insensitively() {
        let doc = Document::parse("<H1>a</H1><h1>b</h1><h2>c</h2><IMG src=x>");
        assert_eq!(doc.count("h1"), 2);
        assert_eq!(doc.count("h2"), 1);
        assert_eq!(doc.count("img"), 1);
        assert_eq!(doc.count("h3"), 0);
    }

    #[test]
    fn extracts_text_with_collapsed_whitespace() {
        let doc = Document::parse("<p>Hello   world</p>\n<p>again</p>");
        assert_eq!(doc.text(), "Hello world again");
    }

    #[test]
    fn script_and_style_bodies_are_not_text() {
        let doc = Document::parse(
            "<p>visible</p><script>var hidden = 1;</script><style>.x { color: red }</style>",
        );
        assert_eq!(doc.text(), "visible");
        assert_eq!(doc.count("script"), 1);
    }

    #[test]
    fn title_is_captured_and_counted_as_text() {
        let doc = Document::parse("<title> My  Page </title><p>body</p>");
        assert_eq!(doc.title(), Some("My Page"));
        assert_eq!(doc.text(), "My Page body");
    }

    #[test]
    fn attributes_parse_in_all_three_quote_styles() {
        let doc = Document::parse(r#"<meta name="description" content='An example' data-x=bare>"#);
        let meta = doc.tags("meta").next().unwrap();
        assert_eq!(meta.attr("name"), Some("description"));
        assert_eq!(meta.attr("content"), Some("An example"));
        assert_eq!(meta.attr("data-x"), Some("bare"));
        assert_eq!(meta.attr("missing"), None);
    }

    #[test]
    fn meta_content_lookup_ignores_case() {
        let doc = Document::parse(r#"<META NAME="Viewport" CONTENT="width=device-width">"#);
        assert_eq!(doc.meta_content("viewport"), Some("width=device-width"));
    }

    #[test]
    fn canonical_link_found_among_other_links() {
        let doc = Document::parse(concat!(
            r#"<link rel="stylesheet" href="/style.css">"#,
            r#"<link rel="canonical" href="https://example.com/page">"#,
        ));
        assert_eq!(doc.canonical(), Some("https://example.com/page"));
    }

    #[test]
    fn comments_and_doctype_are_skipped() {
        let doc = Document::parse("<!DOCTYPE html><!-- <p>not real</p> --><p>real</p>");
        assert_eq!(doc.count("p"), 1);
        assert_eq!(doc.text(), "real");
    }

    #[test]
    fn entities_decode_in_text_and_attributes() {
        let doc = Document::parse(r#"<p>fish &amp; chips &#233;</p><a href="/a?b=1&amp;c=2">x</a>"#);
        assert_eq!(doc.text(), "fish & chips é x");
        let link = doc.tags("a").next().unwrap();
        assert_eq!(link.attr("href"), Some("/a?b=1&c=2"));
    }

    #[test]
    fn unknown_entities_pass_through() {
        let doc = Document::parse("<p>&bogus; &amp</p>");
        assert_eq!(doc.text(), "&bogus; &amp");
    }

    #[test]
    fn self_closed_script_enters_no_raw_mode() {
        let doc = Document::parse(r#"<script src="app.js"/><p>after</p>"#);
        assert_eq!(doc.count("script"), 1);
        assert_eq!(doc.text(), "after");
    }

    #[test]
    fn unterminated_markup_does_not_panic() {
        let doc = Document::parse("<p>text<script>never closed");
        assert_eq!(doc.text(), "text");
        let doc = Document::parse("<a href=\"unclosed");
        assert_eq!(doc.count("a"), 1);
    }

    #[test]
    fn bare_less_than_stays_in_text() {
        let doc = Document::parse("<p>1 < 2</p>");
        assert_eq!(doc.text(), "1 < 2");
    }
}
