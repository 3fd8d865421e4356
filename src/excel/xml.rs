pub(super) fn xml_escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars().filter(|ch| is_xml_char(*ch)) {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
pub(super) fn xml_escape_attr(s: &str) -> String {
    xml_escape_text(s)
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
pub(super) fn needs_xml_space_preserve(s: &str) -> bool {
    s.starts_with(' ') || s.ends_with(' ') || s.contains("  ")
}
/// XML 1.0 `Char` production; control bytes from the extract are dropped.
const fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
pub(super) fn extract_attr(tag: &str, attr_name: &str) -> Option<String> {
    let pattern = format!("{attr_name}=");
    let bytes = tag.as_bytes();
    let mut cursor = 0usize;
    while let Some(rel) = tag.get(cursor..)?.find(&pattern) {
        let idx = cursor + rel;
        if idx > 0 {
            let prev = *bytes.get(idx - 1)?;
            if !prev.is_ascii_whitespace() && prev != b'<' {
                cursor = idx + pattern.len();
                continue;
            }
        }
        let quote_idx = idx + pattern.len();
        let quote = *bytes.get(quote_idx)?;
        if quote != b'"' && quote != b'\'' {
            cursor = quote_idx;
            continue;
        }
        let value_start = quote_idx + 1;
        let value_end = value_start + tag.get(value_start..)?.find(char::from(quote))?;
        return Some(decode_xml_entities(tag.get(value_start..value_end)?));
    }
    None
}
pub(super) fn find_start_tag(xml: &str, tag_name: &str, from: usize) -> Option<usize> {
    let mut cursor = from.min(xml.len());
    let wanted = local_tag_name(tag_name);
    while let Some(rel) = xml.get(cursor..)?.find('<') {
        let start = cursor + rel;
        let rest = xml.get(start + 1..)?;
        if rest.starts_with('/') || rest.starts_with('!') || rest.starts_with('?') {
            cursor = start + 1;
            continue;
        }
        let name_end_rel = rest
            .find(|ch: char| ch.is_ascii_whitespace() || ch == '/' || ch == '>')
            .unwrap_or(rest.len());
        let raw_name = rest.get(..name_end_rel)?;
        if !raw_name.is_empty() && local_tag_name(raw_name) == wanted {
            return Some(start);
        }
        cursor = start + 1;
    }
    None
}
pub(super) fn find_tag_end(xml: &str, tag_start: usize) -> Option<usize> {
    xml.get(tag_start..)
        .and_then(|v| v.find('>'))
        .map(|rel| tag_start + rel)
}
pub(super) fn first_start_tag<'a>(xml: &'a str, tag_name: &str) -> Option<&'a str> {
    let start = find_start_tag(xml, tag_name, 0)?;
    let end = find_tag_end(xml, start)?;
    xml.get(start..=end)
}
pub(super) fn decode_xml_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
fn local_tag_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}
