use crate::error::{Error, Result};
use encoding_rs::{Encoding, WINDOWS_1252};
pub const DEFAULT_ENCODING_LABEL: &str = "windows-1252";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let label = label.trim();
    if label.is_empty() {
        return Ok(WINDOWS_1252);
    }
    Encoding::for_label(label.as_bytes()).ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}
pub fn decode_field(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::trace!(encoding = encoding.name(), "field contained undecodable bytes");
    }
    text.into_owned()
}
pub fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}
// `\n`, `\r\n` and a lone `\r` each end a line; a trailing terminator opens no new line.
pub fn split_lines(bytes: &[u8]) -> Lines<'_> {
    Lines { rest: bytes }
}
pub struct Lines<'a> {
    rest: &'a [u8],
}
impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];
    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(end) = self.rest.iter().position(|b| matches!(b, b'\n' | b'\r')) else {
            let line = self.rest;
            self.rest = &[];
            return Some(line);
        };
        let (line, tail) = self.rest.split_at(end);
        let skip = if tail.starts_with(b"\r\n") { 2 } else { 1 };
        self.rest = tail.get(skip..).unwrap_or_default();
        Some(line)
    }
}
