use crate::{
    date::{parse_date, parse_datetime},
    text_decode::{decode_field, split_lines, strip_utf8_bom},
};
use chrono::{NaiveDate, NaiveDateTime};
use encoding_rs::Encoding;
pub const MIN_LINE_LEN: usize = 71;
pub const FIELD_COUNT: usize = 10;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TrimmedText,
    DateTime,
    Date,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub end: Option<usize>,
    pub kind: FieldKind,
}
impl FieldSpec {
    const fn new(name: &'static str, start: usize, end: Option<usize>, kind: FieldKind) -> Self {
        Self {
            name,
            start,
            end,
            kind,
        }
    }
}
pub const LAYOUT: [FieldSpec; FIELD_COUNT] = [
    FieldSpec::new("ENTIDAD", 0, Some(4), FieldKind::Text),
    FieldSpec::new("CENTALTA", 4, Some(8), FieldKind::Text),
    FieldSpec::new("CUENTA", 8, Some(20), FieldKind::Text),
    FieldSpec::new("PRODUCTO", 20, Some(22), FieldKind::Text),
    FieldSpec::new("SUBPRODUCTO", 22, Some(26), FieldKind::Text),
    FieldSpec::new("PAN", 26, Some(45), FieldKind::Text),
    FieldSpec::new("FECHA ALTA", 45, Some(59), FieldKind::DateTime),
    FieldSpec::new("BLOQUEO", 59, Some(61), FieldKind::Text),
    FieldSpec::new("FECHA BAJA", 61, Some(71), FieldKind::Date),
    FieldSpec::new("HORA", 71, None, FieldKind::TrimmedText),
];
pub fn header_names() -> [&'static str; FIELD_COUNT] {
    LAYOUT.map(|spec| spec.name)
}
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub entidad: String,
    pub centalta: String,
    pub cuenta: String,
    pub producto: String,
    pub subproducto: String,
    pub pan: String,
    pub fecha_alta: Option<NaiveDateTime>,
    pub bloqueo: String,
    pub fecha_baja: Option<NaiveDate>,
    pub hora: String,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    DateTime(Option<NaiveDateTime>),
    Date(Option<NaiveDate>),
}
impl Record {
    pub fn from_text(line: &str) -> Self {
        Self::parse_text(line).0
    }
    /// Slices raw bytes and decodes each field on its own, so offsets stay
    /// aligned with the fixed-width byte layout whatever the code page.
    pub fn from_bytes(line: &[u8], encoding: &'static Encoding) -> Self {
        Self::parse_bytes(line, encoding).0
    }
    fn parse_text(line: &str) -> (Self, usize) {
        Self::from_parts(|spec| char_range(line, spec.start, spec.end).to_string())
    }
    fn parse_bytes(line: &[u8], encoding: &'static Encoding) -> (Self, usize) {
        Self::from_parts(|spec| decode_field(byte_range(line, spec.start, spec.end), encoding))
    }
    fn from_parts(mut field: impl FnMut(&FieldSpec) -> String) -> (Self, usize) {
        let [
            entidad,
            centalta,
            cuenta,
            producto,
            subproducto,
            pan,
            fecha_alta,
            bloqueo,
            fecha_baja,
            hora,
        ] = LAYOUT.map(|spec| field(&spec));
        let fecha_alta_value = parse_datetime(&fecha_alta);
        let fecha_baja_value = parse_date(&fecha_baja);
        let invalid_dates = usize::from(is_invalid(&fecha_alta, fecha_alta_value.is_some()))
            + usize::from(is_invalid(&fecha_baja, fecha_baja_value.is_some()));
        let record = Self {
            entidad,
            centalta,
            cuenta,
            producto,
            subproducto,
            pan,
            fecha_alta: fecha_alta_value,
            bloqueo,
            fecha_baja: fecha_baja_value,
            hora: hora.trim().to_string(),
        };
        (record, invalid_dates)
    }
    pub fn values(&self) -> [FieldValue<'_>; FIELD_COUNT] {
        [
            FieldValue::Text(self.entidad.as_str()),
            FieldValue::Text(self.centalta.as_str()),
            FieldValue::Text(self.cuenta.as_str()),
            FieldValue::Text(self.producto.as_str()),
            FieldValue::Text(self.subproducto.as_str()),
            FieldValue::Text(self.pan.as_str()),
            FieldValue::DateTime(self.fecha_alta),
            FieldValue::Text(self.bloqueo.as_str()),
            FieldValue::Date(self.fecha_baja),
            FieldValue::Text(self.hora.as_str()),
        ]
    }
}
fn is_invalid(text: &str, parsed: bool) -> bool {
    !parsed && !text.trim().is_empty()
}
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    pub records: Vec<Record>,
    pub short_lines: usize,
    pub invalid_dates: usize,
}
impl RecordSet {
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = Self::default();
        for line in lines {
            let line_len = line.chars().count();
            set.push(Record::parse_text(line), line_len);
        }
        set
    }
    pub fn parse_bytes(content: &[u8], encoding: &'static Encoding) -> Self {
        let mut set = Self::default();
        for line in split_lines(strip_utf8_bom(content)) {
            set.push(Record::parse_bytes(line, encoding), line.len());
        }
        set
    }
    fn push(&mut self, (record, invalid_dates): (Record, usize), line_len: usize) {
        if line_len < MIN_LINE_LEN {
            self.short_lines += 1;
        }
        self.invalid_dates += invalid_dates;
        self.records.push(record);
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}
impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
fn byte_range(line: &[u8], start: usize, end: Option<usize>) -> &[u8] {
    let end = end.map_or(line.len(), |e| e.min(line.len()));
    line.get(start..end).unwrap_or_default()
}
fn char_range(line: &str, start: usize, end: Option<usize>) -> &str {
    let offset = |n: usize| line.char_indices().nth(n).map_or(line.len(), |(i, _)| i);
    let from = offset(start);
    let to = end.map_or(line.len(), offset);
    line.get(from..to).unwrap_or_default()
}
