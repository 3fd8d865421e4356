use super::{
    ooxml::{
        self, CONTENT_TYPES_PATH, ROOT_RELS_PATH, STYLES_PATH, TableDefinition, WORKBOOK_PATH,
        WORKBOOK_RELS_PATH,
    },
    styles::StyleSheet,
    xlsx_container::XlsxPackage,
    xml::{needs_xml_space_preserve, xml_escape_attr, xml_escape_text},
};
use crate::error::Result;
use std::{collections::BTreeMap, fmt::Write as _, path::Path};
#[derive(Debug, Default)]
pub struct Workbook {
    styles: StyleSheet,
    sheets: Vec<(String, Worksheet)>,
    next_table_id: u32,
}
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    pub rows: BTreeMap<u32, Row>,
    tables: Vec<TableDefinition>,
}
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub attrs: Vec<(String, String)>,
    pub cells: BTreeMap<u32, Cell>,
}
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub attrs: Vec<(String, String)>,
    pub inner_xml: Option<String>,
}
impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }
    pub const fn styles_mut(&mut self) -> &mut StyleSheet {
        &mut self.styles
    }
    pub fn add_sheet(&mut self, name: &str, sheet: Worksheet) -> usize {
        self.sheets.push((name.to_string(), sheet));
        self.sheets.len() - 1
    }
    pub fn sheet(&self, index: usize) -> Option<&Worksheet> {
        self.sheets.get(index).map(|(_, sheet)| sheet)
    }
    pub fn add_table(&mut self, sheet_index: usize, mut table: TableDefinition) -> Option<u32> {
        let (_, sheet) = self.sheets.get_mut(sheet_index)?;
        self.next_table_id += 1;
        table.id = self.next_table_id;
        sheet.tables.push(table);
        Some(self.next_table_id)
    }
    pub fn to_package(&self) -> XlsxPackage {
        let mut package = XlsxPackage::new();
        let table_ids: Vec<u32> = self
            .sheets
            .iter()
            .flat_map(|(_, sheet)| sheet.tables.iter().map(|t| t.id))
            .collect();
        let names: Vec<&str> = self.sheets.iter().map(|(name, _)| name.as_str()).collect();
        package.add_part(
            CONTENT_TYPES_PATH,
            ooxml::content_types_xml(self.sheets.len(), &table_ids),
        );
        package.add_part(ROOT_RELS_PATH, ooxml::root_rels_xml());
        package.add_part(WORKBOOK_PATH, ooxml::workbook_xml(&names));
        package.add_part(
            WORKBOOK_RELS_PATH,
            ooxml::workbook_rels_xml(self.sheets.len()),
        );
        package.add_part(STYLES_PATH, self.styles.to_xml());
        for (i, (_, sheet)) in self.sheets.iter().enumerate() {
            let sheet_no = i + 1;
            package.add_part(&ooxml::sheet_path(sheet_no), sheet.to_xml());
            if sheet.tables.is_empty() {
                continue;
            }
            let ids: Vec<u32> = sheet.tables.iter().map(|t| t.id).collect();
            package.add_part(&ooxml::sheet_rels_path(sheet_no), ooxml::sheet_rels_xml(&ids));
            for table in &sheet.tables {
                package.add_part(&ooxml::table_path(table.id), table.to_xml());
            }
        }
        package
    }
    pub fn save_as(&self, out_path: &Path, verify_saved_file: bool) -> Result<()> {
        self.to_package().save_as(out_path, verify_saved_file)
    }
}
impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(256 + self.rows.len() * 512);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        let _ = write!(out, r#"<dimension ref="{}"/>"#, self.dimension_ref());
        out.push_str(r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews>"#);
        out.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);
        out.push_str("<sheetData>");
        for row in self.rows.values() {
            out.push_str(&row_to_xml(row));
        }
        out.push_str("</sheetData>");
        if !self.tables.is_empty() {
            let _ = write!(out, r#"<tableParts count="{}">"#, self.tables.len());
            for i in 1..=self.tables.len() {
                let _ = write!(out, r#"<tablePart r:id="rId{i}"/>"#);
            }
            out.push_str("</tableParts>");
        }
        out.push_str("</worksheet>");
        out
    }
    pub fn set_string_at(&mut self, col: u32, row: u32, value: &str) {
        let cell = self.get_or_create_cell_mut(col, row);
        set_attr(&mut cell.attrs, "t", "inlineStr".to_string());
        let text = xml_escape_text(value);
        let inner = if needs_xml_space_preserve(value) {
            format!("<is><t xml:space=\"preserve\">{text}</t></is>")
        } else {
            format!("<is><t>{text}</t></is>")
        };
        cell.inner_xml = Some(inner);
    }
    pub fn set_number_at(&mut self, col: u32, row: u32, value: f64) {
        let cell = self.get_or_create_cell_mut(col, row);
        remove_attr(&mut cell.attrs, "t");
        cell.inner_xml = Some(format!("<v>{value}</v>"));
    }
    pub fn set_blank_at(&mut self, col: u32, row: u32) {
        let cell = self.get_or_create_cell_mut(col, row);
        remove_attr(&mut cell.attrs, "t");
        cell.inner_xml = None;
    }
    pub fn set_style_at(&mut self, col: u32, row: u32, style: u32) {
        let cell = self.get_or_create_cell_mut(col, row);
        if style == 0 {
            remove_attr(&mut cell.attrs, "s");
        } else {
            set_attr(&mut cell.attrs, "s", style.to_string());
        }
    }
    pub fn ensure_row(&mut self, row: u32) {
        self.rows.entry(row).or_insert_with(|| new_row(row));
    }
    pub fn cell(&self, col: u32, row: u32) -> Option<&Cell> {
        self.rows.get(&row)?.cells.get(&col)
    }
    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }
    pub fn max_cell_col(&self) -> u32 {
        self.rows
            .values()
            .flat_map(|row| row.cells.keys().copied())
            .max()
            .unwrap_or(1)
    }
    pub fn max_row_num(&self) -> u32 {
        self.rows.keys().copied().max().unwrap_or(1)
    }
    pub fn dimension_ref(&self) -> String {
        let max_row = self.max_row_num();
        let max_col = self.max_cell_col();
        if max_row == 1 && max_col == 1 {
            return "A1".to_string();
        }
        format!("A1:{}{}", col_to_name(max_col), max_row)
    }
    pub fn get_or_create_cell_mut(&mut self, col: u32, row: u32) -> &mut Cell {
        let row_obj = self.rows.entry(row).or_insert_with(|| new_row(row));
        row_obj.cells.entry(col).or_insert_with(|| Cell {
            attrs: vec![("r".to_string(), cell_ref(col, row))],
            inner_xml: None,
        })
    }
}
impl Cell {
    pub fn attr(&self, name: &str) -> Option<&str> {
        get_attr(&self.attrs, name)
    }
}
fn new_row(row: u32) -> Row {
    Row {
        attrs: vec![("r".to_string(), row.to_string())],
        cells: BTreeMap::new(),
    }
}
pub fn cell_ref(col: u32, row: u32) -> String {
    format!("{}{}", col_to_name(col), row)
}
pub fn range_ref(first_col: u32, first_row: u32, last_col: u32, last_row: u32) -> String {
    format!(
        "{}:{}",
        cell_ref(first_col, first_row),
        cell_ref(last_col, last_row)
    )
}
pub fn col_to_name(mut col: u32) -> String {
    if col == 0 {
        return "A".to_string();
    }
    let mut out = String::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.insert(0, char::from_digit(rem + 10, 36).map_or('A', |c| c.to_ascii_uppercase()));
        col = (col - 1) / 26;
    }
    out
}
fn row_to_xml(row: &Row) -> String {
    let mut attrs = row.attrs.clone();
    attrs.sort_by(|a, b| attr_sort_key(&a.0).cmp(&attr_sort_key(&b.0)));
    let mut out = String::new();
    out.push_str("<row");
    out.push_str(&attrs_to_xml(&attrs));
    if row.cells.is_empty() {
        out.push_str("/>");
        return out;
    }
    out.push('>');
    for cell in row.cells.values() {
        out.push_str(&cell_to_xml(cell));
    }
    out.push_str("</row>");
    out
}
fn cell_to_xml(cell: &Cell) -> String {
    let mut attrs = cell.attrs.clone();
    attrs.sort_by(|a, b| attr_sort_key(&a.0).cmp(&attr_sort_key(&b.0)));
    let mut out = String::new();
    out.push_str("<c");
    out.push_str(&attrs_to_xml(&attrs));
    if let Some(inner) = &cell.inner_xml {
        out.push('>');
        out.push_str(inner);
        out.push_str("</c>");
    } else {
        out.push_str("/>");
    }
    out
}
fn attr_sort_key(name: &str) -> (u8, &str) {
    match name {
        "r" => (0, name),
        "s" => (1, name),
        "t" => (2, name),
        _ => (3, name),
    }
}
fn attrs_to_xml(attrs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&xml_escape_attr(value));
        out.push('"');
    }
    out
}
fn get_attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find_map(|(k, v)| if k == name { Some(v.as_str()) } else { None })
}
fn set_attr(attrs: &mut Vec<(String, String)>, name: &str, value: String) {
    for (k, v) in attrs.iter_mut() {
        if k == name {
            *v = value;
            return;
        }
    }
    attrs.push((name.to_string(), value));
}
fn remove_attr(attrs: &mut Vec<(String, String)>, name: &str) {
    attrs.retain(|(k, _)| k != name);
}
