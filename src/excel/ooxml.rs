use super::xml::xml_escape_attr;
use std::fmt::Write as _;
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
pub const ROOT_RELS_PATH: &str = "_rels/.rels";
pub const WORKBOOK_PATH: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";
pub const STYLES_PATH: &str = "xl/styles.xml";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_TABLE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/table";
const REL_OFFICE_DOC: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub fn sheet_path(sheet_no: usize) -> String {
    format!("xl/worksheets/sheet{sheet_no}.xml")
}
pub fn sheet_rels_path(sheet_no: usize) -> String {
    format!("xl/worksheets/_rels/sheet{sheet_no}.xml.rels")
}
pub fn table_path(table_id: u32) -> String {
    format!("xl/tables/table{table_id}.xml")
}
pub fn content_types_xml(sheet_count: usize, table_ids: &[u32]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    for sheet_no in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            sheet_path(sheet_no)
        );
    }
    for table_id in table_ids {
        let _ = write!(
            xml,
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.table+xml"/>"#,
            table_path(*table_id)
        );
    }
    xml.push_str("</Types>");
    xml
}
pub fn root_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_PKG_REL}"><Relationship Id="rId1" Type="{REL_OFFICE_DOC}" Target="xl/workbook.xml"/></Relationships>"#
    )
}
pub fn workbook_xml(sheet_names: &[&str]) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<workbook xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><bookViews><workbookView/></bookViews><sheets>"#
    );
    for (i, name) in sheet_names.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            xml_escape_attr(name),
            i + 1,
            i + 1
        );
    }
    xml.push_str("</sheets></workbook>");
    xml
}
/// Sheets take `rId1..=rIdN`; styles follow them.
pub fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut xml = format!(r#"{XML_DECL}<Relationships xmlns="{NS_PKG_REL}">"#);
    for sheet_no in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{sheet_no}" Type="{REL_WORKSHEET}" Target="worksheets/sheet{sheet_no}.xml"/>"#
        );
    }
    let _ = write!(
        xml,
        r#"<Relationship Id="rId{}" Type="{REL_STYLES}" Target="styles.xml"/>"#,
        sheet_count + 1
    );
    xml.push_str("</Relationships>");
    xml
}
pub fn sheet_rels_xml(table_ids: &[u32]) -> String {
    let mut xml = format!(r#"{XML_DECL}<Relationships xmlns="{NS_PKG_REL}">"#);
    for (i, table_id) in table_ids.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{REL_TABLE}" Target="../tables/table{table_id}.xml"/>"#,
            i + 1
        );
    }
    xml.push_str("</Relationships>");
    xml
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStyle {
    pub name: String,
    pub show_first_column: bool,
    pub show_last_column: bool,
    pub show_row_stripes: bool,
    pub show_column_stripes: bool,
}
impl TableStyle {
    pub fn banded_rows(name: &str) -> Self {
        Self {
            name: name.to_string(),
            show_first_column: false,
            show_last_column: false,
            show_row_stripes: true,
            show_column_stripes: false,
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub id: u32,
    pub name: String,
    pub range: String,
    pub columns: Vec<String>,
    pub style: TableStyle,
}
impl TableDefinition {
    pub fn to_xml(&self) -> String {
        let name = xml_escape_attr(&self.name);
        let range = xml_escape_attr(&self.range);
        let mut xml = format!(
            r#"{XML_DECL}<table xmlns="{NS_MAIN}" id="{}" name="{name}" displayName="{name}" ref="{range}" totalsRowShown="0"><autoFilter ref="{range}"/>"#,
            self.id
        );
        let _ = write!(xml, r#"<tableColumns count="{}">"#, self.columns.len());
        for (i, column) in self.columns.iter().enumerate() {
            let _ = write!(
                xml,
                r#"<tableColumn id="{}" name="{}"/>"#,
                i + 1,
                xml_escape_attr(column)
            );
        }
        xml.push_str("</tableColumns>");
        let _ = write!(
            xml,
            r#"<tableStyleInfo name="{}" showFirstColumn="{}" showLastColumn="{}" showRowStripes="{}" showColumnStripes="{}"/>"#,
            xml_escape_attr(&self.style.name),
            u8::from(self.style.show_first_column),
            u8::from(self.style.show_last_column),
            u8::from(self.style.show_row_stripes),
            u8::from(self.style.show_column_stripes),
        );
        xml.push_str("</table>");
        xml
    }
}
