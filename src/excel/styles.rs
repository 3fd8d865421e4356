use super::xml::xml_escape_attr;
use std::fmt::Write as _;
const CUSTOM_NUM_FMT_BASE: u32 = 164;
/// Cell formats (`cellXfs`) of a workbook. Index 0 is the default style.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    number_formats: Vec<String>,
    cell_formats: Vec<u32>,
}
impl StyleSheet {
    pub fn number_format_style(&mut self, format_code: &str) -> u32 {
        let num_fmt_id = match self.number_formats.iter().position(|f| f == format_code) {
            Some(pos) => CUSTOM_NUM_FMT_BASE + index_u32(pos),
            None => {
                self.number_formats.push(format_code.to_string());
                CUSTOM_NUM_FMT_BASE + index_u32(self.number_formats.len() - 1)
            }
        };
        if let Some(pos) = self.cell_formats.iter().position(|id| *id == num_fmt_id) {
            return index_u32(pos) + 1;
        }
        self.cell_formats.push(num_fmt_id);
        index_u32(self.cell_formats.len())
    }
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        if !self.number_formats.is_empty() {
            let _ = write!(xml, r#"<numFmts count="{}">"#, self.number_formats.len());
            for (i, code) in self.number_formats.iter().enumerate() {
                let _ = write!(
                    xml,
                    r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                    CUSTOM_NUM_FMT_BASE + index_u32(i),
                    xml_escape_attr(code)
                );
            }
            xml.push_str("</numFmts>");
        }
        xml.push_str(
            r#"<fonts count="1"><font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font></fonts>"#,
        );
        xml.push_str(
            r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
        );
        xml.push_str(r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#);
        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);
        let _ = write!(xml, r#"<cellXfs count="{}">"#, self.cell_formats.len() + 1);
        xml.push_str(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#);
        for num_fmt_id in &self.cell_formats {
            let _ = write!(
                xml,
                r#"<xf numFmtId="{num_fmt_id}" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#
            );
        }
        xml.push_str("</cellXfs>");
        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        xml.push_str(r#"<dxfs count="0"/><tableStyles count="0" defaultTableStyle="TableStyleMedium2" defaultPivotStyle="PivotStyleLight16"/>"#);
        xml.push_str("</styleSheet>");
        xml
    }
}
fn index_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
