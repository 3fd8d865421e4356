use crate::{
    date::{excel_serial_date, excel_serial_datetime},
    error::{Error, Result},
    excel::{
        ooxml::{TableDefinition, TableStyle},
        writer::{Workbook, Worksheet, range_ref},
    },
    record::{FieldValue, RecordSet, header_names},
};
use std::path::Path;
pub const SHEET_NAME: &str = "Original";
pub const TABLE_NAME: &str = "TablaDatos";
pub const TABLE_STYLE: &str = "TableStyleMedium9";
pub const DATE_DISPLAY_FORMAT: &str = "DD/MM/YYYY";
const LAST_COLUMN: u32 = 10;
const MAX_SHEET_ROWS: usize = 1_048_576;
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    pub data_rows: usize,
    pub table_range: String,
    pub unrepresentable_dates: usize,
}
pub fn build_workbook(records: &RecordSet) -> (Workbook, EmitSummary) {
    let mut book = Workbook::new();
    let date_style = book.styles_mut().number_format_style(DATE_DISPLAY_FORMAT);
    let mut sheet = Worksheet::new();
    for (col, name) in (1u32..).zip(header_names()) {
        sheet.set_string_at(col, 1, name);
    }
    let mut unrepresentable_dates = 0usize;
    let mut last_row = 1u32;
    for (row, record) in (2u32..).zip(records) {
        last_row = row;
        sheet.ensure_row(row);
        for (col, value) in (1u32..).zip(record.values()) {
            let serial = match value {
                FieldValue::Text(text) => {
                    if !text.is_empty() {
                        sheet.set_string_at(col, row, text);
                    }
                    continue;
                }
                FieldValue::DateTime(value) => value.map(|v| (v.to_string(), excel_serial_datetime(v))),
                FieldValue::Date(value) => value.map(|v| {
                    let serial = excel_serial_date(v)
                        .and_then(|days| i32::try_from(days).ok())
                        .map(f64::from);
                    (v.to_string(), serial)
                }),
            };
            match serial {
                Some((_, Some(serial))) => sheet.set_number_at(col, row, serial),
                Some((text, None)) => {
                    unrepresentable_dates += 1;
                    tracing::warn!(row, column = col, date = %text, "date outside the spreadsheet date range, left blank");
                    sheet.set_blank_at(col, row);
                }
                None => sheet.set_blank_at(col, row),
            }
            sheet.set_style_at(col, row, date_style);
        }
    }
    let table_range = range_ref(1, 1, LAST_COLUMN, last_row.max(2));
    let sheet_index = book.add_sheet(SHEET_NAME, sheet);
    let table = TableDefinition {
        id: 0,
        name: TABLE_NAME.to_string(),
        range: table_range.clone(),
        columns: header_names().iter().map(ToString::to_string).collect(),
        style: TableStyle::banded_rows(TABLE_STYLE),
    };
    book.add_table(sheet_index, table);
    let summary = EmitSummary {
        data_rows: records.len(),
        table_range,
        unrepresentable_dates,
    };
    (book, summary)
}
pub fn emit(records: &RecordSet, destination: &Path, verify_saved_file: bool) -> Result<EmitSummary> {
    if records.len() >= MAX_SHEET_ROWS {
        return Err(Error::TooManyRows {
            path: destination.to_path_buf(),
            rows: records.len(),
        });
    }
    let (book, summary) = build_workbook(records);
    book.save_as(destination, verify_saved_file)?;
    tracing::debug!(
        output = %destination.display(),
        rows = summary.data_rows,
        range = %summary.table_range,
        "workbook written"
    );
    Ok(summary)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FIELD_COUNT, Record};
    use chrono::NaiveDate;
    use std::{fs, io::Read as _};
    const FULL_LINE: &str =
        "0049123400001234567801A001454000123456789012315-03-2024    0101-01-2025 101530  ";
    fn read_part(path: &Path, name: &str) -> String {
        let file = fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        text
    }
    fn sheet_xml(book: &Workbook) -> String {
        book.sheet(0).unwrap().to_xml()
    }
    #[test]
    fn last_column_matches_layout() {
        assert_eq!(usize::try_from(LAST_COLUMN).unwrap(), FIELD_COUNT);
    }
    #[test]
    fn sheet_has_header_plus_one_row_per_record() {
        let records = RecordSet::parse([FULL_LINE, FULL_LINE, "short"]);
        let (book, summary) = build_workbook(&records);
        let xml = sheet_xml(&book);
        assert_eq!(xml.matches("<row ").count(), 4);
        assert!(xml.contains(r#"<dimension ref="A1:J4"/>"#));
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t>ENTIDAD</t></is></c>"#));
        assert!(xml.contains(r#"<c r="J1" t="inlineStr"><is><t>HORA</t></is></c>"#));
        assert_eq!(summary.data_rows, 3);
        assert_eq!(summary.table_range, "A1:J4");
    }
    #[test]
    fn date_columns_hold_styled_serials() {
        let records = RecordSet::parse([FULL_LINE]);
        let (book, _) = build_workbook(&records);
        let xml = sheet_xml(&book);
        assert!(xml.contains(r#"<c r="G2" s="1"><v>45366</v></c>"#));
        assert!(xml.contains(r#"<c r="I2" s="1"><v>45658</v></c>"#));
        assert!(xml.contains(r#"<c r="A2" t="inlineStr"><is><t>0049</t></is></c>"#));
        let styles = book.to_package();
        assert!(
            styles
                .part("xl/styles.xml")
                .unwrap()
                .contains(r#"formatCode="DD/MM/YYYY""#)
        );
    }
    #[test]
    fn missing_dates_are_blank_but_formatted() {
        let records = RecordSet::parse(["short"]);
        let (book, _) = build_workbook(&records);
        let sheet = book.sheet(0).unwrap();
        for col in [7, 9] {
            let cell = sheet.cell(col, 2).unwrap();
            assert_eq!(cell.attr("s"), Some("1"));
            assert!(cell.inner_xml.is_none(), "column {col} must be blank");
        }
        assert!(sheet.cell(1, 2).is_some());
        assert!(sheet.cell(10, 2).is_none(), "empty text makes no cell");
    }
    #[test]
    fn out_of_range_dates_are_counted_and_left_blank() {
        let mut record = Record::from_text(FULL_LINE);
        record.fecha_baja = NaiveDate::from_ymd_opt(1899, 1, 1);
        let records = RecordSet {
            records: vec![record],
            ..RecordSet::default()
        };
        let (book, summary) = build_workbook(&records);
        assert_eq!(summary.unrepresentable_dates, 1);
        let cell = book.sheet(0).unwrap().cell(9, 2).unwrap();
        assert!(cell.inner_xml.is_none());
        assert_eq!(cell.attr("s"), Some("1"));
    }
    #[test]
    fn short_years_are_blank_not_out_of_range() {
        let line = FULL_LINE.replacen("01-01-2025", "01-01-25  ", 1);
        let (book, summary) = build_workbook(&RecordSet::parse([line.as_str()]));
        assert_eq!(summary.unrepresentable_dates, 0);
        let cell = book.sheet(0).unwrap().cell(9, 2).unwrap();
        assert!(cell.inner_xml.is_none());
    }
    #[test]
    fn table_covers_full_range_with_banded_rows() {
        let records = RecordSet::parse([FULL_LINE, FULL_LINE]);
        let (book, _) = build_workbook(&records);
        let table = book.sheet(0).unwrap().tables().first().unwrap().to_xml();
        assert!(table.contains(r#"name="TablaDatos" displayName="TablaDatos" ref="A1:J3""#));
        assert!(table.contains(r#"<autoFilter ref="A1:J3"/>"#));
        assert!(table.contains(r#"<tableColumns count="10">"#));
        assert!(table.contains(r#"<tableColumn id="3" name="CUENTA"/>"#));
        assert!(table.contains(
            r#"<tableStyleInfo name="TableStyleMedium9" showFirstColumn="0" showLastColumn="0" showRowStripes="1" showColumnStripes="0"/>"#
        ));
    }
    #[test]
    fn empty_record_set_still_gets_a_valid_table() {
        let (book, summary) = build_workbook(&RecordSet::default());
        assert_eq!(summary.table_range, "A1:J2");
        assert!(sheet_xml(&book).contains(r#"<dimension ref="A1:J1"/>"#));
    }
    #[test]
    fn emit_writes_and_overwrites_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cards_procesado.xlsx");
        let first = RecordSet::parse([FULL_LINE, FULL_LINE, FULL_LINE]);
        emit(&first, &out, true).unwrap();
        let second = RecordSet::parse([FULL_LINE]);
        let summary = emit(&second, &out, true).unwrap();
        assert_eq!(summary.data_rows, 1);
        let workbook = read_part(&out, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Original""#));
        let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
        assert_eq!(sheet.matches("<row ").count(), 2, "old rows are gone");
        let table = read_part(&out, "xl/tables/table1.xml");
        assert!(table.contains(r#"ref="A1:J2""#));
    }
    #[test]
    fn unwritable_destination_is_a_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no_such_dir").join("cards_procesado.xlsx");
        let err = emit(&RecordSet::parse([FULL_LINE]), &out, false).unwrap_err();
        assert!(err.is_file_access(), "{err}");
        assert!(!out.exists());
    }
}
