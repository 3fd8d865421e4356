use super::xml::{extract_attr, find_start_tag, first_start_tag};
use crate::error::{Error, Result};
use std::{
    fs,
    io::{ErrorKind, Read as _, Write as _},
    path::{Path, PathBuf},
    process, thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};
const REQUIRED_PARTS: [&str; 5] = [
    "[Content_Types].xml",
    "_rels/.rels",
    "xl/workbook.xml",
    "xl/_rels/workbook.xml.rels",
    "xl/styles.xml",
];
#[derive(Debug, Default)]
pub struct XlsxPackage {
    parts: Vec<(String, String)>,
}
impl XlsxPackage {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add_part(&mut self, path: &str, content: String) {
        if let Some(slot) = self.parts.iter_mut().find(|(p, _)| p == path) {
            slot.1 = content;
        } else {
            self.parts.push((path.to_string(), content));
        }
    }
    pub fn part(&self, path: &str) -> Option<&str> {
        self.parts
            .iter()
            .find_map(|(p, c)| if p == path { Some(c.as_str()) } else { None })
    }
    /// Writes next to `output_xlsx`, then renames over it. An existing file
    /// at the destination is replaced; the destination folder must exist.
    ///
    /// With `verify_saved_file` the temporary package is reopened and its
    /// parts checked before it replaces anything.
    pub fn save_as(&self, output_xlsx: &Path, verify_saved_file: bool) -> Result<()> {
        let tmp_output = create_unique_temp_output_path(output_xlsx)?;
        let result = (|| -> Result<()> {
            self.write_archive(&tmp_output)?;
            if verify_saved_file {
                verify_saved_xlsx(&tmp_output)?;
            }
            promote_temp_output(&tmp_output, output_xlsx)
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp_output);
        }
        result
    }
    fn write_archive(&self, archive_path: &Path) -> Result<()> {
        let file = fs::File::create(archive_path).map_err(|source| Error::WriteOutput {
            path: archive_path.to_path_buf(),
            source,
        })?;
        let package_err = |source| Error::Package {
            path: archive_path.to_path_buf(),
            source,
        };
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (path, content) in &self.parts {
            zip.start_file(path.as_str(), options).map_err(package_err)?;
            zip.write_all(content.as_bytes())
                .map_err(|source| Error::WriteOutput {
                    path: archive_path.to_path_buf(),
                    source,
                })?;
        }
        let file = zip.finish().map_err(package_err)?;
        file.sync_all().map_err(|source| Error::WriteOutput {
            path: archive_path.to_path_buf(),
            source,
        })
    }
}
fn create_unique_temp_output_path(output_xlsx: &Path) -> Result<PathBuf> {
    let parent = match output_xlsx.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = output_xlsx
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output.xlsx");
    let pid = process::id();
    for seq in 0..1024u32 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let candidate = parent.join(format!(".{file_name}.tmp_{pid}_{nanos}_{seq}"));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                thread::sleep(Duration::from_micros(50));
            }
            Err(source) => {
                return Err(Error::WriteOutput {
                    path: output_xlsx.to_path_buf(),
                    source,
                });
            }
        }
    }
    Err(Error::WriteOutput {
        path: output_xlsx.to_path_buf(),
        source: ErrorKind::AlreadyExists.into(),
    })
}
fn promote_temp_output(temp_output: &Path, output_xlsx: &Path) -> Result<()> {
    fs::rename(temp_output, output_xlsx).map_err(|source| Error::WriteOutput {
        path: output_xlsx.to_path_buf(),
        source,
    })?;
    if let Some(parent) = output_xlsx.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::File::open(parent).and_then(|dir| dir.sync_all())
    {
        tracing::debug!(folder = %parent.display(), error = %e, "folder sync after save failed");
    }
    Ok(())
}
fn verify_saved_xlsx(output_xlsx: &Path) -> Result<()> {
    let verify_err = |reason: String| Error::Verify {
        path: output_xlsx.to_path_buf(),
        reason,
    };
    let file = fs::File::open(output_xlsx).map_err(|source| Error::WriteOutput {
        path: output_xlsx.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| Error::Package {
        path: output_xlsx.to_path_buf(),
        source,
    })?;
    for rel in REQUIRED_PARTS {
        if archive.by_name(rel).is_err() {
            return Err(verify_err(format!("falta la parte OOXML obligatoria {rel}")));
        }
    }
    let sheet_xml = read_part(&mut archive, "xl/worksheets/sheet1.xml")
        .ok_or_else(|| verify_err("no se pudo releer la primera hoja".to_string()))?;
    if find_start_tag(&sheet_xml, "sheetData", 0).is_none() {
        return Err(verify_err("la hoja no contiene sheetData".to_string()));
    }
    if find_start_tag(&sheet_xml, "tablePart", 0).is_some() {
        let table_xml = read_part(&mut archive, "xl/tables/table1.xml")
            .ok_or_else(|| verify_err("no se pudo releer la definición de tabla".to_string()))?;
        let has_ref = first_start_tag(&table_xml, "table")
            .and_then(|tag| extract_attr(tag, "ref"))
            .is_some_and(|r| !r.is_empty());
        if !has_ref {
            return Err(verify_err("la tabla no declara su rango".to_string()));
        }
    }
    Ok(())
}
fn read_part(archive: &mut ZipArchive<fs::File>, name: &str) -> Option<String> {
    let mut entry = archive.by_name(name).ok()?;
    let mut text = String::new();
    entry.read_to_string(&mut text).ok()?;
    Some(text)
}
#[cfg(test)]
mod tests {
    use super::*;
    fn minimal_package() -> XlsxPackage {
        let mut package = XlsxPackage::new();
        for rel in REQUIRED_PARTS {
            package.add_part(rel, "<x/>".to_string());
        }
        package.add_part(
            "xl/worksheets/sheet1.xml",
            "<worksheet><sheetData/></worksheet>".to_string(),
        );
        package
    }
    #[test]
    fn add_part_replaces_existing_content() {
        let mut package = XlsxPackage::new();
        package.add_part("a.xml", "1".to_string());
        package.add_part("a.xml", "2".to_string());
        assert_eq!(package.part("a.xml"), Some("2"));
    }
    #[test]
    fn save_replaces_existing_file_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.xlsx");
        fs::write(&out, b"stale").unwrap();
        minimal_package().save_as(&out, true).unwrap();
        let file = fs::File::open(&out).unwrap();
        let mut archive = ZipArchive::new(file).unwrap();
        assert!(archive.by_name("xl/workbook.xml").is_ok());
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "only the promoted workbook remains");
    }
    #[test]
    fn verification_rejects_missing_parts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("broken.xlsx");
        let mut package = XlsxPackage::new();
        package.add_part("xl/workbook.xml", "<workbook/>".to_string());
        let err = package.save_as(&out, true).unwrap_err();
        assert!(matches!(err, Error::Verify { .. }), "{err}");
        assert!(!out.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
    #[test]
    fn missing_destination_folder_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("out.xlsx");
        let err = minimal_package().save_as(&out, false).unwrap_err();
        assert_eq!(err.io_kind(), Some(ErrorKind::NotFound));
    }
}
