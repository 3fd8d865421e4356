use crate::error::{Error, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
pub const OUTPUT_SUFFIX: &str = "_procesado";
pub const OUTPUT_EXTENSION: &str = "xlsx";
const INPUT_EXTENSION: &str = "txt";
pub fn output_path_for(input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::InvalidInputPath(input.to_path_buf()))?;
    let mut file_name = stem.to_os_string();
    file_name.push(OUTPUT_SUFFIX);
    file_name.push(".");
    file_name.push(OUTPUT_EXTENSION);
    Ok(input.with_file_name(file_name))
}
pub fn collect_inputs(selection: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in selection {
        if path.is_dir() {
            inputs.extend(scan_dir(path)?);
        } else {
            inputs.push(path.clone());
        }
    }
    if inputs.is_empty() {
        return Err(Error::NoInputs);
    }
    Ok(inputs)
}
fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let scan_err = |source| Error::ScanDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_err)? {
        let path = entry.map_err(scan_err)?.path();
        if path.is_file() && has_input_extension(&path) {
            found.push(path);
        }
    }
    found.sort();
    tracing::debug!(folder = %dir.display(), files = found.len(), "scanned input folder");
    Ok(found)
}
fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(INPUT_EXTENSION))
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn output_sits_beside_input_with_suffix() {
        let out = output_path_for(Path::new("/data/in/cards.txt")).unwrap();
        assert_eq!(out, PathBuf::from("/data/in/cards_procesado.xlsx"));
        let out = output_path_for(Path::new("cards")).unwrap();
        assert_eq!(out, PathBuf::from("cards_procesado.xlsx"));
        let out = output_path_for(Path::new("extract.2024.TXT")).unwrap();
        assert_eq!(out, PathBuf::from("extract.2024_procesado.xlsx"));
    }
    #[test]
    fn path_without_file_name_is_rejected() {
        let err = output_path_for(Path::new("/")).unwrap_err();
        assert!(matches!(err, Error::InvalidInputPath(_)));
    }
    #[test]
    fn directories_expand_to_sorted_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.TXT", "notes.md", "c_procesado.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.txt")).unwrap();
        let explicit = dir.path().join("notes.md");
        let inputs = collect_inputs(&[explicit.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(
            inputs,
            vec![
                explicit,
                dir.path().join("a.TXT"),
                dir.path().join("b.txt"),
                dir.path().join("c_procesado.txt"),
            ]
        );
    }
    #[test]
    fn empty_selection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_inputs(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, Error::NoInputs));
    }
    #[test]
    fn missing_files_are_kept_for_the_batch_to_report() {
        let inputs = collect_inputs(&[PathBuf::from("does_not_exist.txt")]).unwrap();
        assert_eq!(inputs.len(), 1);
    }
}
