use std::{io, path::PathBuf};
use thiserror::Error;
pub type Result<T> = std::result::Result<T, Error>;
#[derive(Debug, Error)]
pub enum Error {
    #[error("no se pudo leer el archivo de entrada: {} ({source})", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no se pudo escribir el archivo de salida: {} ({source})", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no se pudo generar el paquete xlsx: {} ({source})", path.display())]
    Package {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("demasiados registros para una hoja: {rows} ({})", path.display())]
    TooManyRows { path: PathBuf, rows: usize },
    #[error("verificación del archivo guardado fallida: {} ({reason})", path.display())]
    Verify { path: PathBuf, reason: String },
    #[error("la ruta de entrada no tiene nombre de archivo: {}", .0.display())]
    InvalidInputPath(PathBuf),
    #[error("no se pudo leer la carpeta: {} ({source})", path.display())]
    ScanDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("codificación desconocida: {0}")]
    UnknownEncoding(String),
    #[error("no se encontraron archivos .txt para procesar")]
    NoInputs,
    #[error("no se pudo iniciar el proceso en segundo plano ({0})")]
    WorkerSpawn(#[source] io::Error),
    #[error("el proceso en segundo plano terminó de forma inesperada")]
    WorkerPanicked,
}
impl Error {
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::ReadInput { source, .. }
            | Self::WriteOutput { source, .. }
            | Self::ScanDir { source, .. }
            | Self::WorkerSpawn(source) => Some(source.kind()),
            Self::Package {
                source: zip::result::ZipError::Io(source),
                ..
            } => Some(source.kind()),
            Self::Package { .. }
            | Self::TooManyRows { .. }
            | Self::Verify { .. }
            | Self::InvalidInputPath(_)
            | Self::UnknownEncoding(_)
            | Self::NoInputs
            | Self::WorkerPanicked => None,
        }
    }
    pub const fn is_file_access(&self) -> bool {
        matches!(
            self,
            Self::ReadInput { .. } | Self::WriteOutput { .. } | Self::ScanDir { .. }
        )
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn io_kind_is_exposed_for_file_access_errors() {
        let error = Error::ReadInput {
            path: PathBuf::from("cards.txt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(error.io_kind(), Some(io::ErrorKind::NotFound));
        assert!(error.is_file_access(), "read failures are file access errors");
        assert!(error.to_string().contains("cards.txt"));
    }
    #[test]
    fn non_io_errors_have_no_kind() {
        assert_eq!(Error::NoInputs.io_kind(), None);
        assert!(!Error::UnknownEncoding("klingon".to_string()).is_file_access());
    }
}
