use crate::{
    controller::{BatchReport, BatchStatus, ConvertOptions, SaveMode},
    error::Result,
    text_decode::{DEFAULT_ENCODING_LABEL, resolve_encoding},
};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
pub const EXIT_OK: u8 = 0;
pub const EXIT_FILE_FAILED: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_CANCELLED: u8 = 130;
#[derive(Debug, Clone, Parser)]
#[command(name = "fixedxlsx", version)]
#[command(about = "Convierte extractos de ancho fijo de tarjetas/cuentas en libros .xlsx con formato")]
#[command(
    after_help = "Cada archivo genera <nombre>_procesado.xlsx en su misma carpeta (se sobrescribe si existe).\nRUST_LOG ajusta el detalle del registro en stderr."
)]
pub struct Args {
    /// Archivos .txt o carpetas (se toman sus *.txt, sin recursión)
    #[arg(required = true, value_name = "INPUTS")]
    pub inputs: Vec<PathBuf>,
    /// Codificación de los campos (etiqueta WHATWG)
    #[arg(long, value_name = "LABEL", default_value = DEFAULT_ENCODING_LABEL)]
    pub encoding: String,
    /// Lee y resume sin guardar archivos
    #[arg(long)]
    pub dry_run: bool,
    /// Omite la verificación del archivo guardado
    #[arg(long, conflicts_with = "dry_run")]
    pub fast_save: bool,
    /// No escucha la orden de cancelar en la entrada estándar
    #[arg(long)]
    pub no_prompt: bool,
    /// Más detalle en el registro (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
impl Args {
    pub const fn save_mode(&self) -> SaveMode {
        if self.dry_run {
            SaveMode::DryRun
        } else if self.fast_save {
            SaveMode::Fast
        } else {
            SaveMode::Verify
        }
    }
    pub fn convert_options(&self) -> Result<ConvertOptions> {
        Ok(ConvertOptions {
            encoding: resolve_encoding(&self.encoding)?,
            save_mode: self.save_mode(),
        })
    }
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
pub fn is_cancel_command(line: &str) -> bool {
    matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "c" | "cancel" | "cancelar"
    )
}
pub fn exit_status(report: &BatchReport) -> u8 {
    match report.status {
        BatchStatus::Cancelled => EXIT_CANCELLED,
        BatchStatus::Completed if report.failed() > 0 => EXIT_FILE_FAILED,
        BatchStatus::Completed => EXIT_OK,
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use clap::error::ErrorKind;
    #[test]
    fn defaults_verify_and_use_windows_1252() {
        let args = Args::try_parse_from(["fixedxlsx", "cards.txt"]).unwrap();
        assert_eq!(args.inputs, vec![PathBuf::from("cards.txt")]);
        assert_eq!(args.save_mode(), SaveMode::Verify);
        let options = args.convert_options().unwrap();
        assert_eq!(options.encoding.name(), "windows-1252");
        assert_eq!(args.log_level(), "info");
    }
    #[test]
    fn flags_select_save_mode_and_verbosity() {
        let args = Args::try_parse_from(["fixedxlsx", "--dry-run", "-vv", "a.txt", "b"]).unwrap();
        assert_eq!(args.save_mode(), SaveMode::DryRun);
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.log_level(), "trace");
        let args = Args::try_parse_from(["fixedxlsx", "--fast-save", "a.txt"]).unwrap();
        assert_eq!(args.save_mode(), SaveMode::Fast);
    }
    #[test]
    fn dry_run_and_fast_save_conflict() {
        let err = Args::try_parse_from(["fixedxlsx", "--dry-run", "--fast-save", "a.txt"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
    #[test]
    fn inputs_are_required() {
        let err = Args::try_parse_from(["fixedxlsx"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
    #[test]
    fn cancel_command_accepts_short_and_long_forms() {
        assert!(is_cancel_command("c\n"));
        assert!(is_cancel_command("  CANCELAR "));
        assert!(is_cancel_command("cancel"));
        assert!(!is_cancel_command(""));
        assert!(!is_cancel_command("continuar"));
    }
    #[test]
    fn exit_status_follows_batch_outcome() {
        let clean = BatchReport {
            status: BatchStatus::Completed,
            files: Vec::new(),
        };
        assert_eq!(exit_status(&clean), EXIT_OK);
        let cancelled = BatchReport {
            status: BatchStatus::Cancelled,
            files: Vec::new(),
        };
        assert_eq!(exit_status(&cancelled), EXIT_CANCELLED);
        let failed = BatchReport {
            status: BatchStatus::Completed,
            files: vec![crate::controller::FileReport {
                input: PathBuf::from("x.txt"),
                outcome: crate::controller::FileOutcome::Failed {
                    error: Error::NoInputs,
                },
            }],
        };
        assert_eq!(exit_status(&failed), EXIT_FILE_FAILED);
    }
    #[test]
    fn unknown_encoding_is_rejected() {
        let args = Args::try_parse_from(["fixedxlsx", "--encoding", "klingon", "a.txt"]).unwrap();
        assert!(matches!(args.convert_options(), Err(Error::UnknownEncoding(_))));
        let args = Args::try_parse_from(["fixedxlsx", "--encoding", "utf-8", "a.txt"]).unwrap();
        assert_eq!(args.convert_options().unwrap().encoding.name(), "UTF-8");
    }
}
