use crate::controller::{BatchEvent, BatchReport, BatchStatus, FileOutcome, SaveMode};
pub const STATUS_PROCESSING: &str = "Procesando...";
pub const STATUS_COMPLETED: &str = "¡Completado!";
pub const STATUS_COMPLETED_WITH_ERRORS: &str = "Completado con errores.";
pub const STATUS_CANCELLED: &str = "Cancelado por el usuario.";
pub const FINAL_ACKNOWLEDGEMENT: &str = "✅ Archivos procesados correctamente.";
pub const CANCEL_HINT: &str = "Escriba \"c\" y pulse Enter para cancelar tras el archivo en curso.";
pub fn status_message(report: &BatchReport) -> &'static str {
    match report.status {
        BatchStatus::Cancelled => STATUS_CANCELLED,
        BatchStatus::Completed if report.failed() > 0 => STATUS_COMPLETED_WITH_ERRORS,
        BatchStatus::Completed => STATUS_COMPLETED,
    }
}
pub fn progress_line(event: &BatchEvent) -> Option<String> {
    match event {
        BatchEvent::Started { total } => Some(format!("{STATUS_PROCESSING} ({total} archivo(s))")),
        BatchEvent::FileStarted { index, input } => {
            Some(format!("[{}] {}", index + 1, input.display()))
        }
        BatchEvent::FileCompleted {
            output: Some(output),
            records,
            ..
        } => Some(format!("    -> {} ({records} registros)", output.display())),
        BatchEvent::FileCompleted {
            output: None,
            records,
            ..
        } => Some(format!("    -> (dry-run) {records} registros leídos")),
        BatchEvent::FileFailed { message, .. } => Some(format!("    [error] {message}")),
        BatchEvent::Cancelled { remaining, .. } => {
            Some(format!("Cancelado: {remaining} archivo(s) sin procesar."))
        }
        BatchEvent::Finished { .. } => None,
    }
}
pub fn print_summary(report: &BatchReport, total: usize, save_mode: SaveMode) {
    println!("\n==== Resumen ====");
    println!("- Archivos seleccionados: {total}");
    println!("- Convertidos: {}", report.succeeded());
    println!("- Con error: {}", report.failed());
    if report.status == BatchStatus::Cancelled {
        println!("- Sin procesar (cancelado): {}", total - report.files.len());
    }
    if save_mode.is_dry_run() {
        println!("- Salida: (dry-run) no se guardó ningún archivo");
    } else if save_mode.verify_saved_file() {
        println!("- Verificación al guardar: activada (predeterminado)");
    } else {
        println!("- Verificación al guardar: omitida (--fast-save)");
    }
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Written { output, summary } => {
                println!(
                    "  OK    {} -> {} ({} registros)",
                    file.input.display(),
                    output.display(),
                    summary.records
                );
                print_diagnostics(summary.short_lines, summary.invalid_dates, summary.unrepresentable_dates);
            }
            FileOutcome::Parsed { summary } => {
                println!("  LEÍDO {} ({} registros)", file.input.display(), summary.records);
                print_diagnostics(summary.short_lines, summary.invalid_dates, 0);
            }
            FileOutcome::Failed { error } => {
                println!("  ERROR {}: {error}", file.input.display());
            }
        }
    }
    println!("=================\n");
    println!("{}", status_message(report));
    if report.is_clean() {
        println!("{FINAL_ACKNOWLEDGEMENT}");
    }
}
fn print_diagnostics(short_lines: usize, invalid_dates: usize, unrepresentable_dates: usize) {
    if short_lines > 0 {
        println!("        líneas cortas: {short_lines}");
    }
    if invalid_dates > 0 {
        println!("        fechas no válidas (vacías): {invalid_dates}");
    }
    if unrepresentable_dates > 0 {
        println!("        fechas fuera de rango (vacías): {unrepresentable_dates}");
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{controller::FileReport, error::Error};
    use std::path::PathBuf;
    fn report(status: BatchStatus, failed: bool) -> BatchReport {
        let outcome = if failed {
            FileOutcome::Failed {
                error: Error::NoInputs,
            }
        } else {
            FileOutcome::Parsed {
                summary: crate::controller::FileSummary::default(),
            }
        };
        BatchReport {
            status,
            files: vec![FileReport {
                input: PathBuf::from("cards.txt"),
                outcome,
            }],
        }
    }
    #[test]
    fn status_reflects_terminal_state() {
        assert_eq!(status_message(&report(BatchStatus::Completed, false)), STATUS_COMPLETED);
        assert_eq!(
            status_message(&report(BatchStatus::Completed, true)),
            STATUS_COMPLETED_WITH_ERRORS
        );
        assert_eq!(status_message(&report(BatchStatus::Cancelled, false)), STATUS_CANCELLED);
    }
    #[test]
    fn progress_lines_name_files_and_outputs() {
        let started = BatchEvent::FileStarted {
            index: 0,
            input: PathBuf::from("cards.txt"),
        };
        assert_eq!(progress_line(&started).as_deref(), Some("[1] cards.txt"));
        let done = BatchEvent::FileCompleted {
            index: 0,
            input: PathBuf::from("cards.txt"),
            output: Some(PathBuf::from("cards_procesado.xlsx")),
            records: 3,
        };
        assert_eq!(
            progress_line(&done).as_deref(),
            Some("    -> cards_procesado.xlsx (3 registros)")
        );
        let finished = BatchEvent::Finished {
            status: BatchStatus::Completed,
            succeeded: 1,
            failed: 0,
        };
        assert!(progress_line(&finished).is_none());
    }
}
