use crate::{
    emitter,
    error::{Error, Result},
    path_policy::output_path_for,
    record::RecordSet,
};
use encoding_rs::{Encoding, WINDOWS_1252};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread::{self, JoinHandle},
};
const WORKER_THREAD_NAME: &str = "fixedxlsx-batch";
/// Cooperative stop request shared between the caller and the batch.
///
/// Checked before each file starts; a file in progress always finishes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}
impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Verify,
    Fast,
    DryRun,
}
impl SaveMode {
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
    pub const fn verify_saved_file(self) -> bool {
        matches!(self, Self::Verify)
    }
}
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub encoding: &'static Encoding,
    pub save_mode: SaveMode,
}
impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            encoding: WINDOWS_1252,
            save_mode: SaveMode::Verify,
        }
    }
}
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSummary {
    pub records: usize,
    pub short_lines: usize,
    pub invalid_dates: usize,
    pub unrepresentable_dates: usize,
}
impl FileSummary {
    fn from_records(records: &RecordSet) -> Self {
        Self {
            records: records.len(),
            short_lines: records.short_lines,
            invalid_dates: records.invalid_dates,
            unrepresentable_dates: 0,
        }
    }
}
#[derive(Debug)]
pub enum FileOutcome {
    Written { output: PathBuf, summary: FileSummary },
    Parsed { summary: FileSummary },
    Failed { error: Error },
}
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub outcome: FileOutcome,
}
impl FileReport {
    pub const fn is_success(&self) -> bool {
        !matches!(self.outcome, FileOutcome::Failed { .. })
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Completed,
    Cancelled,
}
#[derive(Debug)]
pub struct BatchReport {
    pub status: BatchStatus,
    pub files: Vec<FileReport>,
}
impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }
    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }
    pub fn is_clean(&self) -> bool {
        self.status == BatchStatus::Completed && self.failed() == 0
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    FileStarted {
        index: usize,
        input: PathBuf,
    },
    FileCompleted {
        index: usize,
        input: PathBuf,
        output: Option<PathBuf>,
        records: usize,
    },
    FileFailed {
        index: usize,
        input: PathBuf,
        message: String,
    },
    Cancelled {
        processed: usize,
        remaining: usize,
    },
    Finished {
        status: BatchStatus,
        succeeded: usize,
        failed: usize,
    },
}
pub trait BatchObserver: Send {
    fn on_event(&mut self, event: BatchEvent);
}
impl BatchObserver for mpsc::Sender<BatchEvent> {
    fn on_event(&mut self, event: BatchEvent) {
        if self.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}
impl<F> BatchObserver for F
where
    F: FnMut(BatchEvent) + Send,
{
    fn on_event(&mut self, event: BatchEvent) {
        self(event);
    }
}
pub fn convert_file(input: &Path, options: ConvertOptions) -> Result<FileOutcome> {
    let output = output_path_for(input)?;
    let content = fs::read(input).map_err(|source| Error::ReadInput {
        path: input.to_path_buf(),
        source,
    })?;
    let records = RecordSet::parse_bytes(&content, options.encoding);
    let mut summary = FileSummary::from_records(&records);
    if summary.short_lines > 0 || summary.invalid_dates > 0 {
        tracing::warn!(
            input = %input.display(),
            short_lines = summary.short_lines,
            invalid_dates = summary.invalid_dates,
            "malformed records kept with partial values"
        );
    }
    if options.save_mode.is_dry_run() {
        return Ok(FileOutcome::Parsed { summary });
    }
    let emitted = emitter::emit(&records, &output, options.save_mode.verify_saved_file())?;
    summary.unrepresentable_dates = emitted.unrepresentable_dates;
    Ok(FileOutcome::Written { output, summary })
}
pub fn run_batch<O>(
    inputs: &[PathBuf],
    options: ConvertOptions,
    token: &CancellationToken,
    observer: &mut O,
) -> BatchReport
where
    O: BatchObserver + ?Sized,
{
    tracing::info!(files = inputs.len(), "batch started");
    observer.on_event(BatchEvent::Started {
        total: inputs.len(),
    });
    let mut status = BatchStatus::Completed;
    let mut files = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        if token.is_cancelled() {
            let remaining = inputs.len() - index;
            tracing::info!(processed = index, remaining, "batch cancelled");
            observer.on_event(BatchEvent::Cancelled {
                processed: index,
                remaining,
            });
            status = BatchStatus::Cancelled;
            break;
        }
        observer.on_event(BatchEvent::FileStarted {
            index,
            input: input.clone(),
        });
        tracing::debug!(input = %input.display(), "converting");
        let outcome = match convert_file(input, options) {
            Ok(outcome) => outcome,
            Err(error) => FileOutcome::Failed { error },
        };
        let event = match &outcome {
            FileOutcome::Written { output, summary } => {
                tracing::info!(
                    input = %input.display(),
                    output = %output.display(),
                    records = summary.records,
                    "file converted"
                );
                BatchEvent::FileCompleted {
                    index,
                    input: input.clone(),
                    output: Some(output.clone()),
                    records: summary.records,
                }
            }
            FileOutcome::Parsed { summary } => {
                tracing::info!(input = %input.display(), records = summary.records, "file parsed (dry run)");
                BatchEvent::FileCompleted {
                    index,
                    input: input.clone(),
                    output: None,
                    records: summary.records,
                }
            }
            FileOutcome::Failed { error } => {
                tracing::error!(input = %input.display(), error = %error, "file failed");
                BatchEvent::FileFailed {
                    index,
                    input: input.clone(),
                    message: error.to_string(),
                }
            }
        };
        files.push(FileReport {
            input: input.clone(),
            outcome,
        });
        observer.on_event(event);
    }
    let report = BatchReport { status, files };
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        cancelled = status == BatchStatus::Cancelled,
        "batch finished"
    );
    observer.on_event(BatchEvent::Finished {
        status,
        succeeded: report.succeeded(),
        failed: report.failed(),
    });
    report
}
#[derive(Debug)]
pub struct BatchWorker {
    token: CancellationToken,
    handle: JoinHandle<BatchReport>,
}
impl BatchWorker {
    pub fn spawn<O>(inputs: Vec<PathBuf>, options: ConvertOptions, observer: O) -> Result<Self>
    where
        O: BatchObserver + 'static,
    {
        Self::spawn_with_token(inputs, options, CancellationToken::new(), observer)
    }
    pub fn spawn_with_token<O>(
        inputs: Vec<PathBuf>,
        options: ConvertOptions,
        token: CancellationToken,
        mut observer: O,
    ) -> Result<Self>
    where
        O: BatchObserver + 'static,
    {
        let worker_token = token.clone();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_batch(&inputs, options, &worker_token, &mut observer))
            .map_err(Error::WorkerSpawn)?;
        Ok(Self { token, handle })
    }
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
    pub fn cancel(&self) {
        self.token.cancel();
    }
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
    pub fn join(self) -> Result<BatchReport> {
        self.handle.join().map_err(|_| Error::WorkerPanicked)
    }
}
