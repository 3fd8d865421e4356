use clap::Parser;
use fixedxlsx::{
    Result,
    cli::{self, Args},
    controller::{BatchWorker, CancellationToken},
    path_policy::collect_inputs,
    summary,
};
use std::{
    io::{self, BufRead, IsTerminal},
    process::ExitCode,
    sync::mpsc,
    thread,
};
use tracing_subscriber::{EnvFilter, fmt};
fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);
    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            eprintln!("[error] {e}");
            ExitCode::from(cli::EXIT_USAGE)
        }
    }
}
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
fn run(args: &Args) -> Result<u8> {
    let options = args.convert_options()?;
    let inputs = collect_inputs(&args.inputs)?;
    let total = inputs.len();
    let (tx, rx) = mpsc::channel();
    let worker = BatchWorker::spawn(inputs, options, tx)?;
    if !args.no_prompt && io::stdin().is_terminal() {
        println!("{}", summary::CANCEL_HINT);
        spawn_cancel_watcher(worker.token());
    }
    for event in &rx {
        if let Some(line) = summary::progress_line(&event) {
            println!("{line}");
        }
    }
    let report = worker.join()?;
    summary::print_summary(&report, total, options.save_mode);
    Ok(cli::exit_status(&report))
}
/// Cancels the batch when the cancel command is typed. The thread is left
/// blocked on stdin when the batch ends first; process exit reaps it.
fn spawn_cancel_watcher(token: CancellationToken) {
    let spawned = thread::Builder::new()
        .name("fixedxlsx-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if cli::is_cancel_command(&line) {
                    println!("Cancelando al terminar el archivo en curso...");
                    token.cancel();
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "cancel watcher not started");
    }
}
