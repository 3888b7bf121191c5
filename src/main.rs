mod cli;
mod ui;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use pdfnotes::api::{JobApi, NotesClient};
use pdfnotes::config::NotesConfig;
use pdfnotes::{
    DocumentUpload, FileHandleStore, GeneratedNote, HandleStore, JobOutcome, JobPoller,
};
use ui::JobProgress;

type CliPoller = JobPoller<NotesClient, FileHandleStore, Arc<JobProgress>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = NotesConfig::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }
    let store = FileHandleStore::in_dir(&config.state_dir);

    match cli.command {
        Command::Upload { file, output } => upload(&config, store, &file, output.as_deref()).await,
        Command::Resume { output } => resume(&config, store, output.as_deref()).await,
        Command::Status => status(&config, &store).await,
        Command::Clear => {
            store.clear().await.context("failed to clear job handle")?;
            println!("Forgot the persisted notes job.");
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pdfnotes=debug" } else { "pdfnotes=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn client(config: &NotesConfig) -> Result<NotesClient> {
    NotesClient::new(config.api_url.as_str(), config.request_timeout())
        .context("failed to build HTTP client")
}

async fn upload(
    config: &NotesConfig,
    store: FileHandleStore,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    if let Some(path) = output {
        check_output(path)?;
    }
    let doc = DocumentUpload::from_path(file).await?;
    let progress = Arc::new(JobProgress::new(&config.poll_settings()));
    let mut poller = JobPoller::new(
        client(config)?,
        store,
        Arc::clone(&progress),
        config.poll_settings(),
    );

    progress.begin(format!("Uploading {}", doc.file_name));
    if let Err(e) = poller.submit(&doc).await {
        progress.abandon();
        return Err(e).context("failed to submit PDF");
    }

    drive(poller, &progress, output).await
}

async fn resume(config: &NotesConfig, store: FileHandleStore, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        check_output(path)?;
    }
    let progress = Arc::new(JobProgress::new(&config.poll_settings()));
    let mut poller = JobPoller::new(
        client(config)?,
        store,
        Arc::clone(&progress),
        config.poll_settings(),
    );

    let Some(handle) = poller.resume().await.context("failed to read job handle")? else {
        println!("No notes job to resume.");
        return Ok(());
    };

    progress.begin(format!("Waiting for job {}", handle.job_id));
    drive(poller, &progress, output).await
}

/// Poll on a background task until the job ends or Ctrl-C is pressed.
async fn drive(poller: CliPoller, progress: &JobProgress, output: Option<&Path>) -> Result<()> {
    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let outcome = poller
        .spawn(cancel)
        .await
        .context("polling task panicked")?;
    ctrl_c.abort();

    match outcome {
        None => {
            progress.cancelled();
            Ok(())
        }
        Some(JobOutcome::Completed(notes)) => write_notes(
            &GeneratedNote::from_entries(notes),
            output,
            &mut std::io::stdout().lock(),
        ),
        Some(JobOutcome::Failed(e)) => Err(e).context("notes generation failed"),
        Some(JobOutcome::TimedOut { attempts }) => {
            bail!("PDF processing took too long (gave up after {attempts} status checks)")
        }
    }
}

/// Fail fast on an `--output` that can never be written, before a job exists.
fn check_output(path: &Path) -> Result<()> {
    if path.is_dir() {
        bail!("output path {} is a directory", path.display());
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        bail!("output directory {} does not exist", parent.display());
    }
    Ok(())
}

/// O handle já foi apagado quando chegamos aqui: se o arquivo não puder ser
/// gravado, as notas vão para `out` em Markdown para não se perderem.
fn write_notes(note: &GeneratedNote, output: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let Some(path) = output else {
        write!(out, "{}", note.to_markdown())?;
        return Ok(());
    };

    let json = serde_json::to_vec_pretty(note)?;
    match std::fs::write(path, json) {
        Ok(()) => {
            writeln!(out, "Notes written to {}", path.display())?;
            Ok(())
        }
        Err(e) => {
            write!(out, "{}", note.to_markdown())?;
            Err(anyhow!(e).context(format!(
                "failed to write {}; notes printed to stdout instead",
                path.display()
            )))
        }
    }
}

async fn status(config: &NotesConfig, store: &FileHandleStore) -> Result<()> {
    let Some(handle) = store.load().await.context("failed to read job handle")? else {
        println!("No notes job in progress.");
        return Ok(());
    };

    println!("Job:       {}", handle.job_id);
    if let Some(name) = &handle.file_name {
        println!("File:      {name}");
    }
    println!(
        "Submitted: {}",
        handle.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    match client(config)?.fetch_status(&handle.job_id).await {
        Ok(resp) => {
            println!("Status:    {}", resp.status);
            if !resp.message.is_empty() {
                println!("Message:   {}", resp.message);
            }
        }
        Err(e) => println!("Status:    unavailable ({e})"),
    }
    Ok(())
}
