//! Interface de terminal do pdfnotes: spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`JobProgress`] implementa [`JobListener`] e
//! acompanha visualmente um job de geração de notas.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use pdfnotes::api::TaskStatus;
use pdfnotes::{JobHandle, JobListener, NoteEntry, PollError, PollSettings};

pub struct JobProgress {
    pb: ProgressBar,
    max_attempts: u32,
    deadline: Duration,
    green: Style,
    red: Style,
    yellow: Style,
}

impl JobProgress {
    /// Cria o spinner sem exibi-lo; [`begin`](Self::begin) o coloca na tela.
    pub fn new(settings: &PollSettings) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .expect("invalid template"),
        );

        Self {
            pb,
            max_attempts: settings.max_attempts,
            deadline: settings.deadline(),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    pub fn begin(&self, message: impl Into<String>) {
        self.pb.set_message(format!(
            "{} (gives up after {}s)",
            message.into(),
            self.deadline.as_secs()
        ));
        self.pb.enable_steady_tick(Duration::from_millis(100));
    }

    /// Upload falhou antes de existir um job.
    pub fn abandon(&self) {
        self.pb.finish_and_clear();
    }

    /// Polling interrompido (Ctrl-C); o handle continua salvo.
    pub fn cancelled(&self) {
        self.pb.finish_and_clear();
        eprintln!(
            "  {} Stopped. Run `pdfnotes resume` to keep waiting for the notes.",
            self.yellow.apply_to("⏸")
        );
    }
}

impl JobListener for JobProgress {
    fn on_submitted(&self, handle: &JobHandle, message: &str) {
        let message = if message.is_empty() {
            "Processing PDF"
        } else {
            message
        };
        self.pb.println(format!(
            "  {} {message} (job {})",
            self.green.apply_to("↑"),
            handle.job_id
        ));
    }

    fn on_tick(&self, _job_id: &str, attempt: u32, status: Option<TaskStatus>) {
        let status = match status {
            Some(s) => s.to_string(),
            None => self.yellow.apply_to("unreachable").to_string(),
        };
        self.pb.set_message(format!(
            "Generating notes [{status}] check {attempt}/{}",
            self.max_attempts
        ));
    }

    fn on_completed(&self, _job_id: &str, notes: &[NoteEntry]) {
        self.pb.finish_and_clear();
        eprintln!(
            "  {} Notes generated: {} section(s)",
            self.green.apply_to("✓"),
            notes.len()
        );
    }

    fn on_failed(&self, _job_id: &str, error: &PollError) {
        self.pb.finish_and_clear();
        eprintln!("  {} {error}", self.red.apply_to("✗"));
    }

    fn on_timed_out(&self, _job_id: &str, attempts: u32) {
        self.pb.finish_and_clear();
        eprintln!(
            "  {} PDF processing took too long ({attempts} status checks)",
            self.red.apply_to("✗")
        );
    }
}
