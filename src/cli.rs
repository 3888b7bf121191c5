//! Interface de linha de comando do pdfnotes baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (upload, resume,
//! status, clear) e flags globais (--api-url, --max-attempts, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pdfnotes: gera notas de estudo a partir de PDFs.
#[derive(Debug, Parser)]
#[command(name = "pdfnotes", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// URL base do serviço de notas (sobrepõe pdfnotes.toml e PDFNOTES_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Número máximo de consultas de status antes do timeout.
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Envia um PDF e acompanha a geração das notas.
    Upload {
        /// Caminho do arquivo PDF.
        file: PathBuf,

        /// Grava as notas geradas como JSON neste arquivo em vez de imprimir.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Retoma o acompanhamento de um job interrompido.
    Resume {
        /// Grava as notas geradas como JSON neste arquivo em vez de imprimir.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Mostra o job persistido e consulta o status atual no servidor.
    Status,

    /// Esquece o job persistido sem contatar o servidor.
    Clear,
}
