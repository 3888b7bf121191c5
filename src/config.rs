//! Configuração do pdfnotes carregada a partir de `pdfnotes.toml`.
//!
//! A struct [`NotesConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `PDFNOTES_API_URL` tem precedência sobre o arquivo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_API_URL;
use crate::poller::PollSettings;

pub const CONFIG_FILE: &str = "pdfnotes.toml";

/// Configuração de nível superior carregada de `pdfnotes.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotesConfig {
    /// URL base do serviço de geração de notas.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Intervalo entre consultas de status, em segundos.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Máximo de consultas antes de declarar timeout.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Falhas de transporte consecutivas toleradas durante o polling.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// Timeout de cada requisição HTTP, em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Diretório onde o handle do job ativo é persistido.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

// Valor padrão para a URL da API: servidor local na porta 8000.
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

// Valor padrão para o intervalo de polling: 5s.
fn default_poll_interval_secs() -> u64 {
    5
}

// 60 consultas de 5s: cinco minutos.
fn default_max_attempts() -> u32 {
    60
}

fn default_max_consecutive_failures() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".pdfnotes")
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_interval_secs: default_poll_interval_secs(),
            max_attempts: default_max_attempts(),
            max_consecutive_failures: default_max_consecutive_failures(),
            request_timeout_secs: default_request_timeout_secs(),
            state_dir: default_state_dir(),
        }
    }
}

impl NotesConfig {
    /// Carrega a configuração de `pdfnotes.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;

        // Variável de ambiente tem precedência sobre o arquivo de configuração.
        if let Ok(url) = std::env::var("PDFNOTES_API_URL")
            && !url.is_empty()
        {
            config.api_url = url;
        }

        Ok(config)
    }

    /// Carrega de um caminho explícito, sem consultar o ambiente.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str::<NotesConfig>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs),
            max_attempts: self.max_attempts,
            max_consecutive_failures: self.max_consecutive_failures,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = NotesConfig::default();
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.max_attempts, 60);
        assert_eq!(config.max_consecutive_failures, 3);
        assert_eq!(config.state_dir, PathBuf::from(".pdfnotes"));
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_url = "https://notes.example.edu"
            max_attempts = 120
        "#;
        let config: NotesConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_url, "https://notes.example.edu");
        assert_eq!(config.max_attempts, 120);
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn poll_settings_follow_config() {
        let config = NotesConfig {
            poll_interval_secs: 2,
            max_attempts: 10,
            max_consecutive_failures: 1,
            ..Default::default()
        };
        let settings = config.poll_settings();
        assert_eq!(settings.interval, Duration::from_secs(2));
        assert_eq!(settings.max_attempts, 10);
        assert_eq!(settings.max_consecutive_failures, 1);
        assert_eq!(settings.deadline(), Duration::from_secs(20));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "state_dir = \"/tmp/pdfnotes-state\"\npoll_interval_secs = 1\n").unwrap();

        let config = NotesConfig::load_from(&path).unwrap();
        assert_eq!(config.state_dir, PathBuf::from("/tmp/pdfnotes-state"));
        assert_eq!(config.poll_interval_secs, 1);
        assert_eq!(config.max_attempts, 60);
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "max_attempts = \"lots\"").unwrap();
        assert!(NotesConfig::load_from(&path).is_err());
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NotesConfig::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.max_attempts, 60);
    }
}
