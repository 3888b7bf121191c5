//! Tipos de dados trocados com o serviço de geração de notas.
//!
//! Os nomes dos campos seguem o JSON do servidor (`task_id`, `Topic`,
//! `Sub_topic`) via `serde(rename)`; o restante do crate só enxerga os
//! tipos normalizados de [`crate::notes`].

use serde::{Deserialize, Serialize};

use crate::notes::NoteEntry;

/// Server-side status of a notes-generation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Processing => write!(f, "processing"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Body returned by both the submission and the status endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<NotesData>,
}

/// Generated notes as the server lays them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotesData {
    #[serde(rename = "Topic", default)]
    pub topics: Vec<TopicSummary>,
}

/// One `{ Sub_topic, summary }` record inside [`NotesData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    #[serde(rename = "Sub_topic")]
    pub sub_topic: String,
    pub summary: String,
}

impl NotesData {
    /// Flatten the server payload into the records handed to callers.
    pub fn into_entries(self) -> Vec<NoteEntry> {
        self.topics
            .into_iter()
            .map(|t| NoteEntry {
                sub_topic: t.sub_topic,
                summary: t.summary,
            })
            .collect()
    }
}
