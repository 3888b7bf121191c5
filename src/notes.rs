//! Notas normalizadas entregues ao chamador quando um job termina.
//!
//! [`NoteEntry`] é o registro `{ subTopic, summary }` produzido a partir da
//! resposta do servidor; [`GeneratedNote`] agrupa esses registros sob um
//! título, no formato que o app de notas espera.

use serde::{Deserialize, Serialize};

pub const GENERATED_NOTE_TITLE: &str = "PDF Generated Notes";

/// One sub-topic and its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEntry {
    pub sub_topic: String,
    pub summary: String,
}

/// A titled note built from the entries of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNote {
    pub title: String,
    pub sub_notes: Vec<NoteEntry>,
}

impl GeneratedNote {
    pub fn from_entries(entries: Vec<NoteEntry>) -> Self {
        Self {
            title: GENERATED_NOTE_TITLE.to_string(),
            sub_notes: entries,
        }
    }

    /// Render as Markdown: the title as a heading, one section per sub-topic.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n", self.title);
        for entry in &self.sub_notes {
            out.push_str(&format!("\n## {}\n\n{}\n", entry.sub_topic, entry.summary.trim()));
        }
        out
    }
}
