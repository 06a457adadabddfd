//! Ticket ingestion and storage.
//!
//! Tickets are immutable once ingested. The store is append-only with
//! auto-incrementing ids and is backed by a JSON file so the external
//! ticket simulator and the pipeline share one source of truth.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{TriageError, TriageResult};

/// A single support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Stable identifier assigned by the store. The legacy simulator
    /// writes this key as `ticket_id`.
    #[serde(alias = "ticket_id")]
    pub id: u64,
    /// Merchant that filed the ticket.
    pub merchant_id: u64,
    /// Raw support message text.
    pub message: String,
}

/// Append-only, file-backed ticket store.
#[derive(Debug, Clone)]
pub struct TicketStore {
    path: PathBuf,
    tickets: Vec<Ticket>,
}

impl TicketStore {
    /// Load the store from a JSON file. A missing file is fatal — tickets
    /// are the primary input and there is nothing to analyze without them.
    pub fn load(path: impl AsRef<Path>) -> TriageResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TriageError::MissingResource(format!(
                "ticket source {} not found",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)?;
        let tickets: Vec<Ticket> = serde_json::from_str(&raw)
            .map_err(|e| TriageError::MalformedInput(format!("ticket file: {e}")))?;

        info!(count = tickets.len(), path = %path.display(), "loaded tickets");

        Ok(Self {
            path: path.to_path_buf(),
            tickets,
        })
    }

    /// Create an empty in-memory store that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tickets: Vec::new(),
        }
    }

    /// Append a new ticket, assigning the next id.
    pub fn append(&mut self, merchant_id: u64, message: impl Into<String>) -> u64 {
        let id = self.tickets.len() as u64 + 1;
        self.tickets.push(Ticket {
            id,
            merchant_id,
            message: message.into(),
        });
        id
    }

    /// Persist the current contents back to the backing file.
    pub fn save(&self) -> TriageResult<()> {
        let json = serde_json::to_string_pretty(&self.tickets)?;
        std::fs::write(&self.path, json).map_err(|source| TriageError::Persistence {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// All tickets, in ingestion order.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Consume the store, yielding the ticket snapshot for one run.
    pub fn into_tickets(self) -> Vec<Ticket> {
        self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
