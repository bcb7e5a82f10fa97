use std::path::Path;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Legal,
    NoGo,
}

impl Slot {
    pub fn label(self) -> &'static str {
        match self {
            Slot::Legal => "Legal boundary",
            Slot::NoGo => "No-go zone",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{name} is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub document: Value,
}

/// Holds the two user-supplied GeoJSON documents until a job is submitted.
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    legal: Option<UploadedDocument>,
    nogo: Option<UploadedDocument>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `bytes` as JSON and store it in `slot`. A parse failure clears
    /// the slot so a stale document is never submitted.
    pub fn set_document(
        &mut self,
        slot: Slot,
        file_name: impl Into<String>,
        bytes: &[u8],
    ) -> Result<(), UploadError> {
        let file_name = file_name.into();
        let parsed = serde_json::from_slice::<Value>(bytes);
        let entry = self.slot_mut(slot);
        match parsed {
            Ok(document) => {
                tracing::debug!("{} loaded from {}", slot.label(), file_name);
                *entry = Some(UploadedDocument {
                    file_name,
                    document,
                });
                Ok(())
            }
            Err(source) => {
                *entry = None;
                Err(UploadError::Parse {
                    name: file_name,
                    source,
                })
            }
        }
    }

    pub async fn load_path(&mut self, slot: Slot, path: &Path) -> Result<(), UploadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
            name: name.clone(),
            source,
        })?;
        self.set_document(slot, name, &bytes)
    }

    pub fn get(&self, slot: Slot) -> Option<&UploadedDocument> {
        match slot {
            Slot::Legal => self.legal.as_ref(),
            Slot::NoGo => self.nogo.as_ref(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.legal.is_some() && self.nogo.is_some()
    }

    /// Both documents, once both slots are filled.
    pub fn documents(&self) -> Option<(&Value, &Value)> {
        match (&self.legal, &self.nogo) {
            (Some(legal), Some(nogo)) => Some((&legal.document, &nogo.document)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<UploadedDocument> {
        match slot {
            Slot::Legal => &mut self.legal,
            Slot::NoGo => &mut self.nogo,
        }
    }
}
