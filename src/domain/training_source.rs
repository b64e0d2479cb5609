use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::DocumentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainingSourceKind {
    Document,
    Website,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSource {
    pub document_id: DocumentId,
    pub kind: TrainingSourceKind,
    /// Filename for uploads, start URL for websites.
    pub name: String,
    pub status: TrainingStatus,
    pub chunk_count: u64,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrainingSource {
    pub fn pending(document_id: DocumentId, kind: TrainingSourceKind, name: String) -> Self {
        Self {
            document_id,
            kind,
            name,
            status: TrainingStatus::Pending,
            chunk_count: 0,
            error_message: None,
            created_at: Utc::now(),
        }
    }
}

impl TrainingSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingSourceKind::Document => "DOCUMENT",
            TrainingSourceKind::Website => "WEBSITE",
        }
    }
}

impl FromStr for TrainingSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DOCUMENT" => Ok(TrainingSourceKind::Document),
            "WEBSITE" => Ok(TrainingSourceKind::Website),
            _ => Err(format!("Invalid training source kind: {}", s)),
        }
    }
}

impl TrainingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::Pending => "PENDING",
            TrainingStatus::Processing => "PROCESSING",
            TrainingStatus::Completed => "COMPLETED",
            TrainingStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for TrainingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TrainingStatus::Pending),
            "PROCESSING" => Ok(TrainingStatus::Processing),
            "COMPLETED" => Ok(TrainingStatus::Completed),
            "FAILED" => Ok(TrainingStatus::Failed),
            _ => Err(format!("Invalid training status: {}", s)),
        }
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
