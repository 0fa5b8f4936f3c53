use std::path::PathBuf;

use bytes::Bytes;

use super::AppError;

/// Where the bytes of a staged file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Picked from a dialog or dropped on the window; read at upload time.
    Path(PathBuf),
    Memory(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            source: FileSource::Memory(content),
        }
    }

    pub async fn read_contents(&self) -> Result<Bytes, AppError> {
        match &self.source {
            FileSource::Memory(content) => Ok(content.clone()),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FileSelected,
    Uploading,
    Success,
    Failed,
}

/// The one section of the window that is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Upload,
    Progress,
    Result,
    Error,
    FileTypeError,
}

/// Label for a progress percentage. The upload stream reports
/// Preparing, Processing and Done; Finalizing only shows for other
/// `set_progress` values in 60..90.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Preparing,
    Processing,
    Finalizing,
    Done,
}

impl ProgressPhase {
    pub fn from_percentage(percentage: f32) -> Self {
        if percentage < 30.0 {
            ProgressPhase::Preparing
        } else if percentage < 60.0 {
            ProgressPhase::Processing
        } else if percentage < 90.0 {
            ProgressPhase::Finalizing
        } else {
            ProgressPhase::Done
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProgressPhase::Preparing => "Preparing file...",
            ProgressPhase::Processing => "Sending file for processing...",
            ProgressPhase::Finalizing => "Finalizing...",
            ProgressPhase::Done => "Processing complete!",
        }
    }
}

/// A processed result ready to be written under `file_name`.
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub bytes: Bytes,
}
