use bytes::Bytes;

use crate::{
    domain::{AppError, DownloadArtifact, Section, SelectedFile, UploadPhase},
    utils::{download_file_name, has_required_extension},
};

/// Progress shown as soon as a submission starts
pub const SUBMIT_PROGRESS: f32 = 10.0;
/// File read, request in flight
pub const SENDING_PROGRESS: f32 = 40.0;
pub const COMPLETE_PROGRESS: f32 = 100.0;

/// State of the upload widget.
///
/// Every user action goes through one of the methods below; the async work
/// they trigger (reading the file, the HTTP round trip, saving) lives in
/// [`super::UploadCoordinator`] and reports back via [`Self::finish_submit`].
#[derive(Debug)]
pub struct UploadController {
    selected: Option<SelectedFile>,
    processing: bool,
    result: Option<Bytes>,
    phase: UploadPhase,
    error: Option<AppError>,
    file_type_error: bool,
    progress: f32,
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadController {
    pub fn new() -> Self {
        Self {
            selected: None,
            processing: false,
            result: None,
            phase: UploadPhase::Idle,
            error: None,
            file_type_error: false,
            progress: 0.0,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    pub fn section(&self) -> Section {
        if self.file_type_error {
            return Section::FileTypeError;
        }
        match self.phase {
            UploadPhase::Idle | UploadPhase::FileSelected => Section::Upload,
            UploadPhase::Uploading => Section::Progress,
            UploadPhase::Success => Section::Result,
            UploadPhase::Failed => Section::Error,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.processing && self.phase == UploadPhase::FileSelected
    }

    /// Stages `file` if its name carries the `.pbit` extension.
    ///
    /// A rejected file raises the file type overlay and leaves whatever was
    /// staged before untouched. While a request is in flight nothing is
    /// staged and [`AppError::Busy`] is returned.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), AppError> {
        if self.processing {
            tracing::debug!("Ignoring {} while an upload is in flight", file.name);
            return Err(AppError::Busy);
        }

        if !has_required_extension(&file.name) {
            tracing::info!("Rejected {}: wrong file type", file.name);
            self.file_type_error = true;
            return Err(AppError::InvalidFileType(file.name));
        }

        tracing::info!("Staged {} ({} bytes)", file.name, file.size);
        self.selected = Some(file);
        self.result = None;
        self.error = None;
        self.progress = 0.0;
        self.file_type_error = false;
        self.phase = UploadPhase::FileSelected;
        Ok(())
    }

    pub fn dismiss_file_type_error(&mut self) {
        self.file_type_error = false;
    }

    /// Starts a submission. Returns the file to upload, or `None` when
    /// nothing is staged or a request is already in flight.
    pub fn begin_submit(&mut self) -> Option<SelectedFile> {
        if !self.can_submit() {
            return None;
        }

        let file = self.selected.clone()?;
        self.processing = true;
        self.file_type_error = false;
        self.phase = UploadPhase::Uploading;
        self.progress = SUBMIT_PROGRESS;
        Some(file)
    }

    pub fn set_progress(&mut self, percentage: f32) {
        if self.phase == UploadPhase::Uploading {
            self.progress = percentage.clamp(0.0, COMPLETE_PROGRESS);
        }
    }

    /// Settles the in-flight submission. The processing flag is cleared
    /// whatever the outcome.
    pub fn finish_submit(&mut self, outcome: Result<Bytes, AppError>) {
        if self.phase != UploadPhase::Uploading {
            tracing::debug!("Dropping stale upload outcome in phase {:?}", self.phase);
            return;
        }

        self.processing = false;
        match outcome {
            Ok(bytes) => {
                tracing::info!("Received processed result ({} bytes)", bytes.len());
                self.result = Some(bytes);
                self.error = None;
                self.progress = COMPLETE_PROGRESS;
                self.phase = UploadPhase::Success;
            }
            Err(e) => {
                tracing::warn!("Upload failed: {}", e);
                self.error = Some(e);
                self.phase = UploadPhase::Failed;
            }
        }
    }

    /// The processed result paired with its download name. May be called
    /// any number of times; the bytes are shared, not re-fetched.
    pub fn prepare_download(&self) -> Option<DownloadArtifact> {
        match (&self.selected, &self.result) {
            (Some(file), Some(bytes)) => Some(DownloadArtifact {
                file_name: download_file_name(&file.name),
                bytes: bytes.clone(),
            }),
            _ => {
                tracing::error!("No file or processed result available");
                None
            }
        }
    }

    /// Back to an empty upload section. Used by remove, new file and retry.
    pub fn reset(&mut self) {
        self.selected = None;
        self.processing = false;
        self.result = None;
        self.error = None;
        self.file_type_error = false;
        self.progress = 0.0;
        self.phase = UploadPhase::Idle;
    }
}
