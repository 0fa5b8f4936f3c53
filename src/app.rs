use std::path::PathBuf;

use iced::{event, keyboard, window, Event, Subscription, Task};

use crate::api::{ApiClient, ApiConfig};
use crate::application::{UploadController, UploadCoordinator, UploadEvent};
use crate::domain::{AppError, DownloadArtifact, SelectedFile};
use crate::ui::{UploadMessage, UploadView};

pub struct UploadApp {
    view: UploadView,
    controller: UploadController,
    coordinator: UploadCoordinator,
    // A multi-file drop arrives as one FileDropped per path; only the first is loaded
    pending_load: Option<PathBuf>,
}

impl UploadApp {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            view: UploadView::default(),
            controller: UploadController::new(),
            coordinator: UploadCoordinator::new(ApiClient::new(config)),
            pending_load: None,
        }
    }

    /// Boots the window and probes the service once.
    pub fn boot() -> (Self, Task<Message>) {
        let app = Self::new(ApiConfig::from_env());
        tracing::info!("Using service at {}", app.coordinator.api_client().base_url());

        let api_client = app.coordinator.api_client().clone();
        let probe = Task::perform(
            async move {
                api_client
                    .health()
                    .await
                    .map(|h| format!("Service: {} ({})", h.status, h.service))
                    .map_err(|e| e.to_string())
            },
            Message::HealthChecked,
        );

        (app, probe)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(UploadMessage),
    HealthChecked(Result<String, String>),
    FilePicked(Option<PathBuf>),
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    FileLoaded(Result<SelectedFile, AppError>),
    EnterPressed,
    Upload(UploadEvent),
    /// (Selected path, artifact to write)
    SavePathSelected(Option<PathBuf>, DownloadArtifact),
    ArtifactSaved(Result<PathBuf, AppError>),
}

pub fn update(app: &mut UploadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(&ui_msg);

            match ui_msg {
                UploadMessage::SelectFilePressed => {
                    let coordinator = app.coordinator.clone();
                    return Task::perform(
                        async move { coordinator.pick_file().await },
                        Message::FilePicked,
                    );
                }
                UploadMessage::ProcessPressed => return submit(app),
                UploadMessage::DownloadPressed => return download(app),
                UploadMessage::RemoveFilePressed
                | UploadMessage::NewFilePressed
                | UploadMessage::RetryPressed => app.controller.reset(),
                UploadMessage::CloseErrorPressed => app.controller.dismiss_file_type_error(),
            }
        }
        Message::HealthChecked(result) => match result {
            Ok(status) => app.view.service_status = status,
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                app.view.service_status = "Service unreachable".to_string();
            }
        },
        Message::FilePicked(path) => match path {
            Some(path) => return load(app, path),
            None => tracing::debug!("File dialog cancelled"),
        },
        Message::FileHovered => app.view.drag_hover = true,
        Message::FilesHoveredLeft => app.view.drag_hover = false,
        Message::FileDropped(path) => {
            app.view.drag_hover = false;
            return load(app, path);
        }
        Message::FileLoaded(result) => {
            app.pending_load = None;
            match result {
                Ok(file) => {
                    let name = file.name.clone();
                    match app.controller.select_file(file) {
                        Ok(()) => app.view.status_message = format!("Ready to process {}", name),
                        Err(AppError::Busy) => {
                            tracing::debug!("{} not staged, upload in flight", name);
                        }
                        Err(e) => app.view.status_message = e.to_string(),
                    }
                }
                Err(e) => {
                    tracing::warn!("Could not stage file: {}", e);
                    app.view.status_message = e.to_string();
                }
            }
        }
        Message::EnterPressed => {
            if app.controller.can_submit() {
                return submit(app);
            }
        }
        Message::Upload(event) => {
            match event {
                UploadEvent::Progress(percentage) => app.controller.set_progress(percentage),
                UploadEvent::Completed(bytes) => {
                    app.controller.finish_submit(Ok(bytes));
                    app.view.status_message =
                        "Your documentation is ready to download".to_string();
                }
                UploadEvent::Failed(e) => {
                    app.controller.finish_submit(Err(e));
                    app.view.status_message.clear();
                }
            }
            tracing::debug!(
                phase = ?app.controller.phase(),
                processing = app.controller.is_processing(),
                has_result = app.controller.has_result(),
                "upload event handled"
            );
        }
        Message::SavePathSelected(path, artifact) => match path {
            Some(path) => {
                let coordinator = app.coordinator.clone();
                app.view.status_message = format!("Saving to: {}", path.display());
                return Task::perform(
                    async move { coordinator.save_artifact(&path, artifact.bytes).await },
                    Message::ArtifactSaved,
                );
            }
            None => app.view.status_message = "Download cancelled".to_string(),
        },
        Message::ArtifactSaved(result) => match result {
            Ok(path) => {
                tracing::info!("Saved {}", path.display());
                app.view.status_message = format!("Saved: {}", path.display());
            }
            Err(e) => {
                tracing::error!("{}", e);
                app.view.status_message = format!("Download failed: {}", e);
            }
        },
    }
    Task::none()
}

fn load(app: &mut UploadApp, path: PathBuf) -> Task<Message> {
    if app.controller.is_processing() {
        tracing::debug!("Ignoring {} while an upload is in flight", path.display());
        return Task::none();
    }
    if let Some(pending) = &app.pending_load {
        tracing::debug!(
            "Ignoring {} while {} is loading",
            path.display(),
            pending.display()
        );
        return Task::none();
    }
    app.pending_load = Some(path.clone());

    let coordinator = app.coordinator.clone();
    Task::perform(
        async move { coordinator.load_file(path).await },
        Message::FileLoaded,
    )
}

fn submit(app: &mut UploadApp) -> Task<Message> {
    match app.controller.begin_submit() {
        Some(file) => {
            tracing::info!("Submitting {}", file.name);
            app.view.status_message.clear();
            Task::stream(app.coordinator.upload_stream(file)).map(Message::Upload)
        }
        None => Task::none(),
    }
}

fn download(app: &UploadApp) -> Task<Message> {
    let Some(artifact) = app.controller.prepare_download() else {
        return Task::none();
    };

    let coordinator = app.coordinator.clone();
    Task::perform(
        async move {
            let path = coordinator
                .choose_save_path(artifact.file_name.clone())
                .await;
            (path, artifact)
        },
        |(path, artifact)| Message::SavePathSelected(path, artifact),
    )
}

pub fn view(app: &UploadApp) -> iced::Element<'_, Message> {
    app.view.view(&app.controller).map(Message::UiMessage)
}

pub fn subscription(_app: &UploadApp) -> Subscription<Message> {
    event::listen_with(|event, status, _window| match event {
        Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
        Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(keyboard::key::Named::Enter),
            ..
        }) if status == event::Status::Ignored => Some(Message::EnterPressed),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> UploadApp {
        UploadApp::new(ApiConfig::default())
    }

    #[test]
    fn test_multi_file_drop_keeps_first() {
        let mut app = app();

        let _ = update(&mut app, Message::FileDropped(PathBuf::from("/data/report.pbit")));
        let _ = update(&mut app, Message::FileDropped(PathBuf::from("/data/notes.txt")));
        assert_eq!(app.pending_load, Some(PathBuf::from("/data/report.pbit")));

        let _ = update(
            &mut app,
            Message::FileLoaded(Ok(SelectedFile::from_bytes("report.pbit", vec![1u8; 8]))),
        );
        assert_eq!(app.pending_load, None);
        assert_eq!(app.controller.selected_file().unwrap().name, "report.pbit");
        assert_eq!(app.controller.section(), crate::domain::Section::Upload);

        let _ = update(&mut app, Message::FileDropped(PathBuf::from("/data/next.pbit")));
        assert_eq!(app.pending_load, Some(PathBuf::from("/data/next.pbit")));
    }

    #[test]
    fn test_failed_load_releases_pending_drop() {
        let mut app = app();

        let _ = update(&mut app, Message::FileDropped(PathBuf::from("/data/gone.pbit")));
        let _ = update(
            &mut app,
            Message::FileLoaded(Err(AppError::Io("Failed to open /data/gone.pbit".to_string()))),
        );
        assert_eq!(app.pending_load, None);
        assert!(app.controller.selected_file().is_none());
    }

    #[test]
    fn test_file_loaded_during_upload_is_not_reported_ready() {
        let mut app = app();

        let _ = update(
            &mut app,
            Message::FileLoaded(Ok(SelectedFile::from_bytes("a.pbit", vec![1u8; 8]))),
        );
        assert_eq!(app.view.status_message, "Ready to process a.pbit");

        let _ = update(&mut app, Message::UiMessage(UploadMessage::ProcessPressed));
        assert!(app.controller.is_processing());

        let _ = update(
            &mut app,
            Message::FileLoaded(Ok(SelectedFile::from_bytes("b.pbit", vec![2u8; 8]))),
        );
        assert_eq!(app.controller.selected_file().unwrap().name, "a.pbit");
        assert_ne!(app.view.status_message, "Ready to process b.pbit");
    }
}
