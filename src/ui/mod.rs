use iced::{
    widget::{button, column, container, progress_bar, row, text, Column, Space},
    Alignment, Element, Length,
};

use crate::{
    application::{upload_controller::COMPLETE_PROGRESS, UploadController},
    domain::{ProgressPhase, Section},
    utils::format_file_size,
};

/// View-only state; everything about the upload itself lives in the controller
pub struct UploadView {
    pub status_message: String,
    pub service_status: String,
    pub drag_hover: bool,
}

impl Default for UploadView {
    fn default() -> Self {
        Self {
            status_message: "Select or drop a .pbit file to begin".to_string(),
            service_status: "Checking service...".to_string(),
            drag_hover: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum UploadMessage {
    SelectFilePressed,
    RemoveFilePressed,
    ProcessPressed,
    DownloadPressed,
    NewFilePressed,
    RetryPressed,
    CloseErrorPressed,
}

impl UploadView {
    pub fn update(&mut self, message: &UploadMessage) {
        match message {
            UploadMessage::RemoveFilePressed
            | UploadMessage::NewFilePressed
            | UploadMessage::RetryPressed => {
                self.status_message = "Select or drop a .pbit file to begin".to_string();
            }
            UploadMessage::CloseErrorPressed => {
                self.status_message.clear();
            }
            // Will be handled by the app
            UploadMessage::SelectFilePressed
            | UploadMessage::ProcessPressed
            | UploadMessage::DownloadPressed => {}
        }
    }

    pub fn view<'a>(&'a self, controller: &'a UploadController) -> Element<'a, UploadMessage> {
        let section = match controller.section() {
            Section::Upload => self.upload_section(controller),
            Section::Progress => progress_section(controller),
            Section::Result => result_section(),
            Section::Error => error_section(controller),
            Section::FileTypeError => file_type_error_section(),
        };

        column![
            text("Power BI Documenter").size(32),
            text("Turn a .pbit template into a PDF data model report").size(14),
            Space::new().height(Length::Fixed(20.0)),
            section,
            Space::new().height(Length::Fixed(20.0)),
            text(&self.status_message).size(14),
            text(&self.service_status).size(12),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }

    fn upload_section<'a>(&'a self, controller: &'a UploadController) -> Element<'a, UploadMessage> {
        let prompt = if self.drag_hover {
            "Release to select the file"
        } else {
            "Drag and drop a .pbit file here"
        };

        let drop_area = container(
            column![
                text(prompt).size(18),
                text("or").size(14),
                button("Select file")
                    .on_press(UploadMessage::SelectFilePressed)
                    .padding([10, 20]),
            ]
            .spacing(10)
            .align_x(Alignment::Center),
        )
        .padding(30)
        .width(Length::Fill)
        .align_x(Alignment::Center)
        .style(if self.drag_hover {
            container::bordered_box
        } else {
            container::rounded_box
        });

        let mut content: Column<'a, UploadMessage> = column![drop_area].spacing(15);

        if let Some(file) = controller.selected_file() {
            content = content.push(
                row![
                    text(&file.name).size(16),
                    text(format_file_size(file.size)).size(14),
                    button("Remove")
                        .on_press(UploadMessage::RemoveFilePressed)
                        .style(button::danger),
                ]
                .spacing(15)
                .align_y(Alignment::Center),
            );
        }

        content
            .push(
                button("Generate documentation")
                    .on_press_maybe(controller.can_submit().then_some(UploadMessage::ProcessPressed))
                    .padding([10, 20]),
            )
            .into()
    }
}

fn progress_section(controller: &UploadController) -> Element<'_, UploadMessage> {
    column![
        progress_bar(0.0..=COMPLETE_PROGRESS, controller.progress()),
        text(ProgressPhase::from_percentage(controller.progress()).label()).size(16),
    ]
    .spacing(10)
    .into()
}

fn result_section<'a>() -> Element<'a, UploadMessage> {
    column![
        text("Documentation ready!").size(20),
        row![
            button("Download PDF")
                .on_press(UploadMessage::DownloadPressed)
                .padding([10, 20]),
            button("Process another file")
                .on_press(UploadMessage::NewFilePressed)
                .style(button::secondary)
                .padding([10, 20]),
        ]
        .spacing(10),
    ]
    .spacing(15)
    .into()
}

fn error_section(controller: &UploadController) -> Element<'_, UploadMessage> {
    let message = controller
        .error_message()
        .unwrap_or_else(|| "An error occurred while processing your file.".to_string());

    column![
        text("Processing failed").size(20),
        text(message).size(14),
        button("Try again")
            .on_press(UploadMessage::RetryPressed)
            .padding([10, 20]),
    ]
    .spacing(15)
    .into()
}

fn file_type_error_section<'a>() -> Element<'a, UploadMessage> {
    column![
        text("Invalid file type").size(20),
        text("Only Power BI template files (.pbit) are accepted.").size(14),
        button("Close")
            .on_press(UploadMessage::CloseErrorPressed)
            .padding([10, 20]),
    ]
    .spacing(15)
    .into()
}
