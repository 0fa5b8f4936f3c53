pub mod upload_controller;
pub mod upload_coordinator;

pub use upload_controller::UploadController;
pub use upload_coordinator::{UploadCoordinator, UploadEvent};
