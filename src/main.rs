mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pbit_uploader=debug"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    iced::application(app::UploadApp::boot, app::update, app::view)
        .title("Power BI Documenter")
        .subscription(app::subscription)
        .window_size((560.0, 520.0))
        .run()
}
