mod api;
mod app;
mod application;
mod config;
mod domain;
mod ui;
mod utils;

use iced::window;
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("simple_video_downloader=info")),
        )
        .init();

    let settings = config::Settings::load();

    iced::application(
        move || app::DownloadApp::new(settings.clone()),
        app::update,
        app::view,
    )
    .title("Simple Video Downloader")
    .subscription(app::subscription)
    .window(window::Settings {
        // close requests first cancel the active download
        exit_on_close_request: false,
        ..Default::default()
    })
    .run()
}
