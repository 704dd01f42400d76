//! Application entry point: Panya PLCnext chat.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk; on first run, write the defaults out.
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the HTTP transport from `[server]`.
//! 5. Create the request / event channels.
//! 6. Spawn the request runner on the tokio runtime.
//! 7. Run [`eframe::run_native`]; blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;

use panya_chat::{
    app::PanyaApp,
    config::{AppConfig, AppPaths},
    session::{RequestRunner, RunnerEvent},
    transport::{ChatRequest, ChatTransport, HttpTransport},
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_title(config.ui.title.clone())
        .with_inner_size([width, height])
        .with_min_inner_size([420.0, 480.0])
        .with_drag_and_drop(true);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Panya chat starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let paths = AppPaths::new();
    if !paths.settings_file.exists() {
        // First run: write the defaults out so there is a file to edit.
        match config.save() {
            Ok(()) => log::info!("Wrote default settings to {}", paths.settings_file.display()),
            Err(e) => log::warn!("Could not write default settings: {e}"),
        }
    }
    log::info!("Backend: {}", config.server.base_url);

    // 3. Tokio runtime (2 worker threads: a chat reply and a transcription
    //    can be in flight together)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Transport
    let transport: Arc<dyn ChatTransport> = Arc::new(HttpTransport::from_config(&config.server));

    // 5. Channel setup
    let (request_tx, request_rx) = mpsc::channel::<ChatRequest>(8);
    let (event_tx, event_rx) = mpsc::channel::<RunnerEvent>(16);

    // 6. Request runner
    rt.spawn(RequestRunner::new(transport).run(request_rx, event_tx));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let options = native_options(&config);
    let title = config.ui.title.clone();

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(PanyaApp::new(cc, config, paths, request_tx, event_rx)))),
    )
}
