// Release builds are GUI-subsystem binaries on Windows; debug builds keep the
// console so startup errors and --log-stderr output stay visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use uuid::Uuid;

use app::PixelScribeApp;
use pixelscribe::cli::CliArgs;
use pixelscribe::logger::Logger;
use pixelscribe::session::EditorSession;
use pixelscribe::{log_err, log_info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match args.session_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Session log (overwrites the previous session's log)
    let session_id = Uuid::new_v4();
    let logger = Logger::session(args.level(), args.log_stderr, &session_id.to_string());
    logger.install_panic_hook();

    let session = match EditorSession::with_id(session_id, config, logger.clone()) {
        Ok(session) => session,
        Err(e) => {
            log_err!(logger, "failed to create session: {}", e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title("Pixel Scribe"),
        ..Default::default()
    };

    log_info!(logger, "Starting PixelScribe application (log level {})", logger.level());
    let app_logger = logger.clone();
    let result = eframe::run_native(
        "PixelScribe",
        options,
        Box::new(move |cc| Box::new(PixelScribeApp::new(cc, session, app_logger))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!(logger, "window error: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
