// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod badge_cache;
mod config;
mod ra_api;
mod ui;

use app::BadgewatchApp;
use badge_cache::HttpBadgeSource;
use badgewatch_core::{window_size, BadgewatchError, Result};
use config::Config;
use eframe::egui;
use ra_api::RaClient;
use std::fmt::Display;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Credentials may come from a .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "badgewatch=info,badgewatch_desktop=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config().unwrap_or_else(|e| fatal(e));
    let icon = load_icon().unwrap_or_else(|e| fatal(e));
    let client = RaClient::new(&config.connect.api_key).unwrap_or_else(|e| fatal(e));

    let (width, height) = window_size(
        0,
        config.display.achievements_per_row,
        config.display.cell_size(),
    );
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(ui::WINDOW_TITLE)
            .with_inner_size([width, height])
            .with_icon(icon),
        ..Default::default()
    };

    tracing::info!(
        "Watching {} (refresh every {}s)",
        config.connect.username,
        config.connect.refresh_interval
    );

    eframe::run_native(
        ui::WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(BadgewatchApp::new(
                config,
                client,
                Arc::new(HttpBadgeSource::new()),
            )))
        }),
    )
}

fn load_config() -> Result<Config> {
    let path = Config::path_from_args();
    let mut config = Config::load(&path)?;
    config.apply_env_overrides();
    let config = config.normalized();
    config.validate()?;
    Ok(config)
}

fn load_icon() -> Result<egui::IconData> {
    let icon_data = include_bytes!("../../../assets/icon.png");
    let icon_image = image::load_from_memory(icon_data)
        .map_err(|e| BadgewatchError::Asset(format!("error decoding icon.png: {}", e)))?;
    let icon_rgba = icon_image.to_rgba8();
    let (width, height) = icon_rgba.dimensions();
    Ok(egui::IconData {
        rgba: icon_rgba.into_raw(),
        width,
        height,
    })
}

/// Startup failures end the process before the window opens
fn fatal(err: impl Display) -> ! {
    tracing::error!("{}", err);
    std::process::exit(1);
}
