mod app;
mod i18n;

use anyhow::{Context, anyhow};
use app::UiApp;
use eframe::{NativeOptions, egui};
use paw_core::ClientConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::load();
    tracing::info!(
        "PawPh {} using {}",
        env!("PAWPH_VERSION"),
        config.predict_url()
    );

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 900.0])
            .with_min_inner_size([480.0, 560.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    // eframe::Error is not Send + Sync on every backend, so keep only its text.
    eframe::run_native(
        "강아지 소변 pH 분석",
        options,
        Box::new(|cc| Ok(Box::new(UiApp::new(cc, config)?))),
    )
    .map_err(|e| anyhow!("{e}"))
    .context("애플리케이션이 오류로 종료되었습니다")
}
