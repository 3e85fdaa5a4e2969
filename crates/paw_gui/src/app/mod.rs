//! Main window: navigation, drop handling and the per-frame controller poll.

mod result;
mod settings;
mod upload;

use crate::i18n::Language;
use eframe::{App, Frame, egui};
use paw_core::{
    ClientConfig, Failure, FileSource, HealthStatus, PredictClient, PredictError, UploadController,
    UploadError,
};
use paw_core::upload::declared_media_type;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x66, 0x7e, 0xea);
const ACCENT_HOVER: egui::Color32 = egui::Color32::from_rgb(0x76, 0x4b, 0xa2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Analyze,
    Settings,
}

pub struct UiApp {
    controller: UploadController,
    config: ClientConfig,
    language: Language,
    panel: Panel,
    status: String,
    preview_tex: Option<egui::TextureHandle>,
    // Selection the texture was built from.
    preview_key: Option<u64>,
    drag_hover: bool,
    pending_server_url: String,
    pending_timeout: u64,
    health_rx: Option<Receiver<Result<HealthStatus, PredictError>>>,
    app_version: &'static str,
}

impl UiApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: ClientConfig,
    ) -> Result<Self, PredictError> {
        let classifier = Arc::new(PredictClient::new(&config)?);
        let mut app = Self {
            controller: UploadController::new(classifier),
            language: Language::resolve(config.language),
            pending_server_url: config.server_url.clone(),
            pending_timeout: config.timeout_secs,
            config,
            panel: Panel::Analyze,
            status: String::new(),
            preview_tex: None,
            preview_key: None,
            drag_hover: false,
            health_rx: None,
            app_version: env!("PAWPH_VERSION"),
        };
        app.start_health_check();
        Ok(app)
    }

    pub(crate) fn tr(&self, ko: &'static str, en: &'static str) -> &'static str {
        self.language.pick(ko, en)
    }

    fn pick_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter(
                self.tr("이미지", "Images"),
                &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff"],
            )
            .pick_file()
        else {
            return;
        };
        self.accept_path(&path, FileSource::Picker);
    }

    fn accept_path(&mut self, path: &Path, source: FileSource) {
        if self.controller.accept_path(path, source) {
            self.status.clear();
        }
    }

    /// Takes the first dropped file; the rest of a multi-file drop is ignored.
    fn handle_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.first().cloned(),
            )
        });
        self.drag_hover = hovering;
        let Some(file) = dropped else {
            return;
        };
        self.panel = Panel::Analyze;
        let mime = Some(file.mime.clone()).filter(|m| !m.is_empty());
        match (file.path, file.bytes) {
            (Some(path), _) => self.accept_path(&path, FileSource::Drop),
            (None, Some(bytes)) => {
                let mime = mime.or_else(|| declared_media_type(Path::new(&file.name)));
                self.controller
                    .accept_bytes(&file.name, mime, bytes, FileSource::Drop);
            }
            (None, None) => self.controller.reject(
                UploadError::NotAnImage { media_type: mime },
                FileSource::Drop,
            ),
        }
    }

    /// Uploads the decoded preview once per selection.
    fn sync_preview_texture(&mut self, ctx: &egui::Context) {
        let key = self.controller.selection_id();
        if key == self.preview_key {
            return;
        }
        self.preview_key = key;
        self.preview_tex = self.controller.preview().map(|p| {
            let color = egui::ColorImage::from_rgba_unmultiplied(
                [p.width as usize, p.height as usize],
                &p.rgba,
            );
            ctx.load_texture("preview", color, egui::TextureOptions::LINEAR)
        });
    }

    fn failure_text(&self, failure: &Failure) -> String {
        match self.language {
            Language::Korean => failure.banner(),
            Language::English => failure.banner_en(),
        }
    }

    /// Rebuilds the HTTP client after the server settings changed.
    fn apply_config(&mut self) {
        match PredictClient::new(&self.config) {
            Ok(client) => {
                self.controller.set_classifier(Arc::new(client));
                self.start_health_check();
            }
            Err(e) => {
                tracing::error!("HTTP client setup failed: {e}");
                self.status = format!("❌ {e}");
            }
        }
    }

    fn start_health_check(&mut self) {
        let client = match PredictClient::new(&self.config) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Health check skipped: {e}");
                return;
            }
        };
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(client.health());
        });
        self.health_rx = Some(rx);
        self.status = self
            .tr("서버 상태 확인 중...", "Checking server...")
            .to_string();
    }

    fn poll_health(&mut self) {
        let Some(rx) = &self.health_rx else {
            return;
        };
        let reply = match rx.try_recv() {
            Ok(reply) => reply,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                self.health_rx = None;
                return;
            }
        };
        self.health_rx = None;
        self.status = match reply {
            Ok(h) if h.is_healthy() => {
                tracing::info!("Server healthy: {}", h.message);
                self.tr("서버 연결됨", "Server online").to_string()
            }
            Ok(h) => format!("{}: {}", self.tr("서버 상태", "Server status"), h.status),
            Err(e) => {
                tracing::warn!("Health check failed: {e}");
                self.tr("서버에 연결할 수 없습니다", "Server unreachable")
                    .to_string()
            }
        };
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.handle_drops(ctx);
        self.controller.poll();
        self.poll_health();
        self.sync_preview_texture(ctx);
        if self.controller.is_loading() || self.health_rx.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            let analyze = self.tr("분석", "Analyze");
            let settings = self.tr("설정", "Settings");
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.panel, Panel::Analyze, analyze);
                ui.selectable_value(&mut self.panel, Panel::Settings, settings);
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.panel {
            Panel::Analyze => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui.heading(self.tr("🐶 강아지 소변 pH 분석", "🐶 Dog urine pH analysis"));
                        ui.add_space(8.0);
                        self.render_upload_panel(ui);
                        self.render_result_panel(ui);
                    });
            }
            Panel::Settings => self.render_settings_panel(ui),
        });
    }
}
