//! Upload area: drop target and click-to-pick prompt, preview, loading and
//! the error banner.

use super::{ACCENT, ACCENT_HOVER, UiApp};
use eframe::egui;

const PREVIEW_MAX: egui::Vec2 = egui::vec2(420.0, 320.0);

impl UiApp {
    pub(super) fn render_upload_panel(&mut self, ui: &mut egui::Ui) {
        if self.controller.showing_prompt() {
            self.render_prompt(ui);
        } else {
            self.render_preview(ui);
        }

        if self.controller.is_loading() {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(self.tr("분석 중입니다...", "Analyzing..."));
            });
        }

        if let Some(failure) = self.controller.failure() {
            let text = self.failure_text(failure);
            ui.add_space(8.0);
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(0xfd, 0xec, 0xea))
                .corner_radius(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(0xc0, 0x39, 0x2b), text);
                });
        }
    }

    fn render_prompt(&mut self, ui: &mut egui::Ui) {
        let stroke_color = if self.drag_hover { ACCENT_HOVER } else { ACCENT };
        let title = self.tr(
            "이미지를 클릭하거나 끌어다 놓으세요",
            "Click or drop an image here",
        );
        let hint = self.tr(
            "PNG, JPG 등 이미지 파일 (최대 10MB)",
            "PNG, JPG or other images (max 10MB)",
        );
        let frame = egui::Frame::new()
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(16, 48))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("📷").size(40.0));
                    ui.label(egui::RichText::new(title).strong().size(18.0));
                    ui.label(hint);
                });
            });
        let resp = frame
            .response
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand);
        if resp.clicked() && !self.controller.is_loading() {
            self.pick_file();
        }
    }

    fn render_preview(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            match &self.preview_tex {
                Some(tex) => {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::from_handle(tex))
                            .max_size(PREVIEW_MAX)
                            .corner_radius(8.0),
                    );
                }
                None => {
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(PREVIEW_MAX.x, 120.0),
                        egui::Sense::hover(),
                    );
                    ui.painter()
                        .rect_filled(rect, 8.0, egui::Color32::from_gray(40));
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        self.tr("미리보기를 표시할 수 없습니다", "No preview available"),
                        egui::FontId::proportional(14.0),
                        egui::Color32::LIGHT_GRAY,
                    );
                }
            }
            if let Some(file) = self.controller.selected() {
                ui.small(format!("{} ({:.1} KB)", file.name, file.size() as f64 / 1024.0));
            }
            ui.add_space(4.0);
            if ui.button(self.tr("✕ 이미지 제거", "✕ Remove image")).clicked() {
                self.controller.remove();
            }
        });
    }
}
