//! Settings panel rendering for language, server address and versions.

use super::{Panel, UiApp};
use crate::i18n::Language;
use eframe::egui;
use paw_core::LanguagePreference;

impl UiApp {
    /// Renders the settings screen. Changes to the server address only take
    /// effect after "Apply".
    pub(super) fn render_settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.tr("설정", "Settings"));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label(self.tr("언어", "Language"));
            let mut selected = self.config.language;
            let option_label = |lang: LanguagePreference| match (self.language, lang) {
                (Language::Korean, LanguagePreference::System) => "시스템 (자동)",
                (Language::English, LanguagePreference::System) => "System (auto)",
                (Language::Korean, LanguagePreference::Korean) => "한국어",
                (Language::English, LanguagePreference::Korean) => "Korean",
                (Language::Korean, LanguagePreference::English) => "영어",
                (Language::English, LanguagePreference::English) => "English",
            };
            egui::ComboBox::from_id_salt("language-select")
                .selected_text(option_label(selected))
                .show_ui(ui, |ui| {
                    for pref in [
                        LanguagePreference::System,
                        LanguagePreference::Korean,
                        LanguagePreference::English,
                    ] {
                        ui.selectable_value(&mut selected, pref, option_label(pref));
                    }
                });
            if selected != self.config.language {
                self.config.language = selected;
                self.language = Language::resolve(selected);
                self.save_config();
            }
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(self.tr("서버 주소", "Server address"));
            ui.text_edit_singleline(&mut self.pending_server_url);
        });
        ui.horizontal(|ui| {
            ui.label(self.tr("제한 시간 (초)", "Timeout (seconds)"));
            ui.add(
                egui::DragValue::new(&mut self.pending_timeout)
                    .range(1..=600)
                    .speed(1),
            );
        });
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let changed = self.pending_server_url.trim() != self.config.server_url
                || self.pending_timeout != self.config.timeout_secs;
            if ui
                .add_enabled(
                    changed && !self.pending_server_url.trim().is_empty(),
                    egui::Button::new(self.tr("적용", "Apply")),
                )
                .clicked()
            {
                self.config.server_url = self.pending_server_url.trim().to_string();
                self.config.server_override = None;
                self.config.timeout_secs = self.pending_timeout;
                self.save_config();
                self.apply_config();
                self.panel = Panel::Analyze;
            }
            if ui
                .add_enabled(
                    self.health_rx.is_none(),
                    egui::Button::new(self.tr("연결 확인", "Test connection")),
                )
                .clicked()
            {
                self.start_health_check();
            }
        });
        ui.small(format!(
            "{}: {}",
            self.tr("예측 엔드포인트", "Prediction endpoint"),
            self.config.predict_url()
        ));

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(6.0);
        ui.heading(self.tr("버전", "Versions"));
        ui.label(format!(
            "{}: {}",
            self.tr("앱 버전", "App version"),
            self.app_version
        ));
    }

    fn save_config(&mut self) {
        match self.config.save() {
            Ok(path) => {
                tracing::info!("Saved config to {}", path.display());
                self.status = self.tr("설정을 저장했습니다.", "Settings saved.").to_string();
            }
            Err(e) => {
                tracing::warn!("Saving config failed: {e:#}");
                self.status = format!("{}: {e}", self.tr("설정 저장 실패", "Saving settings failed"));
            }
        }
    }
}
