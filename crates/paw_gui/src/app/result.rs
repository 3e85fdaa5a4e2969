//! Result section: pH, confidence, probability bars and advice.

use super::{ACCENT, UiApp};
use eframe::egui;
use paw_core::advice::{self, AdviceBlock, Span};
use paw_core::{Prediction, export};
use rfd::FileDialog;

const BAR_HEIGHT: f32 = 14.0;

impl UiApp {
    pub(super) fn render_result_panel(&mut self, ui: &mut egui::Ui) {
        let Some(prediction) = self.controller.result().cloned() else {
            return;
        };
        ui.add_space(16.0);
        ui.separator();

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(self.tr("예측 pH", "Predicted pH"));
                ui.label(
                    egui::RichText::new(prediction.ph_text())
                        .size(42.0)
                        .strong()
                        .color(ACCENT),
                );
                if let Some(weighted) = prediction.weighted_ph_text() {
                    ui.small(format!(
                        "{} {weighted}",
                        self.tr("상위 2개 가중 평균", "Top-2 weighted")
                    ));
                }
            });
            ui.add_space(24.0);
            ui.vertical(|ui| {
                ui.label(self.tr("신뢰도", "Confidence"));
                ui.add(
                    egui::ProgressBar::new(prediction.confidence_fraction())
                        .desired_width(220.0)
                        .fill(ACCENT)
                        .text(prediction.confidence_text()),
                );
            });
        });

        ui.add_space(12.0);
        ui.heading(self.tr("클래스별 확률", "Class probabilities"));
        render_probabilities(ui, &prediction);

        ui.add_space(12.0);
        ui.heading(self.tr("건강 관리 조언", "Health advice"));
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            render_advice(ui, &advice::render(&prediction.health_advice));
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button(self.tr("CSV 내보내기", "Export CSV")).clicked() {
                self.export_result(&prediction);
            }
            if ui.button(self.tr("조언 복사", "Copy advice")).clicked() {
                self.copy_advice(&prediction);
            }
        });
    }

    fn export_result(&mut self, prediction: &Prediction) {
        let name = export::default_file_name(prediction, chrono::Local::now());
        let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(name)
            .save_file()
        else {
            return;
        };
        self.status = match export::export_csv(prediction, &path) {
            Ok(()) => format!(
                "{}: {}",
                self.tr("CSV 저장됨", "CSV exported"),
                path.display()
            ),
            Err(e) => {
                tracing::warn!("CSV export failed: {e:#}");
                format!("{}: {e}", self.tr("내보내기 실패", "Export failed"))
            }
        };
    }

    fn copy_advice(&mut self, prediction: &Prediction) {
        let html = advice::to_html(&advice::render(&prediction.health_advice));
        let copied = arboard::Clipboard::new()
            .and_then(|mut cb| cb.set_html(html, Some(prediction.health_advice.clone())));
        self.status = match copied {
            Ok(()) => self.tr("조언을 복사했습니다", "Advice copied").to_string(),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {e}");
                format!("{}: {e}", self.tr("복사 실패", "Copy failed"))
            }
        };
    }
}

fn render_probabilities(ui: &mut egui::Ui, prediction: &Prediction) {
    egui::Grid::new("probabilities")
        .num_columns(3)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for row in prediction.ranked() {
                let label = egui::RichText::new(&row.class);
                ui.label(if row.predicted {
                    label.strong().color(ACCENT)
                } else {
                    label
                });

                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(240.0, BAR_HEIGHT), egui::Sense::hover());
                let painter = ui.painter();
                painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
                let mut fill = rect;
                fill.set_width(rect.width() * row.bar_fraction());
                painter.rect_filled(fill, 4.0, ACCENT);

                ui.label(row.percent_text());
                ui.end_row();
            }
        });
}

fn render_advice(ui: &mut egui::Ui, blocks: &[AdviceBlock]) {
    for (i, block) in blocks.iter().enumerate() {
        match block {
            AdviceBlock::Heading(spans) => {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(advice::plain_text(spans)).heading());
            }
            AdviceBlock::Numbered(spans) | AdviceBlock::Line(spans) => spans_line(ui, spans),
            AdviceBlock::List(items) => {
                ui.indent(("advice-list", i), |ui| {
                    for item in items {
                        ui.horizontal_wrapped(|ui| {
                            ui.label("•");
                            spans_inline(ui, item);
                        });
                    }
                });
            }
            AdviceBlock::Break => ui.add_space(6.0),
        }
    }
}

fn spans_line(ui: &mut egui::Ui, spans: &[Span]) {
    ui.horizontal_wrapped(|ui| spans_inline(ui, spans));
}

fn spans_inline(ui: &mut egui::Ui, spans: &[Span]) {
    ui.spacing_mut().item_spacing.x = 0.0;
    for span in spans {
        match span {
            Span::Plain(t) => ui.label(t.as_str()),
            Span::Bold(t) => ui.label(egui::RichText::new(t.as_str()).strong()),
        };
    }
}
