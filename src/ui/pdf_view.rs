//! PDF viewer panel

use eframe::egui;

use crate::core::pdf::PdfSource;

/// Displays a PDF through the system viewer
pub struct PdfView;

impl PdfView {
    pub fn show(ui: &mut egui::Ui, pdf: &PdfSource) {
        ui.vertical(|ui| {
            ui.heading(&pdf.title);
            ui.add_space(8.0);
            ui.label(egui::RichText::new(&pdf.path).monospace().weak());
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui.button("Open").on_hover_text(&pdf.url).clicked() {
                    if let Err(e) = open::that(&pdf.url) {
                        tracing::error!("Failed to open {}: {}", pdf.url, e);
                    }
                }
                if ui.button("Copy URL").clicked() {
                    ui.ctx().copy_text(pdf.url.clone());
                }
            });

            ui.add_space(16.0);
            ui.hyperlink_to(&pdf.url, &pdf.url);
        });
    }
}
