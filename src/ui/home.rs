//! Index page listing every category

use eframe::egui;

use crate::app::DocsApp;
use crate::core::library::DocsIndex;
use crate::core::page::Route;

/// Landing page of the viewer
pub struct HomeView;

impl HomeView {
    pub fn show(ui: &mut egui::Ui, app: &mut DocsApp, index: &DocsIndex) {
        egui::ScrollArea::vertical()
            .id_salt("home_scroll")
            .show(ui, |ui| {
                ui.heading("Documentation");
                ui.label(format!("{} documents", index.doc_count()));
                ui.add_space(16.0);

                if app.library.is_none() {
                    Self::show_welcome(ui);
                    return;
                }

                for category in &index.categories {
                    ui.label(egui::RichText::new(&category.title).strong().size(16.0));
                    for doc in &category.docs {
                        if ui.link(&doc.title).clicked() {
                            app.request_navigation(Route::doc(&doc.slug));
                        }
                    }
                    for subcategory in &category.subcategories {
                        ui.indent(("home_sub", &category.name, &subcategory.name), |ui| {
                            ui.label(egui::RichText::new(&subcategory.title).italics());
                            for doc in &subcategory.docs {
                                if ui.link(&doc.title).clicked() {
                                    app.request_navigation(Route::doc(&doc.slug));
                                }
                            }
                        });
                    }
                    ui.add_space(12.0);
                }
            });
    }

    fn show_welcome(ui: &mut egui::Ui) {
        ui.label("Open a docs folder to get started.");
        ui.add_space(10.0);

        ui.label("Keyboard shortcuts:");
        ui.label("  F11 - Toggle fullscreen");
        ui.label("  Ctrl+B - Toggle sidebar");
        ui.label("  Ctrl+R - Reload docs");
        ui.label("  Alt+Left - Back");
    }
}
