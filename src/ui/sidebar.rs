//! Sidebar navigation over the docs index

use eframe::egui;

use crate::app::DocsApp;
use crate::core::document::{DocKind, DocSummary};
use crate::core::library::{Category, GENERAL_CATEGORY};
use crate::core::page::Route;

/// Category tree of the library
pub struct Sidebar;

impl Sidebar {
    /// Show the sidebar
    pub fn show(ui: &mut egui::Ui, app: &mut DocsApp) {
        ui.vertical(|ui| {
            // Header
            ui.horizontal(|ui| {
                ui.heading("Docs");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("\u{21BB}").on_hover_text("Reload").clicked() {
                        app.reload_library();
                    }
                    if ui.button("\u{1F3E0}").on_hover_text("Index").clicked() {
                        app.request_navigation(Route::Home);
                    }
                });
            });

            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("sidebar_scroll")
                .show(ui, |ui| {
                    let Some(index) = app.library.as_ref().map(|l| l.index().clone()) else {
                        ui.label("No docs folder open");
                        ui.add_space(10.0);
                        if ui.button("Open Docs Folder...").clicked() {
                            if let Some(path) = rfd::FileDialog::new().pick_folder() {
                                app.open_library(path);
                            }
                        }
                        return;
                    };

                    if index.categories.is_empty() {
                        ui.label("No documents found");
                    }
                    for category in &index.categories {
                        Self::show_category(ui, category, app);
                    }
                });
        });
    }

    /// Show a category with its subcategories
    fn show_category(ui: &mut egui::Ui, category: &Category, app: &mut DocsApp) {
        // Root-level documents are listed without a header.
        if category.name == GENERAL_CATEGORY && category.subcategories.is_empty() {
            for doc in &category.docs {
                Self::show_doc(ui, doc, app);
            }
            return;
        }

        let id = ui.make_persistent_id(("category", &category.name));
        egui::collapsing_header::CollapsingState::load_with_default_open(ui.ctx(), id, true)
            .show_header(ui, |ui| {
                ui.strong(&category.title);
            })
            .body(|ui| {
                for doc in &category.docs {
                    Self::show_doc(ui, doc, app);
                }
                for subcategory in &category.subcategories {
                    let id = ui.make_persistent_id(("subcategory", &category.name, &subcategory.name));
                    egui::collapsing_header::CollapsingState::load_with_default_open(
                        ui.ctx(),
                        id,
                        false,
                    )
                    .show_header(ui, |ui| {
                        ui.label(&subcategory.title);
                    })
                    .body(|ui| {
                        for doc in &subcategory.docs {
                            Self::show_doc(ui, doc, app);
                        }
                    });
                }
            });
    }

    /// Show a single document entry
    fn show_doc(ui: &mut egui::Ui, doc: &DocSummary, app: &mut DocsApp) {
        let icon = match doc.kind {
            DocKind::Markdown => "\u{1F4DD}",
            DocKind::Pdf => "\u{1F4D5}",
        };
        let is_active = app.active_slug() == Some(doc.slug.as_str());

        ui.horizontal(|ui| {
            ui.add_space(8.0);
            if ui
                .selectable_label(is_active, format!("{} {}", icon, doc.title))
                .on_hover_text(&doc.slug)
                .clicked()
            {
                app.request_navigation(Route::doc(&doc.slug));
            }
        });
    }
}
