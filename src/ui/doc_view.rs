//! Document viewer using egui_commonmark

use eframe::egui;
use egui_commonmark::CommonMarkViewer;

use crate::app::DocsApp;
use crate::core::document::DocContent;
use crate::core::links::{resolve_links, rewrite_relative_links};
use crate::core::page::Route;

/// Rendered markdown document
pub struct DocView;

impl DocView {
    /// Show a document
    pub fn show(ui: &mut egui::Ui, app: &mut DocsApp, doc: &DocContent) {
        // Images and links load relative to the document's own location.
        let markdown = rewrite_relative_links(doc.body(), &doc.path);

        egui::ScrollArea::vertical()
            .id_salt("doc_scroll")
            .show(ui, |ui| {
                if let Some(description) = &doc.metadata.description {
                    ui.label(egui::RichText::new(description).italics().weak());
                }
                if !doc.metadata.tags.is_empty() {
                    ui.horizontal_wrapped(|ui| {
                        for tag in &doc.metadata.tags {
                            ui.label(egui::RichText::new(format!("#{}", tag)).small().weak());
                        }
                    });
                }
                if doc.metadata.description.is_some() || !doc.metadata.tags.is_empty() {
                    ui.separator();
                }

                CommonMarkViewer::new().show(ui, &mut app.commonmark_cache, &markdown);

                if app.config.ui.show_linked_pages {
                    Self::show_linked_pages(ui, app, doc);
                }
            });
    }

    /// List local links that point at other documents in the library
    fn show_linked_pages(ui: &mut egui::Ui, app: &mut DocsApp, doc: &DocContent) {
        let Some(library) = app.library.as_ref() else {
            return;
        };

        // (link text, slug, hover text)
        let targets: Vec<(String, String, String)> = resolve_links(doc.body(), &doc.path)
            .into_iter()
            .filter(|link| !link.is_image)
            .filter_map(|link| {
                let slug = library.slug_for_path(&link.path)?;
                let text = if link.text.is_empty() { slug.clone() } else { link.text };
                let dest = match link.fragment {
                    Some(fragment) => format!("{}#{}", link.path, fragment),
                    None => link.dest,
                };
                Some((text, slug, dest))
            })
            .collect();

        if targets.is_empty() {
            return;
        }

        ui.add_space(20.0);
        ui.separator();
        ui.label(egui::RichText::new("Linked pages").strong());
        for (text, slug, dest) in targets {
            if ui.link(text).on_hover_text(dest).clicked() {
                app.request_navigation(Route::doc(&slug));
            }
        }
    }
}

/// Shown when a route has no matching document
pub struct NotFoundView;

impl NotFoundView {
    pub fn show(ui: &mut egui::Ui, app: &mut DocsApp, requested: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("Page not found");
            ui.add_space(10.0);
            ui.label(format!("No document matches `{}`", requested));
            ui.add_space(20.0);
            if ui.button("Back to index").clicked() {
                app.request_navigation(Route::Home);
            }
        });
    }
}
