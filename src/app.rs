//! Main application state and UI coordination

use std::path::PathBuf;

use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::error::ShellError;
use crate::core::library::{DocsIndex, FsLibrary};
use crate::core::page::{load_page, Page, Route};
use crate::core::shell::{FullscreenChanged, FullscreenMirror, ShellBridge, ShellEvent, ShellEvents};
use crate::core::watcher::DocsWatcher;
use crate::ui::{doc_view::DocView, doc_view::NotFoundView, home::HomeView, pdf_view::PdfView, sidebar::Sidebar};

/// Shell bridge backed by the eframe viewport
#[derive(Debug, Default)]
pub struct ViewportShell {
    events: ShellEvents,
    last_full: Option<bool>,
}

impl ViewportShell {
    /// Pick up the viewport's fullscreen flag and emit `fullscreen-changed` on change
    pub fn sync(&mut self, ctx: &egui::Context) {
        let Some(full) = ctx.input(|i| i.viewport().fullscreen) else {
            return;
        };
        if self.last_full != Some(full) {
            self.last_full = Some(full);
            self.events
                .emit(&ShellEvent::FullscreenChanged(FullscreenChanged { is_full: full }));
        }
    }

    /// Ask the viewport to enter or leave fullscreen
    pub fn set_full_screen(&self, ctx: &egui::Context, full: bool) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(full));
    }
}

impl ShellBridge for ViewportShell {
    fn get_full_screen(&self) -> Result<bool, ShellError> {
        self.last_full.ok_or(ShellError::Unavailable)
    }

    fn events(&self) -> &ShellEvents {
        &self.events
    }
}

/// Navigation requested by a panel, applied at the end of the frame
#[derive(Debug, Clone, PartialEq, Eq)]
enum Navigation {
    To(Route),
    Back,
    Reload,
}

/// Main application state
pub struct DocsApp {
    /// Application configuration
    pub config: AppConfig,
    /// Library for the open docs folder
    pub library: Option<FsLibrary>,
    /// Reloads the library when files change
    watcher: Option<DocsWatcher>,
    /// Route currently shown
    pub route: Route,
    /// Page loaded for `route`
    pub page: Page,
    /// Previously visited routes
    history: Vec<Route>,
    /// Navigation requested during this frame
    pending: Option<Navigation>,
    /// Desktop shell bridge
    pub shell: ViewportShell,
    /// Fullscreen flag mirrored from the shell
    fullscreen: FullscreenMirror,
    /// Whether sidebar is visible
    pub sidebar_visible: bool,
    /// Commonmark cache for the document view
    pub commonmark_cache: egui_commonmark::CommonMarkCache,
}

impl DocsApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        if config.ui.theme == "light" {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        }

        let shell = ViewportShell::default();
        let fullscreen = FullscreenMirror::attach(&shell);

        let mut app = Self {
            config,
            library: None,
            watcher: None,
            route: Route::Home,
            page: Page::Home(DocsIndex::default()),
            history: Vec::new(),
            pending: None,
            shell,
            fullscreen,
            sidebar_visible: true,
            commonmark_cache: egui_commonmark::CommonMarkCache::default(),
        };

        if let Some(root) = app.config.active_root().cloned() {
            app.load_library(root);
        }
        let start = match app.config.start_slug() {
            Some(slug) if app.library.is_some() => Route::doc(slug),
            _ => Route::Home,
        };
        app.show_route(start);
        app
    }

    /// Open a docs folder and remember it
    pub fn open_library(&mut self, path: PathBuf) {
        self.config.set_docs_root(path.clone());
        self.load_library(path);
        self.history.clear();
        self.show_route(Route::Home);
        self.save_config();
    }

    fn load_library(&mut self, path: PathBuf) {
        match FsLibrary::open(&path, &self.config.library) {
            Ok(library) => {
                self.watcher = if self.config.library.watch {
                    DocsWatcher::watch(&path)
                        .map_err(|e| tracing::warn!("Live reload disabled: {}", e))
                        .ok()
                } else {
                    None
                };
                self.library = Some(library);
            }
            Err(e) => {
                tracing::error!("Failed to open docs folder: {}", e);
                self.library = None;
                self.watcher = None;
            }
        }
    }

    /// Rescan the docs folder and reload the current page
    pub fn reload_library(&mut self) {
        if let Some(library) = self.library.as_mut() {
            if let Err(e) = library.reload() {
                tracing::error!("Failed to reload docs: {}", e);
                return;
            }
            tracing::info!("Reloaded {} documents", library.len());
        }
        self.page = self.load(&self.route);
    }

    /// Navigate at the end of the current frame
    pub fn request_navigation(&mut self, route: Route) {
        self.pending = Some(Navigation::To(route));
    }

    fn apply_navigation(&mut self) {
        match self.pending.take() {
            Some(Navigation::To(route)) => self.navigate(route),
            Some(Navigation::Back) => self.back(),
            Some(Navigation::Reload) => self.reload_library(),
            None => {}
        }
    }

    /// Navigate now, pushing the current route onto the history
    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        let previous = std::mem::replace(&mut self.route, Route::Home);
        self.history.push(previous);
        self.show_route(route);
    }

    /// Go back to the previous route
    pub fn back(&mut self) {
        if let Some(route) = self.history.pop() {
            self.show_route(route);
        }
    }

    fn show_route(&mut self, route: Route) {
        self.page = self.load(&route);
        if let Page::Doc(doc) = &self.page {
            self.config.remember_slug(&doc.slug);
        }
        self.route = route;
    }

    fn load(&self, route: &Route) -> Page {
        match &self.library {
            Some(library) => load_page(library, route),
            None => match route {
                Route::Home => Page::Home(DocsIndex::default()),
                other => Page::NotFound {
                    requested: other.to_path(),
                },
            },
        }
    }

    /// Slug of the document on screen
    pub fn active_slug(&self) -> Option<&str> {
        match &self.page {
            Page::Doc(doc) => Some(doc.slug.as_str()),
            _ => None,
        }
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Docs Folder...").clicked() {
                        if let Some(path) = rfd::FileDialog::new().pick_folder() {
                            self.open_library(path);
                        }
                        ui.close();
                    }
                    let recent: Vec<PathBuf> = self.config.recent_roots.clone();
                    if !recent.is_empty() {
                        ui.menu_button("Open Recent", |ui| {
                            for path in recent {
                                if ui.button(path.display().to_string()).clicked() {
                                    self.open_library(path);
                                    ui.close();
                                }
                            }
                        });
                    }
                    if ui.button("Reload").clicked() {
                        self.pending = Some(Navigation::Reload);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Toggle Sidebar").clicked() {
                        self.sidebar_visible = !self.sidebar_visible;
                        ui.close();
                    }
                    if ui.button("Toggle Fullscreen").clicked() {
                        self.shell.set_full_screen(ctx, !self.fullscreen.is_full());
                        ui.close();
                    }
                    if ui
                        .checkbox(&mut self.config.ui.show_linked_pages, "Linked Pages")
                        .changed()
                    {
                        self.save_config();
                    }
                });

                ui.separator();
                if ui
                    .add_enabled(!self.history.is_empty(), egui::Button::new("\u{2190}"))
                    .on_hover_text("Back")
                    .clicked()
                {
                    self.pending = Some(Navigation::Back);
                }
                ui.label(egui::RichText::new(self.route.to_path()).monospace().weak());
            });
        });
    }
}

impl eframe::App for DocsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.shell.sync(ctx);

        if self.watcher.as_ref().is_some_and(|w| w.take_changed()) {
            self.reload_library();
        }

        // Handle keyboard shortcuts
        let (toggle_full, toggle_sidebar, reload, back) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::F11),
                i.modifiers.ctrl && i.key_pressed(egui::Key::B),
                i.modifiers.ctrl && i.key_pressed(egui::Key::R),
                i.modifiers.alt && i.key_pressed(egui::Key::ArrowLeft),
            )
        });
        if toggle_full {
            self.shell.set_full_screen(ctx, !self.fullscreen.is_full());
        }
        if toggle_sidebar {
            self.sidebar_visible = !self.sidebar_visible;
        }
        if reload {
            self.pending = Some(Navigation::Reload);
        } else if back {
            self.pending = Some(Navigation::Back);
        }

        // Chrome is hidden while fullscreen.
        let full = self.fullscreen.is_full();
        if !full {
            self.render_menu_bar(ctx);
        }

        if self.sidebar_visible && !full {
            egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.config.ui.sidebar_width)
                .min_width(150.0)
                .show(ctx, |ui| {
                    Sidebar::show(ui, self);
                });
        }

        // Panels borrow the app mutably, so render from a copy of the page.
        let page = self.page.clone();
        egui::CentralPanel::default().show(ctx, |ui| match &page {
            Page::Home(index) => HomeView::show(ui, self, index),
            Page::Doc(doc) => DocView::show(ui, self, doc),
            Page::Pdf(pdf) => PdfView::show(ui, pdf),
            Page::NotFound { requested } => NotFoundView::show(ui, self, requested),
        });

        self.apply_navigation();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.save_config();
    }
}
