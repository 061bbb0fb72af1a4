//! Docsite - documentation viewer
//!
//! Serves a folder of markdown and PDF documents through JSON read endpoints
//! and a desktop viewer with category navigation.

mod api;
mod app;
mod core;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::DocsApp;
use clap::{Parser, Subcommand};
use eframe::egui;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::config::AppConfig;
use crate::core::library::FsLibrary;
use crate::core::page::{load_page, Page, Route};
use crate::core::path::resolve_path;

#[derive(Parser, Debug)]
#[command(name = "docsite", version, about = "Documentation viewer for markdown and PDF folders")]
struct Cli {
    /// Docs folder to open (overrides the saved one)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call a read endpoint and print its JSON body
    Api {
        /// Request path, e.g. `/api/docs/guide/intro`
        path: String,
        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,
    },
    /// Resolve a relative path against a document path
    Resolve {
        target: String,
        /// Absolute path of the referencing document
        #[arg(long)]
        from: Option<String>,
    },
    /// Show which page a route loads
    Page {
        /// Route, e.g. `/docs/guide/intro.md`
        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Using default config: {:#}", e);
        AppConfig::default()
    });
    if let Some(root) = cli.root.clone() {
        config.set_session_root(root);
    }

    match cli.command {
        None => run_viewer(config),
        Some(Command::Api { path, method }) => {
            let library = open_library(&config)?;
            let response = api::handle(&library, &method, &path);
            println!("{}", response.to_json_string());
            if !response.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Resolve { target, from }) => {
            println!("{}", resolve_path(&target, from.as_deref()));
            Ok(())
        }
        Some(Command::Page { path }) => {
            let library = open_library(&config)?;
            match load_page(&library, &Route::parse(&path)) {
                Page::Home(index) => println!("index: {} documents", index.doc_count()),
                Page::Doc(doc) => println!("doc: {} ({})", doc.slug, doc.title),
                Page::Pdf(pdf) => println!("pdf: {}", pdf.url),
                Page::NotFound { requested } => {
                    println!("not found: {}", requested);
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}

fn open_library(config: &AppConfig) -> Result<FsLibrary> {
    let root = config
        .active_root()
        .context("No docs folder configured; pass --root")?;
    FsLibrary::open(root, &config.library)
        .with_context(|| format!("Failed to open docs folder: {}", root.display()))
}

fn run_viewer(config: AppConfig) -> Result<()> {
    tracing::info!("Starting Docsite...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Docsite"),
        ..Default::default()
    };

    eframe::run_native(
        "Docsite",
        native_options,
        Box::new(|cc| Ok(Box::new(DocsApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Viewer failed: {}", e))
}
