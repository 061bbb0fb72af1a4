//! Core functionality: document library, routing, path resolution and the shell bridge

pub mod config;
pub mod document;
pub mod error;
pub mod library;
pub mod links;
pub mod page;
pub mod path;
pub mod pdf;
pub mod shell;
pub mod watcher;
