//! Application configuration management

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Number of docs folders remembered in `recent_roots`
const MAX_RECENT_ROOTS: usize = 10;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Docs folder opened at startup
    pub docs_root: Option<PathBuf>,
    /// Recently opened docs folders, most recent first
    pub recent_roots: Vec<PathBuf>,
    /// Slug of the last document viewed
    pub last_slug: Option<String>,
    /// UI settings
    pub ui: UiConfig,
    /// Library settings
    pub library: LibraryConfig,
    /// Docs folder given on the command line; never saved
    #[serde(skip)]
    pub session_root: Option<PathBuf>,
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
    /// Sidebar width
    pub sidebar_width: f32,
    /// Show the list of linked pages under each document
    pub show_linked_pages: bool,
}

/// Settings for indexing the docs folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Index PDF files next to markdown
    pub include_pdfs: bool,
    /// Reload the library when files change on disk
    pub watch: bool,
    /// Maximum directory depth scanned below the root
    pub max_depth: usize,
    /// Directory names never scanned
    pub ignored_dirs: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            sidebar_width: 260.0,
            show_linked_pages: true,
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            include_pdfs: true,
            watch: true,
            max_depth: 10,
            ignored_dirs: vec![
                "node_modules".to_string(),
                "target".to_string(),
                ".git".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "docsite", "Docsite")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse configuration; missing fields take their defaults
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Invalid config file")?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Make `path` the docs root and remember it as recent
    pub fn set_docs_root(&mut self, path: PathBuf) {
        self.session_root = None;
        self.add_recent_root(path.clone());
        if self.docs_root.as_ref() != Some(&path) {
            self.last_slug = None;
        }
        self.docs_root = Some(path);
    }

    /// Use `path` for this run only; the saved root stays as it was
    pub fn set_session_root(&mut self, path: PathBuf) {
        self.add_recent_root(path.clone());
        self.session_root = Some(path);
    }

    /// Docs folder to open: the session override, else the saved root
    pub fn active_root(&self) -> Option<&PathBuf> {
        self.session_root.as_ref().or(self.docs_root.as_ref())
    }

    /// Record the document on screen; ignored while a session root is active
    pub fn remember_slug(&mut self, slug: &str) {
        if self.session_root.is_none() {
            self.last_slug = Some(slug.to_string());
        }
    }

    /// Document to reopen at startup, if it belongs to the active root
    pub fn start_slug(&self) -> Option<&str> {
        match self.session_root {
            Some(_) => None,
            None => self.last_slug.as_deref(),
        }
    }

    /// Add a docs folder to recent roots
    pub fn add_recent_root(&mut self, path: PathBuf) {
        self.recent_roots.retain(|p| p != &path);
        self.recent_roots.insert(0, path);
        self.recent_roots.truncate(MAX_RECENT_ROOTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.docs_root.is_none());
        assert_eq!(config.ui.theme, "dark");
        assert!(config.library.include_pdfs);
        assert!(config.library.ignored_dirs.contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AppConfig::from_json(r#"{"docs_root": "/srv/docs", "library": {"watch": false}}"#)
            .unwrap();
        assert_eq!(config.docs_root, Some(PathBuf::from("/srv/docs")));
        assert!(!config.library.watch);
        assert_eq!(config.library.max_depth, 10);
        assert!(config.ui.show_linked_pages);
    }

    #[test]
    fn test_recent_roots_dedup_and_truncate() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.add_recent_root(PathBuf::from(format!("/docs/{}", i)));
        }
        config.add_recent_root(PathBuf::from("/docs/5"));

        assert_eq!(config.recent_roots.len(), MAX_RECENT_ROOTS);
        assert_eq!(config.recent_roots[0], PathBuf::from("/docs/5"));
        assert_eq!(
            config.recent_roots.iter().filter(|p| **p == PathBuf::from("/docs/5")).count(),
            1
        );
    }

    #[test]
    fn test_changing_root_forgets_last_slug() {
        let mut config = AppConfig::default();
        config.set_docs_root(PathBuf::from("/a"));
        config.last_slug = Some("guide".to_string());

        config.set_docs_root(PathBuf::from("/a"));
        assert_eq!(config.last_slug.as_deref(), Some("guide"));

        config.set_docs_root(PathBuf::from("/b"));
        assert!(config.last_slug.is_none());
    }

    #[test]
    fn test_session_root_is_not_saved() {
        let mut config = AppConfig::from_json(r#"{"docs_root": "/saved", "last_slug": "intro"}"#).unwrap();
        config.set_session_root(PathBuf::from("/tmp/other"));

        assert_eq!(config.active_root(), Some(&PathBuf::from("/tmp/other")));
        assert_eq!(config.start_slug(), None);
        config.remember_slug("elsewhere");

        let saved = AppConfig::from_json(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(saved.docs_root, Some(PathBuf::from("/saved")));
        assert_eq!(saved.last_slug.as_deref(), Some("intro"));
        assert_eq!(saved.recent_roots[0], PathBuf::from("/tmp/other"));
        assert_eq!(saved.active_root(), Some(&PathBuf::from("/saved")));
        assert_eq!(saved.start_slug(), Some("intro"));
    }

    #[test]
    fn test_opening_a_root_ends_the_session_override() {
        let mut config = AppConfig::default();
        config.set_session_root(PathBuf::from("/tmp/other"));
        config.set_docs_root(PathBuf::from("/picked"));
        config.remember_slug("guide");

        assert_eq!(config.active_root(), Some(&PathBuf::from("/picked")));
        assert_eq!(config.start_slug(), Some("guide"));
    }
}
