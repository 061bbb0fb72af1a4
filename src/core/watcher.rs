//! Live reload of the docs directory

use std::path::Path;
use std::sync::mpsc::{channel, Receiver};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::error::DocsError;

/// Watches a docs directory; stops when dropped
pub struct DocsWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
}

impl DocsWatcher {
    /// Start watching `root` recursively
    pub fn watch(root: &Path) -> Result<Self, DocsError> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        tracing::info!("Watching docs directory: {}", root.display());
        Ok(Self {
            _watcher: watcher,
            events: rx,
        })
    }

    /// Drain pending events; true when a document was added, changed or removed
    pub fn take_changed(&self) -> bool {
        let mut changed = false;
        for result in self.events.try_iter() {
            match result {
                Ok(event) if is_doc_change(&event) => {
                    tracing::debug!("Docs changed: {:?}", event.paths);
                    changed = true;
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Watch error: {}", e),
            }
        }
        changed
    }
}

/// Create, modify or remove events touching a markdown or PDF file
fn is_doc_change(event: &Event) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind && event.paths.iter().any(|p| is_doc_file(p))
}

fn is_doc_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "md" || ext == "markdown" || ext == "pdf"
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind};
    use std::path::PathBuf;

    #[test]
    fn test_is_doc_change() {
        let create = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/docs/guide.md"));
        assert!(is_doc_change(&create));

        let other_file = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/docs/notes.txt"));
        assert!(!is_doc_change(&other_file));

        let access = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/docs/guide.md"));
        assert!(!is_doc_change(&access));

        let pdf = Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path(PathBuf::from("/docs/Manual.PDF"));
        assert!(is_doc_change(&pdf));
    }

    #[test]
    fn test_watch_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DocsWatcher::watch(&dir.path().join("missing")).is_err());
    }
}
