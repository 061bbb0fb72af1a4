//! PDF documents opened through `file://` URLs

use super::document::DocContent;

/// A PDF ready to be displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfSource {
    pub title: String,
    /// Filesystem path as given
    pub path: String,
    /// `file://` URL for the path
    pub url: String,
}

impl PdfSource {
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let title = if name.is_empty() { path } else { name };
        Self {
            title: title.to_string(),
            path: path.to_string(),
            url: file_url(path),
        }
    }

    pub fn from_doc(doc: &DocContent) -> Self {
        Self {
            title: doc.title.clone(),
            path: doc.path.clone(),
            url: file_url(&doc.path),
        }
    }
}

/// Build a `file://` URL, turning backslashes into forward slashes.
///
/// Drive-letter paths get the extra `/` that marks an empty host:
/// `C:\docs\a.pdf` becomes `file:///C:/docs/a.pdf`.
pub fn file_url(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    if normalized.starts_with('/') {
        format!("file://{}", normalized)
    } else {
        format!("file:///{}", normalized)
    }
}
