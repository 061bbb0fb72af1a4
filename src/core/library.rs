//! Documentation library: content lookup and the category index

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use super::config::LibraryConfig;
use super::document::{DocContent, DocSummary};
use super::error::DocsError;

/// Category holding documents that sit directly in the docs root
pub const GENERAL_CATEGORY: &str = "general";

/// Second-level group inside a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub name: String,
    pub title: String,
    pub docs: Vec<DocSummary>,
}

/// Top-level group of documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub title: String,
    pub docs: Vec<DocSummary>,
    pub subcategories: Vec<Subcategory>,
}

/// Every document in the library, grouped for navigation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsIndex {
    pub categories: Vec<Category>,
}

impl DocsIndex {
    /// Total number of documents across all groups
    pub fn doc_count(&self) -> usize {
        self.categories
            .iter()
            .map(|c| c.docs.len() + c.subcategories.iter().map(|s| s.docs.len()).sum::<usize>())
            .sum()
    }
}

/// Source of documentation content.
///
/// Lookups are exact; slug fallbacks belong to the page loader.
pub trait DocsSource {
    /// Look up one document by slug
    fn get_doc_content(&self, slug: &str) -> Option<DocContent>;

    /// Enumerate every document
    fn get_all_docs(&self) -> DocsIndex;
}

/// Library backed by a directory of markdown and PDF files
#[derive(Debug, Clone)]
pub struct FsLibrary {
    root: PathBuf,
    config: LibraryConfig,
    docs: BTreeMap<String, DocContent>,
    index: DocsIndex,
}

impl FsLibrary {
    /// Scan `root` and build the library.
    ///
    /// A relative `root` is made absolute against the working directory so
    /// every document path can serve as a link base.
    pub fn open(root: &Path, config: &LibraryConfig) -> Result<Self, DocsError> {
        if !root.is_dir() {
            return Err(DocsError::NotADirectory(root.to_path_buf()));
        }

        let mut library = Self {
            root: std::path::absolute(root)?,
            config: config.clone(),
            docs: BTreeMap::new(),
            index: DocsIndex::default(),
        };
        library.reload()?;

        tracing::info!(
            "Opened docs library at {} ({} documents)",
            library.root.display(),
            library.docs.len()
        );
        Ok(library)
    }

    /// Rescan the docs directory
    pub fn reload(&mut self) -> Result<(), DocsError> {
        let mut docs = BTreeMap::new();

        let walker = WalkDir::new(&self.root)
            .max_depth(self.config.max_depth)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_skipped(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(rel) = relative_slug(&self.root, path) else {
                continue;
            };

            if is_markdown(path) {
                let slug = rel.strip_suffix(".md").unwrap_or(&rel).to_string();
                match DocContent::from_file(path, slug.clone()) {
                    Ok(doc) => {
                        docs.insert(slug, doc);
                    }
                    Err(e) => tracing::warn!("{}", e),
                }
            } else if self.config.include_pdfs && is_pdf(path) {
                docs.insert(rel.clone(), DocContent::pdf(path, rel));
            }
        }

        self.index = build_index(docs.values());
        self.docs = docs;
        Ok(())
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            return true;
        }
        entry.file_type().is_dir() && self.config.ignored_dirs.iter().any(|d| *d == name)
    }

    /// Category index built by the last scan
    pub fn index(&self) -> &DocsIndex {
        &self.index
    }

    /// Number of documents indexed
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Map an absolute file path back to the slug it is indexed under
    pub fn slug_for_path(&self, path: &str) -> Option<String> {
        let rel = relative_slug(&self.root, Path::new(path))?;
        if self.docs.contains_key(&rel) {
            return Some(rel);
        }
        rel.strip_suffix(".md")
            .filter(|slug| self.docs.contains_key(*slug))
            .map(str::to_string)
    }
}

impl DocsSource for FsLibrary {
    fn get_doc_content(&self, slug: &str) -> Option<DocContent> {
        self.docs.get(slug).cloned()
    }

    fn get_all_docs(&self) -> DocsIndex {
        self.index.clone()
    }
}

/// In-memory library keyed by slug
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    docs: BTreeMap<String, DocContent>,
}

#[cfg(test)]
impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document under its slug
    pub fn insert(&mut self, doc: DocContent) {
        self.docs.insert(doc.slug.clone(), doc);
    }

    /// Builder-style [`MemoryLibrary::insert`]
    pub fn with_doc(mut self, doc: DocContent) -> Self {
        self.insert(doc);
        self
    }
}

#[cfg(test)]
impl DocsSource for MemoryLibrary {
    fn get_doc_content(&self, slug: &str) -> Option<DocContent> {
        self.docs.get(slug).cloned()
    }

    fn get_all_docs(&self) -> DocsIndex {
        build_index(self.docs.values())
    }
}

/// Group documents by the first two segments of their slug.
///
/// Single-segment slugs land in [`GENERAL_CATEGORY`]; deeper documents
/// belong to their second-level subcategory.
pub fn build_index<'a>(docs: impl IntoIterator<Item = &'a DocContent>) -> DocsIndex {
    let mut categories: BTreeMap<String, (Vec<&DocContent>, BTreeMap<String, Vec<&DocContent>>)> =
        BTreeMap::new();

    for doc in docs {
        let segments: Vec<&str> = doc.slug.split('/').collect();
        match segments.as_slice() {
            [_] => categories
                .entry(GENERAL_CATEGORY.to_string())
                .or_default()
                .0
                .push(doc),
            [category, _] => categories
                .entry(category.to_string())
                .or_default()
                .0
                .push(doc),
            [category, subcategory, ..] => categories
                .entry(category.to_string())
                .or_default()
                .1
                .entry(subcategory.to_string())
                .or_default()
                .push(doc),
            [] => {}
        }
    }

    let mut categories: Vec<Category> = categories
        .into_iter()
        .map(|(name, (docs, subcategories))| Category {
            title: display_title(&name),
            docs: sorted_summaries(docs),
            subcategories: subcategories
                .into_iter()
                .map(|(name, docs)| Subcategory {
                    title: display_title(&name),
                    docs: sorted_summaries(docs),
                    name,
                })
                .collect(),
            name,
        })
        .collect();

    // BTreeMap order is by name; only the general category moves to the front.
    categories.sort_by_key(|c| c.name != GENERAL_CATEGORY);

    DocsIndex { categories }
}

fn sorted_summaries(mut docs: Vec<&DocContent>) -> Vec<DocSummary> {
    docs.sort_by(|a, b| {
        let a_order = a.metadata.order.unwrap_or(i64::MAX);
        let b_order = b.metadata.order.unwrap_or(i64::MAX);
        a_order
            .cmp(&b_order)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    docs.into_iter().map(DocContent::summary).collect()
}

/// `getting-started` -> `Getting started`
fn display_title(name: &str) -> String {
    let spaced = name.replace(['-', '_'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Path of `path` under `root`, joined with `/`
fn relative_slug(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "md" || ext == "markdown")
        .unwrap_or(false)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
