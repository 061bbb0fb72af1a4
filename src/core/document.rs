//! Documents served by the library

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::DocsError;
use super::path::link_base;

/// Kind of file behind a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Markdown,
    Pdf,
}

/// Document metadata from the frontmatter block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Position inside its category; documents without one sort last
    pub order: Option<i64>,
    pub tags: Vec<String>,
}

/// A document as returned by a content lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocContent {
    /// Identifier the document is looked up by
    pub slug: String,
    /// Display title
    pub title: String,
    pub kind: DocKind,
    /// Raw file content, frontmatter included (empty for PDFs)
    pub content: String,
    /// Absolute location of the source file, used as the base for its links
    pub path: String,
    pub metadata: DocMetadata,
}

/// Index entry for a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocSummary {
    pub slug: String,
    pub title: String,
    pub kind: DocKind,
}

impl DocContent {
    /// Build a markdown document from its text
    pub fn markdown(slug: impl Into<String>, path: impl Into<String>, content: String) -> Self {
        let slug = slug.into();
        let path = path.into();
        let metadata = parse_frontmatter(&content).unwrap_or_default();
        let title = metadata
            .title
            .clone()
            .or_else(|| first_heading(strip_frontmatter(&content)))
            .unwrap_or_else(|| title_from_path(&path));

        Self {
            slug,
            title,
            kind: DocKind::Markdown,
            content,
            path,
            metadata,
        }
    }

    /// Read a markdown document from disk
    pub fn from_file(path: &Path, slug: impl Into<String>) -> Result<Self, DocsError> {
        let content = fs::read_to_string(path).map_err(|e| DocsError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self::markdown(slug, link_base(path), content))
    }

    /// Build a PDF entry; the file itself is never read
    pub fn pdf(path: &Path, slug: impl Into<String>) -> Self {
        let path = link_base(path);
        Self {
            slug: slug.into(),
            title: title_from_path(&path),
            kind: DocKind::Pdf,
            content: String::new(),
            path,
            metadata: DocMetadata::default(),
        }
    }

    /// Content without the frontmatter block
    pub fn body(&self) -> &str {
        strip_frontmatter(&self.content)
    }

    pub fn summary(&self) -> DocSummary {
        DocSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            kind: self.kind,
        }
    }
}

/// Parse a `---` delimited frontmatter block.
///
/// JSON is tried first, then simple `key: value` lines.
pub fn parse_frontmatter(content: &str) -> Option<DocMetadata> {
    if !content.starts_with("---") {
        return None;
    }

    let end = content[3..].find("---")?;
    let frontmatter = content[3..3 + end].trim();

    serde_json::from_str(frontmatter).ok().or_else(|| {
        let mut metadata = DocMetadata::default();
        for line in frontmatter.lines() {
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                let value = value.trim().trim_matches('"');
                match key {
                    "title" => metadata.title = Some(value.to_string()),
                    "description" => metadata.description = Some(value.to_string()),
                    "order" => metadata.order = value.parse().ok(),
                    "tags" => {
                        metadata.tags = value
                            .trim_matches(|c| c == '[' || c == ']')
                            .split(',')
                            .map(|s| s.trim().trim_matches('"').to_string())
                            .filter(|s| !s.is_empty())
                            .collect();
                    }
                    _ => {}
                }
            }
        }
        Some(metadata)
    })
}

fn strip_frontmatter(content: &str) -> &str {
    if !content.starts_with("---") {
        return content;
    }

    if let Some(end) = content[3..].find("---") {
        let after_frontmatter = 3 + end + 3;
        if after_frontmatter <= content.len() {
            return content[after_frontmatter..].trim_start();
        }
    }

    content
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

/// File stem of a `/` or `\` separated path
fn title_from_path(path: &str) -> String {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    if stem.is_empty() {
        "Untitled".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter() {
        let content = r#"---
title: "Getting Started"
order: 2
tags: [setup, intro]
---

# Content here
"#;
        let metadata = parse_frontmatter(content).unwrap();
        assert_eq!(metadata.title, Some("Getting Started".to_string()));
        assert_eq!(metadata.order, Some(2));
        assert_eq!(metadata.tags, vec!["setup", "intro"]);
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = "---\n{\"title\": \"Json\", \"order\": 1}\n---\nbody";
        let metadata = parse_frontmatter(content).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Json"));
        assert_eq!(metadata.order, Some(1));
    }

    #[test]
    fn test_title_fallbacks() {
        let doc = DocContent::markdown("a", "/docs/a.md", "# Heading Title\n\ntext".to_string());
        assert_eq!(doc.title, "Heading Title");

        let doc = DocContent::markdown("b", "/docs/notes.md", "no heading".to_string());
        assert_eq!(doc.title, "notes");

        let doc = DocContent::markdown("c", "/docs/c.md", "---\ntitle: Meta\n---\n# Other".to_string());
        assert_eq!(doc.title, "Meta");
    }

    #[test]
    fn test_body_skips_frontmatter() {
        let doc = DocContent::markdown("a", "/a.md", "---\ntitle: T\n---\n\n# Body".to_string());
        assert_eq!(doc.body(), "# Body");

        let plain = DocContent::markdown("b", "/b.md", "# Plain".to_string());
        assert_eq!(plain.body(), "# Plain");
    }

    #[test]
    fn test_pdf_entry() {
        let doc = DocContent::pdf(Path::new("/docs/manuals/spec.pdf"), "manuals/spec.pdf");
        assert_eq!(doc.kind, DocKind::Pdf);
        assert_eq!(doc.title, "spec");
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let doc = DocContent::markdown("a", "/a.md", "# A".to_string());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["slug"], "a");
        assert_eq!(json["kind"], "markdown");
        assert_eq!(json["title"], "A");
    }
}
