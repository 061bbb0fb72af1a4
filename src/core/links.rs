//! Links between documents
//!
//! Relative destinations in a document are resolved against the document's
//! own path with [`resolve_path`].

use std::ops::Range;
use std::sync::OnceLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex_lite::Regex;

use super::path::{is_absolute, resolve_path};
use super::pdf::file_url;

/// A link or image found in markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Link text (alt text for images)
    pub text: String,
    /// Destination as written
    pub dest: String,
    pub is_image: bool,
}

/// A local link resolved to an absolute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub text: String,
    /// Destination as written
    pub dest: String,
    /// Resolved path without the fragment
    pub path: String,
    /// Fragment after `#`, if any
    pub fragment: Option<String>,
    pub is_image: bool,
}

/// Collect every link and image destination in document order
pub fn extract_links(markdown: &str) -> Vec<LinkRef> {
    let mut links = Vec::new();
    let mut open: Option<LinkRef> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                open = Some(LinkRef {
                    text: String::new(),
                    dest: dest_url.to_string(),
                    is_image: false,
                });
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                open = Some(LinkRef {
                    text: String::new(),
                    dest: dest_url.to_string(),
                    is_image: true,
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(link) = open.as_mut() {
                    link.text.push_str(&text);
                }
            }
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                if let Some(link) = open.take() {
                    links.push(link);
                }
            }
            _ => {}
        }
    }

    links
}

/// Check whether a destination points inside the docs rather than at a URL
pub fn is_local(dest: &str) -> bool {
    if dest.is_empty() || dest.starts_with('#') {
        return false;
    }
    if dest.contains("://") || dest.starts_with("mailto:") {
        return false;
    }
    true
}

/// Split `a.md#section` into `("a.md", Some("section"))`
fn split_fragment(dest: &str) -> (&str, Option<&str>) {
    match dest.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (dest, None),
    }
}

/// Resolve every local link of a document located at `doc_path`
pub fn resolve_links(markdown: &str, doc_path: &str) -> Vec<ResolvedLink> {
    extract_links(markdown)
        .into_iter()
        .filter(|link| is_local(&link.dest))
        .map(|link| {
            let (target, fragment) = split_fragment(&link.dest);
            ResolvedLink {
                path: resolve_path(target, Some(doc_path)),
                fragment: fragment.map(str::to_string),
                text: link.text.clone(),
                is_image: link.is_image,
                dest: link.dest,
            }
        })
        .collect()
}

fn destination_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\]\(\s*(?:<([^>]*)>|([^)\s]+))").expect("destination pattern is valid")
    })
}

/// A link or image whose end tag has not been seen yet
struct OpenLink {
    is_image: bool,
    /// End of the whole `[text](dest)` span
    end: usize,
    /// End of the text seen so far; the destination follows it
    inner_end: usize,
}

/// Replace local inline link and image destinations with resolved paths.
///
/// Only destinations of real links are touched, so code spans and code
/// blocks keep their text. Images get `file://` URLs the image loaders accept.
pub fn rewrite_relative_links(markdown: &str, doc_path: &str) -> String {
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    let mut open: Vec<OpenLink> = Vec::new();

    for (event, range) in Parser::new_ext(markdown, parser_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Link { .. }) => open.push(OpenLink {
                is_image: false,
                end: range.end,
                inner_end: range.start,
            }),
            Event::Start(Tag::Image { .. }) => open.push(OpenLink {
                is_image: true,
                end: range.end,
                inner_end: range.start,
            }),
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                let Some(link) = open.pop() else {
                    continue;
                };
                edits.extend(destination_edit(markdown, &link, doc_path));
                if let Some(parent) = open.last_mut() {
                    parent.inner_end = parent.inner_end.max(link.end);
                }
            }
            _ => {
                if let Some(link) = open.last_mut() {
                    link.inner_end = link.inner_end.max(range.end);
                }
            }
        }
    }

    edits.sort_by_key(|(range, _)| range.start);
    let mut rewritten = String::with_capacity(markdown.len());
    let mut copied = 0;
    for (range, replacement) in edits {
        rewritten.push_str(&markdown[copied..range.start]);
        rewritten.push_str(&replacement);
        copied = range.end;
    }
    rewritten.push_str(&markdown[copied..]);
    rewritten
}

/// Byte range of a local destination and its resolved replacement
fn destination_edit(markdown: &str, link: &OpenLink, doc_path: &str) -> Option<(Range<usize>, String)> {
    // Reference links have no `](` in their span and are left alone.
    let tail = markdown.get(link.inner_end..link.end)?;
    let caps = destination_pattern().captures(tail)?;
    let dest = caps.get(1).or_else(|| caps.get(2))?;
    if !is_local(dest.as_str()) {
        return None;
    }

    let (target, fragment) = split_fragment(dest.as_str());
    let resolved = resolve_path(target, Some(doc_path));
    let mut replacement = if link.is_image && is_absolute(&resolved) {
        file_url(&resolved)
    } else {
        resolved
    };
    if let Some(fragment) = fragment {
        replacement.push('#');
        replacement.push_str(fragment);
    }

    let start = link.inner_end + dest.start();
    Some((start..link.inner_end + dest.end(), replacement))
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"# Intro

See [the setup guide](./setup.md#install) and [API](../reference/api.md).
![Diagram](img/flow.png "Flow")
External: [Rust](https://www.rust-lang.org), [mail](mailto:docs@example.com), [top](#intro).
"#;

    #[test]
    fn test_extract_links() {
        let links = extract_links(DOC);
        assert_eq!(links.len(), 6);
        assert_eq!(links[0].text, "the setup guide");
        assert_eq!(links[0].dest, "./setup.md#install");
        assert!(links[2].is_image);
        assert_eq!(links[2].text, "Diagram");
    }

    #[test]
    fn test_is_local() {
        assert!(is_local("./a.md"));
        assert!(is_local("a.md"));
        assert!(is_local("/abs/a.md"));
        assert!(!is_local("https://example.com"));
        assert!(!is_local("mailto:x@y.z"));
        assert!(!is_local("#anchor"));
        assert!(!is_local(""));
    }

    #[test]
    fn test_resolve_links() {
        let links = resolve_links(DOC, "/docs/guide/intro.md");
        let paths: Vec<_> = links.iter().map(|l| l.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/docs/guide/setup.md",
                "/docs/reference/api.md",
                "/docs/guide/img/flow.png"
            ]
        );
        assert_eq!(links[0].fragment.as_deref(), Some("install"));
        assert_eq!(links[1].fragment, None);
    }

    #[test]
    fn test_rewrite_relative_links() {
        let rewritten = rewrite_relative_links(DOC, "/docs/guide/intro.md");
        assert!(rewritten.contains("[the setup guide](/docs/guide/setup.md#install)"));
        assert!(rewritten.contains("[API](/docs/reference/api.md)"));
        assert!(rewritten.contains("![Diagram](file:///docs/guide/img/flow.png \"Flow\")"));
        assert!(rewritten.contains("[Rust](https://www.rust-lang.org)"));
        assert!(rewritten.contains("[top](#intro)"));
    }

    #[test]
    fn test_rewrite_leaves_code_alone() {
        let markdown = "```md\n[link](./other.md)\n```\n\nInline `[x](./y.md)` and [real](./z.md).\n";
        let rewritten = rewrite_relative_links(markdown, "/docs/a.md");
        assert!(rewritten.contains("```md\n[link](./other.md)\n```"));
        assert!(rewritten.contains("`[x](./y.md)`"));
        assert!(rewritten.contains("[real](/docs/z.md)"));
    }

    #[test]
    fn test_rewrite_images_to_file_urls() {
        assert_eq!(
            rewrite_relative_links("![x](img/a.png)", "/docs/a.md"),
            "![x](file:///docs/img/a.png)"
        );
        assert_eq!(
            rewrite_relative_links("![](<img/my pic.png>)", "/docs/a.md"),
            "![](<file:///docs/img/my pic.png>)"
        );
    }

    #[test]
    fn test_rewrite_nested_and_reference_links() {
        let markdown = "[![logo](logo.png)](./home.md) and [*ref*][r]\n\n[r]: ./ref.md\n";
        let rewritten = rewrite_relative_links(markdown, "/docs/guide/a.md");
        assert!(rewritten.starts_with("[![logo](file:///docs/guide/logo.png)](/docs/guide/home.md)"));
        assert!(rewritten.contains("[*ref*][r]"));
        assert!(rewritten.contains("[r]: ./ref.md"));
    }

    #[test]
    fn test_rewrite_with_relative_base_is_noop() {
        let rewritten = rewrite_relative_links(DOC, "docs/intro.md");
        assert_eq!(rewritten, DOC);
    }
}
