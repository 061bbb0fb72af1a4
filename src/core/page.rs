//! Page routing and document lookup with slug fallbacks

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use super::document::{DocContent, DocKind};
use super::library::{DocsIndex, DocsSource};
use super::pdf::PdfSource;

/// Extension tried on and off when a slug misses
const MARKDOWN_EXT: &str = ".md";

/// Bytes escaped in a route segment so `parse` and `join_slug` give the slug back
const SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'%').add(b'?').add(b'#');

/// A location inside the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Index of all documents
    Home,
    /// A document by multi-segment slug
    Doc { segments: Vec<String> },
    /// A PDF by filesystem path
    Pdf { segments: Vec<String> },
    /// Anything the router does not know
    NotFound { path: String },
}

impl Route {
    /// Parse a `/`-separated location such as `/docs/guide/intro`
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        match segments.split_first() {
            None => Route::Home,
            Some((head, rest)) if head == "docs" && !rest.is_empty() => Route::Doc {
                segments: rest.to_vec(),
            },
            Some((head, rest)) if head == "pdf" && !rest.is_empty() => Route::Pdf {
                segments: rest.to_vec(),
            },
            _ => Route::NotFound {
                path: path.to_string(),
            },
        }
    }

    /// Route to a document slug; segments are stored URL-encoded
    pub fn doc(slug: &str) -> Self {
        Route::Doc {
            segments: slug
                .split('/')
                .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
                .collect(),
        }
    }

    /// Location string for this route
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Doc { segments } => format!("/docs/{}", segments.join("/")),
            Route::Pdf { segments } => format!("/pdf/{}", segments.join("/")),
            Route::NotFound { path } => path.clone(),
        }
    }
}

/// What the router renders for a route
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home(DocsIndex),
    Doc(DocContent),
    Pdf(PdfSource),
    NotFound { requested: String },
}

/// Join slug segments with `/` and URL-decode the result
pub fn join_slug<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("/");
    percent_decode_str(&joined).decode_utf8_lossy().into_owned()
}

/// Slugs tried in order: as given, with `.md` added, with `.md` removed
pub fn slug_candidates(slug: &str) -> Vec<Cow<'_, str>> {
    SLUG_TRANSFORMS.iter().filter_map(|t| t(slug)).collect()
}

type SlugTransform = fn(&str) -> Option<Cow<'_, str>>;

const SLUG_TRANSFORMS: [SlugTransform; 3] = [as_is, with_extension, without_extension];

fn as_is(slug: &str) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(slug))
}

fn with_extension(slug: &str) -> Option<Cow<'_, str>> {
    if slug.ends_with(MARKDOWN_EXT) {
        None
    } else {
        Some(Cow::Owned(format!("{}{}", slug, MARKDOWN_EXT)))
    }
}

fn without_extension(slug: &str) -> Option<Cow<'_, str>> {
    slug.strip_suffix(MARKDOWN_EXT).map(Cow::Borrowed)
}

/// Look up a document by slug segments, applying the fallbacks
pub fn load_doc<S: AsRef<str>>(source: &dyn DocsSource, segments: &[S]) -> Option<DocContent> {
    let slug = join_slug(segments);

    for (attempt, candidate) in slug_candidates(&slug).into_iter().enumerate() {
        if let Some(doc) = source.get_doc_content(&candidate) {
            if attempt > 0 {
                tracing::debug!("Resolved slug `{}` as `{}`", slug, candidate);
            }
            return Some(doc);
        }
    }

    tracing::debug!("No document for slug `{}`", slug);
    None
}

/// Load the page a route points at
pub fn load_page(source: &dyn DocsSource, route: &Route) -> Page {
    match route {
        Route::Home => Page::Home(source.get_all_docs()),
        Route::Doc { segments } => match load_doc(source, segments.as_slice()) {
            Some(doc) if doc.kind == DocKind::Pdf => Page::Pdf(PdfSource::from_doc(&doc)),
            Some(doc) => Page::Doc(doc),
            None => Page::NotFound {
                requested: join_slug(segments.as_slice()),
            },
        },
        Route::Pdf { segments } => {
            let path = join_slug(segments.as_slice());
            // Segments drop the leading `/` of POSIX paths.
            let path = if path.contains(":\\") || path.contains(":/") {
                path
            } else {
                format!("/{}", path)
            };
            Page::Pdf(PdfSource::from_path(&path))
        }
        Route::NotFound { path } => Page::NotFound {
            requested: path.clone(),
        },
    }
}
