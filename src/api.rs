//! JSON read endpoints over the docs library

use serde_json::{json, Value};

use crate::core::library::DocsSource;
use crate::core::page::join_slug;

/// Prefix shared by every endpoint
const API_PREFIX: &str = "/api/docs";

/// Status and JSON body of an endpoint call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Pretty-printed body
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}

/// Endpoint a request path maps to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint {
    ListDocs,
    GetDoc(String),
}

fn match_endpoint(path: &str) -> Option<Endpoint> {
    let path = path.split('?').next().unwrap_or_default();
    let rest = path.strip_prefix(API_PREFIX)?;

    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        if rest.is_empty() || rest == "/" {
            return Some(Endpoint::ListDocs);
        }
        return None;
    }
    if !rest.starts_with('/') {
        // `/api/docsfoo` is not under the prefix.
        return None;
    }
    Some(Endpoint::GetDoc(join_slug(segments.as_slice())))
}

/// Dispatch a request to the list or get endpoint
pub fn handle(source: &dyn DocsSource, method: &str, path: &str) -> ApiResponse {
    let Some(endpoint) = match_endpoint(path) else {
        return ApiResponse::error(404, "Not found");
    };

    if !method.eq_ignore_ascii_case("GET") {
        return ApiResponse::error(405, "Method not allowed");
    }

    match endpoint {
        Endpoint::ListDocs => list_docs(source),
        Endpoint::GetDoc(slug) => get_doc(source, &slug),
    }
}

/// `GET /api/docs`
pub fn list_docs(source: &dyn DocsSource) -> ApiResponse {
    match serde_json::to_value(source.get_all_docs()) {
        Ok(body) => ApiResponse::ok(body),
        Err(e) => {
            tracing::error!("Failed to serialize docs index: {}", e);
            ApiResponse::error(500, "Internal error")
        }
    }
}

/// `GET /api/docs/{slug}`
pub fn get_doc(source: &dyn DocsSource, slug: &str) -> ApiResponse {
    let Some(doc) = source.get_doc_content(slug) else {
        return ApiResponse::error(404, "Document not found");
    };

    match serde_json::to_value(&doc) {
        Ok(body) => ApiResponse::ok(body),
        Err(e) => {
            tracing::error!("Failed to serialize document `{}`: {}", slug, e);
            ApiResponse::error(500, "Internal error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::DocContent;
    use crate::core::library::MemoryLibrary;

    fn library() -> MemoryLibrary {
        MemoryLibrary::new()
            .with_doc(DocContent::markdown("guide", "/d/guide.md", "# Guide\n\nHello".to_string()))
            .with_doc(DocContent::markdown(
                "ops/deploy now",
                "/d/ops/deploy now.md",
                "# Deploy".to_string(),
            ))
    }

    #[test]
    fn test_list_docs() {
        let response = handle(&library(), "GET", "/api/docs");
        assert_eq!(response.status, 200);
        let categories = response.body["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["name"], "general");
        assert_eq!(handle(&library(), "GET", "/api/docs/").status, 200);
    }

    #[test]
    fn test_get_doc_hit() {
        let response = handle(&library(), "GET", "/api/docs/guide");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["slug"], "guide");
        assert_eq!(response.body["title"], "Guide");
        assert_eq!(response.body["content"], "# Guide\n\nHello");
    }

    #[test]
    fn test_get_doc_multi_segment_decoded() {
        let response = handle(&library(), "get", "/api/docs/ops/deploy%20now?x=1");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["title"], "Deploy");
    }

    #[test]
    fn test_get_doc_miss() {
        let response = handle(&library(), "GET", "/api/docs/missing");
        assert_eq!(response.status, 404);
        assert_eq!(response.body, json!({ "error": "Document not found" }));
        assert!(!response.is_success());
    }

    #[test]
    fn test_exact_lookup_has_no_fallback() {
        assert_eq!(handle(&library(), "GET", "/api/docs/guide.md").status, 404);
    }

    #[test]
    fn test_unknown_route_and_method() {
        assert_eq!(handle(&library(), "GET", "/api/other").status, 404);
        assert_eq!(handle(&library(), "GET", "/api/docsx").status, 404);
        let response = handle(&library(), "POST", "/api/docs");
        assert_eq!(response.status, 405);
        assert_eq!(response.body["error"], "Method not allowed");
    }

    #[test]
    fn test_to_json_string() {
        let response = handle(&library(), "GET", "/api/docs/missing");
        assert!(response.to_json_string().contains("\"error\": \"Document not found\""));
    }
}
