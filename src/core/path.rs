//! Relative path resolution for references between documents
//!
//! Paths here are plain strings with `/` separators. Nothing touches the
//! filesystem, so the result may point at a location that does not exist.

use std::path::Path;

/// Check whether a path can serve as a resolution base.
///
/// A leading `/` marks a POSIX absolute path; a `:\` anywhere marks a
/// drive-letter path such as `C:\docs\a.md`.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.contains(":\\")
}

/// Resolve `target_path` against the file at `current_path`.
///
/// Returns `target_path` unchanged when there is no base, when the target is
/// already absolute, or when the base is not absolute (logged as a warning).
pub fn resolve_path(target_path: &str, current_path: Option<&str>) -> String {
    let Some(current_path) = current_path else {
        return target_path.to_string();
    };

    if is_absolute(target_path) {
        return target_path.to_string();
    }

    if !is_absolute(current_path) {
        tracing::warn!(
            "Cannot resolve `{}`: base path `{}` is not absolute",
            target_path,
            current_path
        );
        return target_path.to_string();
    }

    let current_dir = match current_path.rfind('/') {
        Some(idx) => &current_path[..idx],
        None => "",
    };

    if let Some(stripped) = target_path.strip_prefix("./") {
        return format!("{}/{}", current_dir, stripped);
    }

    if target_path.starts_with("../") {
        let mut segments: Vec<&str> = current_dir.split('/').collect();
        let mut rest = target_path;
        while let Some(stripped) = rest.strip_prefix("../") {
            // Popping an empty list is a no-op, which clamps at root.
            segments.pop();
            rest = stripped;
        }

        let dir = segments.join("/");
        return if rest.is_empty() {
            dir
        } else {
            format!("{}/{}", dir, rest)
        };
    }

    format!("{}/{}", current_dir, target_path)
}

/// String form of a file path used as the base for its links.
///
/// Windows separators become `/`, except the one after the drive letter, so
/// `C:\docs\guide\a.md` reads as `C:\docs/guide/a.md` and stays absolute.
pub fn link_base(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '\\' {
        forward_slashes(&raw)
    } else {
        raw.into_owned()
    }
}

fn forward_slashes(raw: &str) -> String {
    match raw.split_once(":\\") {
        Some((drive, rest)) => format!("{}:\\{}", drive, rest.replace('\\', "/")),
        None => raw.replace('\\', "/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_without_base_returns_target() {
        for p in ["./a.md", "../a.md", "a.md", "/abs/a.md", ""] {
            assert_eq!(resolve_path(p, None), p);
        }
    }

    #[test]
    fn test_absolute_target_is_untouched() {
        assert_eq!(resolve_path("/other/x.md", Some("/docs/a.md")), "/other/x.md");
        assert_eq!(resolve_path("C:\\docs\\x.md", Some("/docs/a.md")), "C:\\docs\\x.md");
        assert_eq!(resolve_path("/x.md", Some("relative/a.md")), "/x.md");
    }

    #[test]
    fn test_relative_base_returns_target() {
        assert_eq!(resolve_path("./b.md", Some("docs/a.md")), "./b.md");
        assert_eq!(resolve_path("../b.md", Some("a.md")), "../b.md");
    }

    #[test]
    fn test_dot_slash() {
        assert_eq!(resolve_path("./b.md", Some("/docs/a.md")), "/docs/b.md");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(resolve_path("../c/b.md", Some("/docs/sub/a.md")), "/docs/c/b.md");
        assert_eq!(resolve_path("../../x.md", Some("/a/b/c/d.md")), "/a/x.md");
    }

    #[test]
    fn test_parent_dir_clamps_at_root() {
        assert_eq!(resolve_path("../../b.md", Some("/docs/a.md")), "/b.md");
        assert_eq!(resolve_path("../../../../b.md", Some("/docs/a.md")), "/b.md");
    }

    #[test]
    fn test_parent_dir_without_remainder() {
        assert_eq!(resolve_path("../", Some("/docs/sub/a.md")), "/docs");
        assert_eq!(resolve_path("../../", Some("/docs/sub/a.md")), "");
    }

    #[test]
    fn test_bare_name_is_sibling() {
        assert_eq!(resolve_path("sibling.md", Some("/docs/a.md")), "/docs/sibling.md");
        assert_eq!(resolve_path("img/logo.png", Some("/docs/a.md")), "/docs/img/logo.png");
    }

    #[test]
    fn test_no_normalization() {
        assert_eq!(resolve_path("./x/./y.md", Some("/docs/a.md")), "/docs/x/./y.md");
        assert_eq!(resolve_path("x//y.md", Some("/docs/a.md")), "/docs/x//y.md");
    }

    #[test]
    fn test_drive_letter_base() {
        // No `/` in the base, so the directory part is empty.
        assert_eq!(resolve_path("./b.md", Some("C:\\docs\\a.md")), "/b.md");
        assert_eq!(resolve_path("./b.md", Some("C:\\docs/sub/a.md")), "C:\\docs/sub/b.md");
    }

    #[test]
    fn test_forward_slashes_keeps_drive() {
        assert_eq!(forward_slashes("C:\\docs\\guide\\a.md"), "C:\\docs/guide/a.md");
        assert_eq!(forward_slashes("docs\\a.md"), "docs/a.md");
        let base = forward_slashes("C:\\docs\\guide\\a.md");
        assert_eq!(resolve_path("./b.md", Some(&base)), "C:\\docs/guide/b.md");
    }

    #[test]
    fn test_link_base_posix_is_unchanged() {
        if std::path::MAIN_SEPARATOR == '/' {
            assert_eq!(link_base(Path::new("/docs/guide/a.md")), "/docs/guide/a.md");
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_relative_base_logs_warning() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let resolved = tracing::subscriber::with_default(subscriber, || {
            resolve_path("./b.md", Some("docs/a.md"))
        });
        assert_eq!(resolved, "./b.md");

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("base path `docs/a.md` is not absolute"));
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("/docs"));
        assert!(is_absolute("D:\\work"));
        assert!(!is_absolute("docs/a.md"));
        assert!(!is_absolute("./a.md"));
        assert!(!is_absolute(""));
    }
}
