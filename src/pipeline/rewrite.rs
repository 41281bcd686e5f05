//! Post-processing: point page-image references at the content server.
//!
//! The converter emits Markdown that refers to extracted page images by bare
//! file name (`![](_page_3_Picture_1.jpeg)`). Once the output tree is served
//! by the content server those references must be absolute, so every run of
//! characters that starts with `_page` and ends with `.jpeg` becomes
//!
//! ```text
//! http://<host>:<port>/<document-key>/<matched-filename>
//! ```
//!
//! Matching is purely textual. A match directly preceded by `/` is already
//! part of a URL or path and is left alone, which makes the rewrite safe to
//! apply more than once.
//!
//! Rewriting is best-effort: failures are reported to the caller as
//! [`RewriteError`] and never roll back the conversion.

use crate::config::ContentServer;
use crate::error::RewriteError;
use crate::output::DocumentKey;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use tokio_stream::wrappers::ReadDirStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

static RE_PAGE_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"_page[^\s()\[\]<>"']*?\.jpeg"#).unwrap());

/// Rewrite every page-image reference in `markdown`.
///
/// Non-matching references (e.g. `cover.png`) are returned untouched.
pub fn rewrite_image_refs(markdown: &str, key: &DocumentKey, server: &ContentServer) -> String {
    let prefix = format!("{}/{}/", server.base_url(), key);
    RE_PAGE_IMAGE
        .replace_all(markdown, |caps: &Captures<'_>| {
            let m = caps.get(0).map_or("", |m| m.as_str());
            let start = caps.get(0).map_or(0, |m| m.start());
            if markdown[..start].ends_with('/') {
                m.to_string()
            } else {
                format!("{prefix}{m}")
            }
        })
        .into_owned()
}

/// Rewrite one Markdown file in place.
pub async fn rewrite_markdown_file(
    path: &Path,
    key: &DocumentKey,
    server: &ContentServer,
) -> Result<(), RewriteError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RewriteError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let rewritten = rewrite_image_refs(&content, key, server);

    tokio::fs::write(path, rewritten)
        .await
        .map_err(|e| RewriteError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

/// List the Markdown files directly inside `folder` (non-recursive).
pub async fn find_markdown_files(folder: &Path) -> Result<Vec<PathBuf>, RewriteError> {
    let scan_failed = |e: std::io::Error| RewriteError::ScanFailed {
        path: folder.to_path_buf(),
        source: e,
    };

    let read_dir = tokio::fs::read_dir(folder).await.map_err(scan_failed)?;
    let mut entries = ReadDirStream::new(read_dir);
    let mut files = Vec::new();

    while let Some(entry) = entries.next().await {
        let entry = entry.map_err(scan_failed)?;
        let path = entry.path();
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("md"));
        if !is_md {
            continue;
        }
        // Follows symlinks, like the input scan.
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(path);
        }
    }

    Ok(files)
}

/// Rewrite every Markdown file in a document's output folder.
///
/// Each file is independent: one failing is logged and the rest are still
/// processed. Returns `true` only if every file was rewritten. A folder
/// without Markdown files is a no-op success.
pub async fn rewrite_output_folder(
    folder: &Path,
    key: &DocumentKey,
    server: &ContentServer,
) -> bool {
    let files = match find_markdown_files(folder).await {
        Ok(files) => files,
        Err(e) => {
            warn!("{}", e);
            return false;
        }
    };

    if files.is_empty() {
        info!("No Markdown files to rewrite in {}", folder.display());
        return true;
    }

    let mut all_ok = true;
    for file in &files {
        match rewrite_markdown_file(file, key, server).await {
            Ok(()) => debug!("Rewrote image paths in {}", file.display()),
            Err(e) => {
                warn!("{}", e);
                all_ok = false;
            }
        }
    }
    all_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(s: &str) -> DocumentKey {
        DocumentKey::from_path(Path::new(&format!("{s}.pdf"))).unwrap()
    }

    fn server() -> ContentServer {
        ContentServer {
            host: "localhost".into(),
            port: 3000,
        }
    }

    #[test]
    fn rewrites_page_image_reference() {
        let out = rewrite_image_refs("![alt](_page_3.jpeg)", &key("report"), &server());
        assert_eq!(out, "![alt](http://localhost:3000/report/_page_3.jpeg)");
    }

    #[test]
    fn leaves_other_images_untouched() {
        let input = "![cover](cover.png)\n![logo](logo.jpeg)";
        assert_eq!(rewrite_image_refs(input, &key("report"), &server()), input);
    }

    #[test]
    fn rewrites_every_occurrence() {
        let input = "![](_page_0_Picture_1.jpeg) text ![](_page_12_Figure_3.jpeg)";
        let out = rewrite_image_refs(input, &key("paper"), &server());
        assert_eq!(
            out,
            "![](http://localhost:3000/paper/_page_0_Picture_1.jpeg) text \
             ![](http://localhost:3000/paper/_page_12_Figure_3.jpeg)"
        );
    }

    #[test]
    fn rewrite_is_idempotent() {
        let once = rewrite_image_refs("![alt](_page_3.jpeg)", &key("report"), &server());
        let twice = rewrite_image_refs(&once, &key("report"), &server());
        assert_eq!(once, twice);
    }

    #[test]
    fn uses_configured_server() {
        let srv = ContentServer {
            host: "docs.internal".into(),
            port: 8080,
        };
        let out = rewrite_image_refs("(_page_1.jpeg)", &key("q3"), &srv);
        assert_eq!(out, "(http://docs.internal:8080/q3/_page_1.jpeg)");
    }

    #[test]
    fn match_does_not_span_whitespace() {
        let input = "_page one and two.jpeg";
        assert_eq!(rewrite_image_refs(input, &key("k"), &server()), input);
    }

    #[test]
    fn rewrite_file_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.md");
        std::fs::write(&path, "# Report\n\n![](_page_1.jpeg)\n").unwrap();

        tokio_test::block_on(rewrite_markdown_file(&path, &key("report"), &server())).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Report\n\n![](http://localhost:3000/report/_page_1.jpeg)\n"
        );
    }

    #[tokio::test]
    async fn rewrite_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = rewrite_markdown_file(&dir.path().join("nope.md"), &key("x"), &server())
            .await
            .unwrap_err();
        assert!(matches!(err, RewriteError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn folder_scan_is_non_recursive() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.md"), "![](_page_1.jpeg)").unwrap();
        std::fs::write(dir.path().join("meta.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.md"), "![](_page_2.jpeg)").unwrap();

        assert!(rewrite_output_folder(dir.path(), &key("doc"), &server()).await);

        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.md")).unwrap(),
            "![](http://localhost:3000/doc/_page_1.jpeg)"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("sub/b.md")).unwrap(),
            "![](_page_2.jpeg)"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn folder_scan_follows_symlinked_markdown() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("elsewhere.txt");
        std::fs::write(&target, "![](_page_4.jpeg)").unwrap();
        let folder = dir.path().join("doc");
        std::fs::create_dir(&folder).unwrap();
        std::os::unix::fs::symlink(&target, folder.join("linked.md")).unwrap();
        std::os::unix::fs::symlink(dir.path(), folder.join("dir.md")).unwrap();

        let files = find_markdown_files(&folder).await.unwrap();
        assert_eq!(files, vec![folder.join("linked.md")]);

        assert!(rewrite_output_folder(&folder, &key("doc"), &server()).await);
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "![](http://localhost:3000/doc/_page_4.jpeg)"
        );
    }

    #[tokio::test]
    async fn folder_without_markdown_is_success() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("_page_0.jpeg"), b"\xff\xd8").unwrap();
        assert!(rewrite_output_folder(dir.path(), &key("doc"), &server()).await);
    }

    #[tokio::test]
    async fn missing_folder_reports_failure() {
        let dir = TempDir::new().unwrap();
        assert!(!rewrite_output_folder(&dir.path().join("gone"), &key("doc"), &server()).await);
    }
}
