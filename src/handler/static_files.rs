//! Static file serving module
//!
//! Serves the frontend from a local directory with index file resolution,
//! traversal protection and `ETag` revalidation.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Serve `ctx.path` from the configured directory
pub async fn serve(ctx: &RequestContext<'_>, cfg: &StaticFilesConfig) -> Response<Full<Bytes>> {
    let Some(file_path) = resolve(Path::new(&cfg.dir), ctx.path, &cfg.index_files).await else {
        return http::build_404_response();
    };

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response();
        }
    };

    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(&file_path),
        &etag,
        ctx.is_head,
    )
}

/// Map a request path onto a file inside `root`
///
/// Only plain path segments are accepted; anything resolving outside `root`
/// (`..`, symlinks) yields `None`.
pub async fn resolve(root: &Path, request_path: &str, index_files: &[String]) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return None;
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    let mut candidate = root_canonical.join(relative);
    if fs::metadata(&candidate).await.is_ok_and(|m| m.is_dir()) {
        let mut index = None;
        for name in index_files {
            let path = candidate.join(name);
            if fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
                index = Some(path);
                break;
            }
        }
        candidate = index?;
    }

    // File not found is common (404), no need to log
    let canonical = fs::canonicalize(&candidate).await.ok()?;
    if !canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path escapes static directory: {request_path} -> {}",
            canonical.display()
        ));
        return None;
    }
    fs::metadata(&canonical)
        .await
        .is_ok_and(|m| m.is_file())
        .then_some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        dir
    }

    fn cfg(dir: &tempfile::TempDir) -> StaticFilesConfig {
        StaticFilesConfig {
            dir: dir.path().to_str().unwrap().to_string(),
            index_files: vec!["index.html".to_string()],
        }
    }

    fn ctx<'a>(path: &'a str, if_none_match: Option<String>) -> RequestContext<'a> {
        RequestContext {
            path,
            is_head: false,
            if_none_match,
        }
    }

    #[tokio::test]
    async fn test_resolve_index_files() {
        let dir = site();
        let index = vec!["index.html".to_string()];
        let root = dir.path();

        let home = resolve(root, "/", &index).await.unwrap();
        assert!(home.ends_with("index.html"));
        let docs = resolve(root, "/docs/", &index).await.unwrap();
        assert!(docs.ends_with("docs/index.html"));
        let docs = resolve(root, "/docs", &index).await.unwrap();
        assert!(docs.ends_with("docs/index.html"));
        assert!(resolve(root, "/missing.css", &index).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_blocks_traversal() {
        let dir = site();
        let index = vec!["index.html".to_string()];
        assert!(resolve(dir.path(), "/../etc/passwd", &index).await.is_none());
        assert!(resolve(dir.path(), "/docs/../../secret", &index).await.is_none());
    }

    #[tokio::test]
    async fn test_serve_with_etag_revalidation() {
        let dir = site();
        let cfg = cfg(&dir);

        let first = serve(&ctx("/app.js", None), &cfg).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(
            first.headers()["content-type"],
            "application/javascript; charset=utf-8"
        );
        let etag = first.headers()["etag"].to_str().unwrap().to_string();
        let body = first.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"console.log(1)"));

        let second = serve(&ctx("/app.js", Some(etag)), &cfg).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_serve_missing_is_404() {
        let dir = site();
        let resp = serve(&ctx("/nope.png", None), &cfg(&dir)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_head_keeps_headers_drops_body() {
        let dir = site();
        let mut head = ctx("/", None);
        head.is_head = true;

        let resp = serve(&head, &cfg(&dir)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-length"], "13");
        assert!(resp.headers().get("etag").is_some());
        assert!(resp.into_body().collect().await.unwrap().to_bytes().is_empty());
    }
}
