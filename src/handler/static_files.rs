//! Static file serving callback
//!
//! Serves files from a directory mounted under a path prefix, with
//! traversal protection and index-file fallback. A missing file is a
//! normal 404 answer, not a callback failure.

use std::fs;
use std::io;
use std::path::PathBuf;

use hyper::{Method, StatusCode};

use crate::callback::{Callback, CallbackError};
use crate::http::{ContentType, Exchange, Response};
use crate::logger;

/// Callback serving GET requests from a directory on disk
pub struct FileCallback {
    prefix: String,
    root: PathBuf,
    index_files: Vec<String>,
}

impl FileCallback {
    /// Mount `root` under `prefix` (e.g. `/static`); an empty prefix
    /// mounts it at the server root
    #[must_use]
    pub fn new(prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            root: root.into(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        }
    }

    /// Files tried, in order, when the request path is a directory
    #[must_use]
    pub fn with_index_files(mut self, files: Vec<String>) -> Self {
        self.index_files = files;
        self
    }

    /// Resolve a request path to a file inside the mounted directory
    ///
    /// Returns `None` for paths that do not map to a readable file or
    /// that escape the mount root.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        // Remove leading slash and prevent directory traversal
        let clean_path = request_path.trim_start_matches('/').replace("..", "");

        // Remove the mount prefix from the path
        let prefix_clean = self.prefix.trim_matches('/');
        let relative_path = if prefix_clean.is_empty() {
            clean_path.as_str()
        } else if clean_path == prefix_clean {
            ""
        } else {
            clean_path
                .strip_prefix(&format!("{prefix_clean}/"))
                .unwrap_or(&clean_path)
        };

        let root_canonical = match self.root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "mount directory not found or inaccessible '{}': {e}",
                    self.root.display()
                ));
                return None;
            }
        };

        // A leading slash would make join() discard the root entirely
        let relative_path = relative_path.trim_start_matches('/');
        let mut file_path = self.root.join(relative_path);

        // Directory paths fall back to the first existing index file
        if file_path.is_dir() || relative_path.is_empty() || relative_path.ends_with('/') {
            for index_file in &self.index_files {
                let index_path = file_path.join(index_file);
                if index_path.is_file() {
                    file_path = index_path;
                    break;
                }
            }
        }

        // File not found is common (404), no need to log it
        let file_path_canonical = file_path.canonicalize().ok()?;
        if !file_path_canonical.starts_with(&root_canonical) {
            logger::log_warning(&format!(
                "path traversal attempt blocked: {request_path} -> {}",
                file_path_canonical.display()
            ));
            return None;
        }

        Some(file_path_canonical)
    }
}

impl Callback for FileCallback {
    fn matches(&self, exchange: &Exchange) -> bool {
        *exchange.method() == Method::GET
            && exchange
                .path()
                .strip_prefix(&self.prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    fn process(&self, exchange: &Exchange) -> Result<Response, CallbackError> {
        let Some(file_path) = self.resolve(exchange.path()) else {
            return Ok(Response::not_found());
        };
        let contents = match fs::read(&file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Response::not_found()),
            Err(e) => return Err(e.into()),
        };
        let content_type =
            ContentType::from_extension(file_path.extension().and_then(|e| e.to_str()));
        Ok(Response::new(StatusCode::OK, contents, content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a unique scratch directory with a known file layout
    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "switchboard-files-{label}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("hello.txt"), "hello").unwrap();
        fs::write(dir.join("sub/page.html"), "<html></html>").unwrap();
        fs::write(dir.join("index.html"), "home").unwrap();
        dir
    }

    fn mounted(label: &str) -> (FileCallback, PathBuf) {
        let dir = scratch_dir(label);
        (FileCallback::new("/static", &dir), dir)
    }

    #[test]
    fn test_matches_prefix_only_for_get() {
        let (callback, _dir) = mounted("match");
        assert!(callback.matches(&Exchange::get("/static")));
        assert!(callback.matches(&Exchange::get("/static/hello.txt")));
        assert!(!callback.matches(&Exchange::get("/staticfile")));
        assert!(!callback.matches(&Exchange::post("/static/hello.txt", "")));
    }

    #[test]
    fn test_serves_file_with_content_type() {
        let (callback, _dir) = mounted("serve");
        let response = callback
            .process(&Exchange::get("/static/sub/page.html"))
            .unwrap();
        assert_eq!(response.code(), StatusCode::OK);
        assert_eq!(response.content_type(), Some("text/html"));
        assert_eq!(response.body().as_ref(), b"<html></html>");
    }

    #[test]
    fn test_missing_file_is_404() {
        let (callback, _dir) = mounted("missing");
        let response = callback.process(&Exchange::get("/static/nope.txt")).unwrap();
        assert_eq!(response.code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_directory_falls_back_to_index() {
        let (callback, _dir) = mounted("index");
        let response = callback.process(&Exchange::get("/static")).unwrap();
        assert_eq!(response.code(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"home");
    }

    #[test]
    fn test_traversal_is_blocked() {
        let dir = scratch_dir("traversal");
        let callback = FileCallback::new("/static", dir.join("sub"));
        // ".." is stripped before resolution, so this cannot reach hello.txt
        let response = callback
            .process(&Exchange::get("/static/../hello.txt"))
            .unwrap();
        assert_eq!(response.code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_root_mount_serves_everything() {
        let dir = scratch_dir("root");
        let callback = FileCallback::new("", &dir);
        assert!(callback.matches(&Exchange::get("/hello.txt")));
        let response = callback.process(&Exchange::get("/hello.txt")).unwrap();
        assert_eq!(response.body().as_ref(), b"hello");
    }
}
