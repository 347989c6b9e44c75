//! Static asset service
//!
//! Maps request paths to files under the configured public root, with
//! traversal protection and extension-based MIME lookup.

mod resolve;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::http::{self, mime};
use crate::logger;

use resolve::ResolveError;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Handle one site-server request.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let is_head = *method == Method::HEAD;

    match *method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return Ok(http::build_options_response(ALLOWED_METHODS)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return Ok(http::build_405_response(ALLOWED_METHODS));
        }
    }

    Ok(serve_path(&state, req.uri().path(), is_head).await)
}

/// Resolve and serve a single file from the public root.
async fn serve_path(state: &Arc<AppState>, path: &str, is_head: bool) -> Response<Full<Bytes>> {
    let site = &state.config.site;

    let file_path =
        match resolve::resolve_request_path(&site.public_root, path, &site.default_document) {
            Ok(resolved) => resolved,
            Err(ResolveError::Traversal) => {
                logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
                return http::build_403_response();
            }
        };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let content_type =
                mime::content_type_for(file_path.extension().and_then(|e| e.to_str()));
            http::build_file_response(content, content_type, is_head)
        }
        Err(e) => {
            // Missing files are common (404); only unexpected failures are
            // worth an error-log line. Either way the client sees 404.
            if e.kind() != std::io::ErrorKind::NotFound {
                logger::log_error(&format!(
                    "Failed to read file '{}': {e}",
                    file_path.display()
                ));
            }
            http::build_404_response()
        }
    }
}
