//! Form persistence service
//!
//! Serves the submission form, accepts POSTed submissions into the
//! flat-file store, and exposes the collection as rendered HTML and as
//! raw JSON.

mod handlers;
mod pages;
pub mod store;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::http;
use crate::logger;

const ALLOWED_METHODS: &str = "GET, HEAD, POST, OPTIONS";

/// Dispatch one form-service request by method and path.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_query = req.uri().query().map(ToString::to_string);
    let is_head = method == Method::HEAD;

    let response = match (method, path.as_str()) {
        (Method::GET | Method::HEAD, "/") => {
            handlers::render_form(request_query.as_deref(), is_head)
        }
        (Method::POST, "/submit") => handlers::accept_submission(req, &state).await,
        (Method::GET | Method::HEAD, "/display") => handlers::list_submissions(&state, is_head),
        (Method::GET | Method::HEAD, "/api/data") => handlers::raw_listing(&state, is_head),
        (Method::OPTIONS, _) => http::build_options_response(ALLOWED_METHODS),
        (Method::GET | Method::HEAD | Method::POST, _) => http::build_404_response(),
        (method, path) => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response(ALLOWED_METHODS)
        }
    };

    Ok(response)
}
