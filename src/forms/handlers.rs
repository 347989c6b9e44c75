//! Form service handlers
//!
//! One function per operation: render the form, accept a submission,
//! render the listing, and serve the raw collection.

use std::collections::HashMap;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};

use crate::config::AppState;
use crate::http::{self, query};
use crate::logger;

use super::pages;
use super::store::NewSubmission;

/// Shown inline on the form after a rejected submission.
const VALIDATION_ERROR: &str = "Name and email are required.";

/// Render the form page; an optional `message` query parameter is shown
/// as an inline notice.
pub fn render_form(request_query: Option<&str>, is_head: bool) -> Response<Full<Bytes>> {
    let notice = request_query.and_then(|q| query::get_param(q, "message"));
    http::build_html_response(pages::render_form_page(notice.as_deref()), is_head)
}

/// Accept a POSTed submission. Validation failure redirects back to the
/// form with an inline error; a store write failure is logged only, so
/// the caller still sees the success redirect.
pub async fn accept_submission(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    use http_body_util::BodyExt;

    if let Some(response) = check_body_size(&req, state.config.http.max_body_size) {
        return response;
    }

    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read submission body: {e}"));
            return http::build_400_response("could not read request body");
        }
    };

    let fields = query::parse_form_body(&body);
    match validate(&fields) {
        Ok(input) => {
            if let Err(e) = state.store.append_one(input) {
                logger::log_error(&e);
            }
            http::build_redirect_response("/display")
        }
        Err(reason) => {
            let location = format!("/?message={}", query::encode_component(reason));
            http::build_redirect_response(&location)
        }
    }
}

/// Render the listing page, most recent first. A load failure renders the
/// empty list with a visible notice instead of failing the request.
pub fn list_submissions(state: &Arc<AppState>, is_head: bool) -> Response<Full<Bytes>> {
    let (submissions, load_failed) = match state.store.load_all() {
        Ok(all) => (all, false),
        Err(e) => {
            logger::log_error(&e);
            (Vec::new(), true)
        }
    };

    http::build_html_response(pages::render_display_page(&submissions, load_failed), is_head)
}

/// Serve the full collection verbatim, in insertion order.
pub fn raw_listing(state: &Arc<AppState>, is_head: bool) -> Response<Full<Bytes>> {
    match state.store.load_all() {
        Ok(all) => http::build_json_response(StatusCode::OK, &all, is_head),
        Err(e) => {
            logger::log_error(&e);
            let body = serde_json::json!({ "error": "Failed to read submissions" });
            http::build_json_response(StatusCode::INTERNAL_SERVER_ERROR, &body, is_head)
        }
    }
}

/// Check presence of the required fields. Unknown fields are ignored.
fn validate(fields: &HashMap<String, String>) -> Result<NewSubmission, &'static str> {
    let name = fields.get("name").map(String::as_str).unwrap_or_default();
    let email = fields.get("email").map(String::as_str).unwrap_or_default();

    if name.is_empty() || email.is_empty() {
        return Err(VALIDATION_ERROR);
    }

    Ok(NewSubmission {
        name: name.to_string(),
        email: email.to_string(),
        phone: fields.get("phone").cloned().unwrap_or_default(),
        message: fields.get("message").cloned().unwrap_or_default(),
    })
}

/// Validate Content-Length against the configured max body size.
/// Returns Some(413 response) if too large, None otherwise.
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let header = req.headers().get("content-length")?;
    let Ok(size_str) = header.to_str() else {
        logger::log_warning("Content-Length header is not valid ASCII");
        return None;
    };

    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::store::{MemoryStore, SubmissionStore};
    use crate::http::query::parse_form_body;

    #[test]
    fn test_validate_requires_name_and_email() {
        let missing_name = parse_form_body(b"email=ada%40example.com");
        assert_eq!(validate(&missing_name), Err(VALIDATION_ERROR));

        let empty_email = parse_form_body(b"name=Ada&email=");
        assert_eq!(validate(&empty_email), Err(VALIDATION_ERROR));

        let empty = parse_form_body(b"");
        assert_eq!(validate(&empty), Err(VALIDATION_ERROR));
    }

    #[test]
    fn test_validate_defaults_optional_fields() {
        let fields = parse_form_body(b"name=Ada&email=ada%40example.com");
        let input = validate(&fields).expect("valid submission");
        assert_eq!(input.name, "Ada");
        assert_eq!(input.email, "ada@example.com");
        assert_eq!(input.phone, "");
        assert_eq!(input.message, "");
    }

    #[test]
    fn test_validate_keeps_optional_fields_and_ignores_unknown() {
        let fields =
            parse_form_body(b"name=Ada&email=a%40b.c&phone=555-0100&message=hi+there&extra=1");
        let input = validate(&fields).expect("valid submission");
        assert_eq!(input.phone, "555-0100");
        assert_eq!(input.message, "hi there");
    }

    #[test]
    fn test_rejected_submission_never_reaches_the_store() {
        let store = MemoryStore::new();
        let fields = parse_form_body(b"email=ada%40example.com");

        if let Ok(input) = validate(&fields) {
            store.append_one(input).expect("append");
        }

        assert_eq!(store.load_all().expect("load").len(), 0);
    }
}
