//! Query string and form body decoding
//!
//! Decodes `application/x-www-form-urlencoded` payloads and URL query
//! strings without pulling in a full URL parser.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::collections::HashMap;

/// Percent-decode a URL path. Unlike form decoding, `+` is literal here.
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Decode one urlencoded component. `+` reads as a space, matching HTML
/// form encoding; escapes that are not valid UTF-8 decode lossily.
pub fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Percent-encode a value for use as a query component.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, NON_ALPHANUMERIC).to_string()
}

/// Parse `key=value&key=value` pairs. A key without `=` maps to the empty
/// string; on duplicate keys the last value wins.
pub fn parse_pairs(raw: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        fields.insert(decode_component(key), decode_component(value));
    }
    fields
}

/// Parse an urlencoded request body.
pub fn parse_form_body(body: &[u8]) -> HashMap<String, String> {
    parse_pairs(&String::from_utf8_lossy(body))
}

/// Extract a single parameter from a query string.
pub fn get_param(query: &str, name: &str) -> Option<String> {
    parse_pairs(query).remove(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs_decodes_escapes() {
        let fields = parse_pairs("name=Ada+Lovelace&email=ada%40example.com");
        assert_eq!(fields["name"], "Ada Lovelace");
        assert_eq!(fields["email"], "ada@example.com");
    }

    #[test]
    fn test_parse_pairs_handles_missing_values() {
        let fields = parse_pairs("name=&phone");
        assert_eq!(fields["name"], "");
        assert_eq!(fields["phone"], "");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_parse_pairs_last_duplicate_wins() {
        let fields = parse_pairs("name=first&name=second");
        assert_eq!(fields["name"], "second");
    }

    #[test]
    fn test_decode_path_keeps_plus_literal() {
        assert_eq!(decode_path("/a%20b/c+d.txt"), "/a b/c+d.txt");
    }

    #[test]
    fn test_encode_component_round_trips() {
        let message = "Name and email are required.";
        let encoded = encode_component(message);
        assert!(!encoded.contains(' '));
        assert_eq!(decode_component(&encoded), message);
    }

    #[test]
    fn test_get_param() {
        assert_eq!(
            get_param("message=Missing%20name&x=1", "message").as_deref(),
            Some("Missing name")
        );
        assert_eq!(get_param("x=1", "message"), None);
    }
}
