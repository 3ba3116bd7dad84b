//! HTTP span helpers.

use uuid::Uuid;

const ORDER_CODE_PREFIX: &str = "ORD-";

/// `METHOD /path` with identifiers replaced by placeholders, so one route
/// yields one span name.
pub(super) fn request_span_name(method: &str, path: &str) -> String {
    format!("{method} {}", normalise_path(path))
}

fn normalise_path(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else if segment.starts_with(ORDER_CODE_PREFIX) {
            normalised.push_str("{code}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}
