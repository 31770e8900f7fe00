//! Locates an image reference inside an arbitrarily shaped provider response.

use serde_json::Value;

use crate::ports::ImageResult;

/// Default recursion limit for [`find_image_reference`].
pub const MAX_DEPTH: usize = 6;

/// Keys whose value is (or wraps) a URL or data URI, in priority order.
const DIRECT_KEYS: &[&str] = &["imageDataUrl", "image_url", "imageUrl", "url"];

/// Keys whose value is a bare base64 image payload, in priority order.
const BASE64_KEYS: &[&str] = &["b64_json", "base64", "image_base64", "imageBase64"];

/// Keys that wrap nested results, in priority order.
const CONTAINER_KEYS: &[&str] = &["data", "images", "output", "result", "results"];

/// Search `value` for the first image reference, up to [`MAX_DEPTH`] levels deep.
#[must_use]
pub fn find_image_reference(value: &Value) -> Option<ImageResult> {
    find_image_reference_within(value, MAX_DEPTH)
}

/// Search `value` for the first image reference, up to `max_depth` levels deep.
///
/// Depth-first and first-match-wins. Within an object, direct reference keys
/// are tried before base64 keys, which are tried before container keys; ties
/// are broken by the declared key order, never by payload order.
#[must_use]
pub fn find_image_reference_within(value: &Value, max_depth: usize) -> Option<ImageResult> {
    search(value, 0, max_depth)
}

fn search(value: &Value, depth: usize, max_depth: usize) -> Option<ImageResult> {
    if depth > max_depth {
        return None;
    }

    match value {
        Value::String(s) => ImageResult::from_reference(s),
        Value::Array(items) => items.iter().find_map(|item| search(item, depth + 1, max_depth)),
        Value::Object(map) => {
            let direct = DIRECT_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|v| search(v, depth + 1, max_depth));
            if direct.is_some() {
                return direct;
            }

            let encoded = BASE64_KEYS
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::trim)
                .find(|s| !s.is_empty());
            if let Some(data) = encoded {
                return Some(ImageResult::from_base64(data));
            }

            CONTAINER_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|v| search(v, depth + 1, max_depth))
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => None,
    }
}
