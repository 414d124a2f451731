//! `serve-image.php` access for stored upload paths.

use super::client::{ApiClient, Script};
use crate::error::ApiError;

/// Absolute URL that renders a stored image, with the path query-encoded.
///
/// Already-absolute `http(s)` paths are returned unchanged.
#[must_use]
pub fn image_url(client: &ApiClient, stored_path: &str) -> String {
    let stored_path = stored_path.trim();
    if stored_path.starts_with("http://") || stored_path.starts_with("https://") {
        return stored_path.to_owned();
    }
    let base = client.script_url(Script::ServeImage);
    match reqwest::Url::parse_with_params(&base, &[("path", stored_path)]) {
        Ok(url) => url.into(),
        Err(_) => format!("{base}?path={stored_path}"),
    }
}

/// Download the bytes of a stored image.
///
/// # Errors
///
/// Any [`ApiError`]; an empty path is rejected without a request.
pub async fn fetch_image(client: &ApiClient, stored_path: &str) -> Result<Vec<u8>, ApiError> {
    let stored_path = stored_path.trim();
    if stored_path.is_empty() {
        return Err(crate::validation::ValidationError::Required { field: "path".into() }.into());
    }
    client
        .get_bytes(Script::ServeImage, &[("path", stored_path.to_owned())])
        .await
}

#[cfg(test)]
#[path = "images_test.rs"]
mod tests;
