//! Item photos as `data:` URIs.
//!
//! Photos are stored inline in the item record (`photoUrl`) as
//! `data:<mime>;base64,<payload>`, so an export file carries them along.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::error::{InventoryError, Result};

/// Read an image file and encode it as a `data:` URI.
///
/// Rejects files whose extension is not a known image type and files
/// larger than `max_bytes`.
pub fn encode_file(path: &Path, max_bytes: u64) -> Result<String> {
    let mime = image_mime(path).ok_or_else(|| {
        InventoryError::Invalid(format!("not an image file: {}", path.display()))
    })?;

    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(InventoryError::Invalid(format!(
            "photo is {} bytes, limit is {} bytes",
            size, max_bytes
        )));
    }

    let bytes = std::fs::read(path)?;
    Ok(encode_bytes(mime, &bytes))
}

pub fn encode_bytes(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 `data:` URI into its MIME type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| InventoryError::Invalid("photo is not a data: URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| InventoryError::Invalid("data: URI has no payload".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| InventoryError::Invalid("only base64 data: URIs are supported".into()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| InventoryError::Invalid(format!("bad base64 payload: {}", e)))?;
    Ok((mime.to_string(), bytes))
}

/// File extension conventionally used for an image MIME type.
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/svg+xml" => "svg",
        _ => "jpg",
    }
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
